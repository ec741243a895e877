//! Import a recipe catalog from CSV.
//!
//! Header (column order is free, names are case-insensitive):
//! name,category,total_time,calories,protein,carbs,fat,fiber,
//! ingredients,tags,vegetarian,vegan,gluten_free,dairy_free
//!
//! `ingredients` and `tags` are `;`-separated. Boolean columns accept
//! true/false, yes/no, 1/0. Rows without a name or with unparseable numbers
//! are skipped.

use anyhow::{Context, Result, bail};
use csv::StringRecord;
use platewise_core::Recipe;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

const REQUIRED: [&str; 4] = ["name", "category", "calories", "total_time"];

pub fn parse_recipe_csv(path: impl AsRef<Path>) -> Result<Vec<Recipe>> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    parse_recipe_csv_reader(file).with_context(|| format!("parsing {}", path.as_ref().display()))
}

pub fn parse_recipe_csv_reader<R: Read>(reader: R) -> Result<Vec<Recipe>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: HashMap<String, usize> = rdr
        .headers()
        .context("reading header row")?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_lowercase(), i))
        .collect();
    for col in REQUIRED {
        if !columns.contains_key(col) {
            bail!("missing required column {col:?}");
        }
    }

    let mut recipes = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        let row = Row { record: &record, columns: &columns };

        let name = row.text("name");
        if name.is_empty() {
            continue;
        }
        match row.to_recipe(recipes.len() as u64 + 1, name) {
            Some(recipe) => recipes.push(recipe),
            // +2: one for the header, one for 1-based lines
            None => warn!(line = line + 2, recipe = name, "skipping CSV row with invalid numbers"),
        }
    }

    Ok(recipes)
}

struct Row<'a> {
    record: &'a StringRecord,
    columns: &'a HashMap<String, usize>,
}

impl<'a> Row<'a> {
    fn text(&self, col: &str) -> &'a str {
        self.columns
            .get(col)
            .and_then(|&i| self.record.get(i))
            .unwrap_or("")
    }

    fn number<T: std::str::FromStr + Default>(&self, col: &str) -> Option<T> {
        match self.text(col) {
            "" => Some(T::default()),
            s => s.parse().ok(),
        }
    }

    fn flag(&self, col: &str) -> bool {
        matches!(self.text(col).to_lowercase().as_str(), "true" | "yes" | "1" | "y")
    }

    fn list(&self, col: &str) -> Vec<String> {
        self.text(col)
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn to_recipe(&self, id: u64, name: &str) -> Option<Recipe> {
        let is_vegan = self.flag("vegan");
        Some(Recipe {
            id,
            name: name.to_string(),
            slug: None,
            description: None,
            category: self.text("category").to_string(),
            total_time: self.number("total_time")?,
            calories_per_serving: self.number("calories")?,
            protein_grams: self.number("protein")?,
            carbs_grams: self.number("carbs")?,
            fat_grams: self.number("fat")?,
            fiber_grams: self.number("fiber")?,
            ingredients: self.list("ingredients"),
            instructions: Vec::new(),
            tags: self.list("tags"),
            is_vegetarian: is_vegan || self.flag("vegetarian"),
            is_vegan,
            is_gluten_free: self.flag("gluten_free"),
            is_dairy_free: self.flag("dairy_free"),
        })
    }
}
