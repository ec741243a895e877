//! Catalog search for the browsing screens.
//!
//! The same query can be applied locally to an in-memory catalog or rendered
//! as query parameters for the recipe API.

use platewise_core::{Recipe, normalize_category};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeQuery {
    /// Free text over name, description and category.
    pub search: Option<String>,
    /// Category name; `"all"` or empty means no restriction.
    pub category: Option<String>,
    /// Every term must match name, description or an ingredient.
    pub ingredients: Vec<String>,
    /// Minutes.
    pub max_time: Option<u32>,
    pub vegetarian: bool,
    pub vegan: bool,
    pub gluten_free: bool,
}

impl RecipeQuery {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        if let Some(text) = non_blank(&self.search) {
            let text = text.to_lowercase();
            let hit = recipe.name.to_lowercase().contains(&text)
                || description(recipe).contains(&text)
                || recipe.category.to_lowercase().contains(&text);
            if !hit {
                return false;
            }
        }

        if let Some(cat) = non_blank(&self.category) {
            if !cat.eq_ignore_ascii_case("all") && recipe.category_key() != normalize_category(cat) {
                return false;
            }
        }

        for term in self.ingredients.iter().map(|t| t.trim().to_lowercase()) {
            if term.is_empty() {
                continue;
            }
            let hit = recipe.name.to_lowercase().contains(&term)
                || description(recipe).contains(&term)
                || recipe.ingredients.iter().any(|i| i.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }

        if self.max_time.is_some_and(|max| recipe.total_time > max) {
            return false;
        }

        (!self.vegetarian || recipe.is_vegetarian)
            && (!self.vegan || recipe.is_vegan)
            && (!self.gluten_free || recipe.is_gluten_free)
    }

    pub fn apply<'a>(&self, catalog: &'a [Recipe]) -> Vec<&'a Recipe> {
        catalog.iter().filter(|r| self.matches(r)).collect()
    }

    /// Query parameters understood by `GET {base}/recipes/`.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(s) = non_blank(&self.search) {
            pairs.push(("search", s.to_string()));
        }
        if let Some(c) = non_blank(&self.category) {
            pairs.push(("category", c.to_string()));
        }
        let terms: Vec<&str> = self
            .ingredients
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if !terms.is_empty() {
            pairs.push(("ingredients", terms.join(",")));
        }
        if let Some(max) = self.max_time {
            pairs.push(("max_time", max.to_string()));
        }
        for (flag, name) in [
            (self.vegetarian, "vegetarian"),
            (self.vegan, "vegan"),
            (self.gluten_free, "gluten_free"),
        ] {
            if flag {
                pairs.push((name, "true".to_string()));
            }
        }
        pairs
    }
}

fn non_blank(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn description(recipe: &Recipe) -> String {
    recipe.description.as_deref().unwrap_or_default().to_lowercase()
}
