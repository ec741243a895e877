//! Wire format of the recipe API.
//!
//! List endpoint: `GET {base}/recipes/` returns either a paginated
//! `{"count": .., "results": [...]}` envelope or a bare array.
//! Detail endpoint: `GET {base}/recipes/{slug}/` adds `recipe_ingredients`
//! and `steps`.

use platewise_core::Recipe;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiRecipe {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Category display name; the API flattens the relation to a string.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub total_time: u32,
    #[serde(default)]
    pub calories_per_serving: u32,
    #[serde(default)]
    pub protein_grams: f64,
    #[serde(default)]
    pub carbs_grams: f64,
    #[serde(default)]
    pub fat_grams: f64,
    #[serde(default)]
    pub fiber_grams: f64,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_gluten_free: bool,
    #[serde(default)]
    pub is_dairy_free: bool,
    /// Detail endpoint only.
    #[serde(default)]
    pub recipe_ingredients: Vec<ApiIngredient>,
    /// Detail endpoint only.
    #[serde(default)]
    pub steps: Vec<ApiStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiIngredient {
    pub ingredient_name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiStep {
    pub step_number: u32,
    pub instruction: String,
    #[serde(default)]
    pub time_minutes: u32,
}

/// List response: paginated envelope or bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecipePage {
    Paginated { results: Vec<ApiRecipe> },
    Bare(Vec<ApiRecipe>),
}

impl RecipePage {
    pub fn into_recipes(self) -> Vec<Recipe> {
        let items = match self {
            RecipePage::Paginated { results } => results,
            RecipePage::Bare(items) => items,
        };
        items.into_iter().map(Recipe::from).collect()
    }
}

impl From<ApiRecipe> for Recipe {
    fn from(api: ApiRecipe) -> Self {
        let ingredients = api
            .recipe_ingredients
            .iter()
            .map(|i| i.ingredient_name.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let mut steps = api.steps;
        steps.sort_by_key(|s| s.step_number);
        let instructions = steps.into_iter().map(|s| s.instruction).collect();

        Recipe {
            id: api.id,
            name: api.name,
            slug: api.slug.filter(|s| !s.is_empty()),
            description: api.description.filter(|s| !s.is_empty()),
            category: api.category,
            total_time: api.total_time,
            calories_per_serving: api.calories_per_serving,
            protein_grams: api.protein_grams,
            carbs_grams: api.carbs_grams,
            fat_grams: api.fat_grams,
            fiber_grams: api.fiber_grams,
            ingredients,
            instructions,
            tags: api.tags,
            // Vegan implies vegetarian even if the record forgot to say so.
            is_vegetarian: api.is_vegetarian || api.is_vegan,
            is_vegan: api.is_vegan,
            is_gluten_free: api.is_gluten_free,
            is_dairy_free: api.is_dairy_free,
        }
    }
}
