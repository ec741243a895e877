//! Shared test fixtures.

use crate::recipe::Recipe;

pub(crate) fn recipe(id: u64, name: &str, category: &str, calories: u32) -> Recipe {
    Recipe {
        id,
        name: name.to_string(),
        slug: None,
        description: None,
        category: category.to_string(),
        total_time: 15,
        calories_per_serving: calories,
        protein_grams: calories as f64 / 40.0,
        carbs_grams: calories as f64 / 10.0,
        fat_grams: calories as f64 / 45.0,
        fiber_grams: 3.0,
        ingredients: Vec::new(),
        instructions: Vec::new(),
        tags: Vec::new(),
        is_vegetarian: false,
        is_vegan: false,
        is_gluten_free: false,
        is_dairy_free: false,
    }
}
