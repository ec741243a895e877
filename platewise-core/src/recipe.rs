//! Recipe catalog entries.

use serde::{Deserialize, Serialize};

use crate::nutrition::NutritionTotals;

/// One catalog recipe. Nutrition values are per serving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display category as supplied by the catalog ("Bowls", "Smoothies", ...).
    pub category: String,

    /// Minutes.
    pub total_time: u32,
    pub calories_per_serving: u32,
    pub protein_grams: f64,
    pub carbs_grams: f64,
    pub fat_grams: f64,
    #[serde(default)]
    pub fiber_grams: f64,

    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_gluten_free: bool,
    #[serde(default)]
    pub is_dairy_free: bool,
}

impl Recipe {
    /// Normalized category key: lowercase, singular ("Bowls" -> "bowl").
    pub fn category_key(&self) -> String {
        normalize_category(&self.category)
    }

    /// Name plus ingredient list, lowercased. Used for allergy/dislike matching.
    pub fn searchable_text(&self) -> String {
        let mut s = self.name.to_lowercase();
        for ing in &self.ingredients {
            s.push(' ');
            s.push_str(&ing.to_lowercase());
        }
        s
    }

    pub fn nutrition(&self) -> NutritionTotals {
        NutritionTotals {
            calories: self.calories_per_serving,
            protein: self.protein_grams,
            carbs: self.carbs_grams,
            fat: self.fat_grams,
        }
    }
}

pub fn normalize_category(category: &str) -> String {
    let c = category.trim().to_lowercase();
    match c.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category("Bowls"), "bowl");
        assert_eq!(normalize_category(" Smoothies "), "smoothie");
        assert_eq!(normalize_category("main"), "main");
        assert_eq!(normalize_category("Salad"), "salad");
        assert_eq!(normalize_category("s"), "s");
    }
}
