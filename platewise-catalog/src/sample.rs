//! Static catalog bundled into the binary, used when the recipe API is
//! unreachable or when running offline.

use anyhow::{Context, Result};
use platewise_core::Recipe;

const SAMPLE_RECIPES: &str = include_str!("../data/sample_recipes.json");

pub fn sample_catalog() -> Result<Vec<Recipe>> {
    serde_json::from_str(SAMPLE_RECIPES).context("parsing bundled sample catalog")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_catalog_is_well_formed() {
        let catalog = sample_catalog().unwrap();
        assert_eq!(catalog.len(), 25);

        let ids: HashSet<_> = catalog.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), catalog.len());

        for r in &catalog {
            assert!(!r.ingredients.is_empty(), "{} has no ingredients", r.name);
            assert!(r.calories_per_serving > 0);
            if r.is_vegan {
                assert!(r.is_vegetarian, "{} is vegan but not vegetarian", r.name);
            }
        }
    }

    #[test]
    fn test_sample_catalog_covers_fallback_categories() {
        let catalog = sample_catalog().unwrap();
        let keys: HashSet<_> = catalog.iter().map(|r| r.category_key()).collect();
        for key in ["smoothie", "snack", "salad", "soup", "bowl"] {
            assert!(keys.contains(key), "missing {key}");
        }
    }
}
