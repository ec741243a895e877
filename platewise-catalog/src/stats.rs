//! Catalog statistics, as served by `GET {base}/stats/` or computed locally.

use platewise_core::Recipe;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub recipe_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_recipes: usize,
    /// Rounded.
    pub avg_time_minutes: u32,
    /// Rounded.
    pub avg_calories: u32,
    /// 0..=100, rounded.
    pub vegetarian_percentage: u32,
    #[serde(default)]
    pub categories: Vec<CategoryCount>,
}

impl CatalogStats {
    pub fn from_recipes(recipes: &[Recipe]) -> Self {
        let total = recipes.len();
        if total == 0 {
            return Self {
                total_recipes: 0,
                avg_time_minutes: 0,
                avg_calories: 0,
                vegetarian_percentage: 0,
                categories: Vec::new(),
            };
        }

        let n = total as f64;
        let time: u64 = recipes.iter().map(|r| r.total_time as u64).sum();
        let calories: u64 = recipes.iter().map(|r| r.calories_per_serving as u64).sum();
        let vegetarian = recipes.iter().filter(|r| r.is_vegetarian).count();

        // Keyed by display name, sorted for stable output.
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for r in recipes {
            *counts.entry(r.category.as_str()).or_default() += 1;
        }

        Self {
            total_recipes: total,
            avg_time_minutes: (time as f64 / n).round() as u32,
            avg_calories: (calories as f64 / n).round() as u32,
            vegetarian_percentage: (vegetarian as f64 / n * 100.0).round() as u32,
            categories: counts
                .into_iter()
                .map(|(name, recipe_count)| CategoryCount {
                    name: name.to_string(),
                    recipe_count,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_catalog;

    #[test]
    fn test_stats_of_sample_catalog() {
        let stats = CatalogStats::from_recipes(&sample_catalog().unwrap());
        assert_eq!(stats.total_recipes, 25);
        assert_eq!(stats.avg_time_minutes, 16);
        assert_eq!(stats.avg_calories, 277);
        assert_eq!(stats.vegetarian_percentage, 92);
        let soups = stats.categories.iter().find(|c| c.name == "Soups").unwrap();
        assert_eq!(soups.recipe_count, 5);
    }

    #[test]
    fn test_empty_catalog() {
        let stats = CatalogStats::from_recipes(&[]);
        assert_eq!(stats.total_recipes, 0);
        assert_eq!(stats.vegetarian_percentage, 0);
        assert!(stats.categories.is_empty());
    }

    #[test]
    fn test_api_payload_deserializes() {
        let json = r#"{"total_recipes":40,"avg_time_minutes":18,"avg_calories":301,
            "vegetarian_percentage":85,"categories":[{"name":"Salads","recipe_count":12}]}"#;
        let stats: CatalogStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.categories[0].recipe_count, 12);
    }
}
