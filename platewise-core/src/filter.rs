//! Profile-based catalog filtering.
//!
//! Exclusions are ANDed: diet type, then allergy terms, then dislike terms.
//! An empty result is valid; downstream selection treats it as empty slots.

use crate::profile::{DietType, UserProfile};
use crate::recipe::Recipe;

/// Keep only recipes the profile may eat. Catalog order is preserved.
pub fn filter_by_profile(catalog: &[Recipe], profile: &UserProfile) -> Vec<Recipe> {
    catalog
        .iter()
        .filter(|r| matches_profile(r, profile))
        .cloned()
        .collect()
}

pub fn matches_profile(recipe: &Recipe, profile: &UserProfile) -> bool {
    match profile.diet_type {
        DietType::Vegetarian if !recipe.is_vegetarian => return false,
        DietType::Vegan if !recipe.is_vegan => return false,
        _ => {}
    }

    let text = recipe.searchable_text();
    if mentions_any(&text, &profile.allergies) {
        return false;
    }
    if mentions_any(&text, &profile.dislikes) {
        return false;
    }
    true
}

fn mentions_any(text: &str, terms: &[String]) -> bool {
    terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .any(|t| text.contains(&t))
}
