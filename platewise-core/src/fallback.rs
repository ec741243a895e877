//! Fallback planner used when no usable AI response exists.
//!
//! Each slot draws one recipe uniformly at random from a category bucket of
//! the profile-filtered catalog. An empty bucket leaves the slot empty.
//!
//! | slot      | source categories | present when       |
//! |-----------|-------------------|--------------------|
//! | breakfast | smoothie, snack   | always             |
//! | lunch     | salad, soup       | always             |
//! | dinner    | main, bowl        | always             |
//! | snack     | snack             | `include_snacks`   |
//! | smoothie  | smoothie          | `include_smoothies`|

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::filter::filter_by_profile;
use crate::plan::{DaySelection, MealSlot, MealType};
use crate::profile::UserProfile;
use crate::recipe::Recipe;

/// Category keys (see [`Recipe::category_key`]) feeding each slot.
pub fn source_categories(meal_type: MealType) -> &'static [&'static str] {
    match meal_type {
        MealType::Breakfast => &["smoothie", "snack"],
        MealType::Lunch => &["salad", "soup"],
        MealType::Dinner => &["main", "bowl"],
        MealType::Snack => &["snack"],
        MealType::Smoothie => &["smoothie"],
    }
}

/// Slots a fallback day contains for this profile, in display order.
pub fn slots_for(profile: &UserProfile) -> Vec<MealType> {
    let mut slots = vec![MealType::Breakfast, MealType::Lunch, MealType::Dinner];
    if profile.include_snacks {
        slots.push(MealType::Snack);
    }
    if profile.include_smoothies {
        slots.push(MealType::Smoothie);
    }
    slots
}

/// Filter `catalog` by `profile`, then pick one recipe per slot for each day.
pub fn generate_fallback<R: Rng + ?Sized>(
    profile: &UserProfile,
    catalog: &[Recipe],
    days: u32,
    rng: &mut R,
) -> Vec<DaySelection> {
    let filtered = filter_by_profile(catalog, profile);
    select_days(profile, &filtered, days, rng)
}

/// Like [`generate_fallback`] for a catalog that is already filtered.
pub fn select_days<R: Rng + ?Sized>(
    profile: &UserProfile,
    filtered: &[Recipe],
    days: u32,
    rng: &mut R,
) -> Vec<DaySelection> {
    let slot_types = slots_for(profile);
    let buckets: Vec<(MealType, Vec<&Recipe>)> = slot_types
        .iter()
        .map(|&t| (t, bucket(filtered, t)))
        .collect();

    (0..days)
        .map(|_| DaySelection {
            slots: buckets
                .iter()
                .map(|(t, b)| {
                    let picked = b.choose(&mut *rng).map(|r| vec![(*r).clone()]).unwrap_or_default();
                    MealSlot::new(*t, picked)
                })
                .collect(),
        })
        .collect()
}

fn bucket(recipes: &[Recipe], meal_type: MealType) -> Vec<&Recipe> {
    let sources = source_categories(meal_type);
    recipes
        .iter()
        .filter(|r| sources.contains(&r.category_key().as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::recipe;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn catalog() -> Vec<Recipe> {
        vec![
            recipe(1, "Green Detox Smoothie", "Smoothies", 198),
            recipe(2, "Hemp Seed Energy Balls", "Snacks", 198),
            recipe(3, "Lentil Turmeric Soup", "Soups", 298),
            recipe(4, "Avocado Chickpea Salad", "Salads", 342),
            recipe(5, "Sweet Potato Black Bean Bowl", "Bowls", 394),
            recipe(6, "Herb Chicken Traybake", "main", 510),
        ]
    }

    #[test]
    fn test_seven_days_three_slots() {
        let mut rng = StdRng::seed_from_u64(7);
        let days = generate_fallback(&UserProfile::default(), &catalog(), 7, &mut rng);
        assert_eq!(days.len(), 7);
        for d in &days {
            assert_eq!(d.slots.len(), 3);
            assert!(d.slot(MealType::Snack).is_none());
            for s in &d.slots {
                assert_eq!(s.recipes.len(), 1);
            }
        }
    }

    #[test]
    fn test_slot_categories_follow_mapping() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut p = UserProfile::default();
        p.include_snacks = true;
        p.include_smoothies = true;
        for d in generate_fallback(&p, &catalog(), 20, &mut rng) {
            for s in &d.slots {
                for r in &s.recipes {
                    assert!(source_categories(s.meal_type).contains(&r.category_key().as_str()));
                }
            }
            assert_eq!(d.slots.len(), 5);
            assert_eq!(d.slot(MealType::Snack).unwrap().recipes[0].name, "Hemp Seed Energy Balls");
        }
    }

    #[test]
    fn test_empty_bucket_gives_empty_slot() {
        let mut rng = StdRng::seed_from_u64(1);
        let only_soup = vec![recipe(3, "Lentil Turmeric Soup", "Soups", 298)];
        let days = generate_fallback(&UserProfile::default(), &only_soup, 2, &mut rng);
        for d in &days {
            assert!(d.slot(MealType::Breakfast).unwrap().recipes.is_empty());
            assert_eq!(d.slot(MealType::Lunch).unwrap().recipes.len(), 1);
            assert!(d.slot(MealType::Dinner).unwrap().recipes.is_empty());
        }
    }

    #[test]
    fn test_empty_catalog_does_not_panic() {
        let mut rng = StdRng::seed_from_u64(3);
        let days = generate_fallback(&UserProfile::default(), &[], 7, &mut rng);
        assert_eq!(days.len(), 7);
        assert!(days.iter().all(DaySelection::is_empty));
    }
}
