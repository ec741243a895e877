//! Plan records: meal slots, day plans and the weekly plan.
//!
//! Totals on [`Meal`], [`DayPlan`] and [`WeeklyPlan`] are derived by the
//! assembler and never set independently.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::nutrition::NutritionTotals;
use crate::recipe::Recipe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Smoothie,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
            MealType::Smoothie => "smoothie",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A meal occasion with the recipes chosen for it. May be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct MealSlot {
    pub meal_type: MealType,
    pub recipes: Vec<Recipe>,
}

impl MealSlot {
    pub fn new(meal_type: MealType, recipes: Vec<Recipe>) -> Self {
        Self { meal_type, recipes }
    }

    pub fn empty(meal_type: MealType) -> Self {
        Self::new(meal_type, Vec::new())
    }
}

/// One day's slots before nutrition is aggregated. Both the AI path and the
/// fallback path produce these.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DaySelection {
    pub slots: Vec<MealSlot>,
}

impl DaySelection {
    pub fn slot(&self, meal_type: MealType) -> Option<&MealSlot> {
        self.slots.iter().find(|s| s.meal_type == meal_type)
    }

    pub fn recipe_count(&self) -> usize {
        self.slots.iter().map(|s| s.recipes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.recipe_count() == 0
    }

    /// Breakfast, lunch and dinner with no recipes.
    pub fn empty_day() -> Self {
        Self {
            slots: vec![
                MealSlot::empty(MealType::Breakfast),
                MealSlot::empty(MealType::Lunch),
                MealSlot::empty(MealType::Dinner),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub recipes: Vec<Recipe>,
    pub totals: NutritionTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    /// "<user>-<date>"
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub meals: Vec<Meal>,
    pub totals: NutritionTotals,
}

impl DayPlan {
    pub fn meal(&self, meal_type: MealType) -> Option<&Meal> {
        self.meals.iter().find(|m| m.meal_type == meal_type)
    }

    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.meals.iter().flat_map(|m| m.recipes.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    pub user_id: String,
    pub week_start: NaiveDate,
    pub days: Vec<DayPlan>,
    pub weekly_totals: NutritionTotals,
}

impl WeeklyPlan {
    /// Average daily calories, rounded. Zero for an empty plan.
    pub fn average_daily_calories(&self) -> u32 {
        if self.days.is_empty() {
            return 0;
        }
        (self.weekly_totals.calories as f64 / self.days.len() as f64).round() as u32
    }

    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.days.iter().flat_map(|d| d.recipes())
    }
}
