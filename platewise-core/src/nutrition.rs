//! Energy budgeting (Mifflin-St Jeor) and nutrition totals.

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use crate::profile::{ActivityLevel, Goal, Sex, UserProfile};

/// Resting metabolic rate in kcal/day.
pub fn resting_rate(weight_kg: f64, height_cm: f64, age: u32, sex: Sex) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age as f64;
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female | Sex::Other => base - 161.0,
    }
}

/// Multiplier applied to the resting rate for a given activity level.
/// Unknown levels fall back to 1.2 at the parsing edge (see [`parse_activity_level`]).
pub fn activity_factor(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 1.2,
        ActivityLevel::LightlyActive => 1.375,
        ActivityLevel::ModeratelyActive => 1.55,
        ActivityLevel::VeryActive => 1.725,
        ActivityLevel::ExtremelyActive => 1.9,
    }
}

pub fn goal_adjustment(goal: Goal) -> f64 {
    match goal {
        Goal::LoseFat => 0.8,
        Goal::BuildMuscle | Goal::GainWeight => 1.1,
        Goal::MaintainWeight => 1.0,
    }
}

/// Daily calorie target, rounded to the nearest kcal.
pub fn daily_calorie_target(resting_rate: f64, level: ActivityLevel, goal: Goal) -> u32 {
    let target = resting_rate * activity_factor(level) * goal_adjustment(goal);
    target.round().max(0.0) as u32
}

pub fn profile_calorie_target(profile: &UserProfile) -> u32 {
    let rmr = resting_rate(profile.weight_kg, profile.height_cm, profile.age, profile.sex);
    daily_calorie_target(rmr, profile.activity_level, profile.goal)
}

/// Lenient activity-level parser; anything unrecognised is sedentary.
pub fn parse_activity_level(s: &str) -> ActivityLevel {
    match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
        "lightly_active" | "light" => ActivityLevel::LightlyActive,
        "moderately_active" | "moderate" => ActivityLevel::ModeratelyActive,
        "very_active" | "very" => ActivityLevel::VeryActive,
        "extremely_active" | "extreme" => ActivityLevel::ExtremelyActive,
        _ => ActivityLevel::Sedentary,
    }
}

/// Summed calories and macros for a meal, day or week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub calories: u32,
    /// Grams.
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl NutritionTotals {
    pub fn is_finite(&self) -> bool {
        self.protein.is_finite() && self.carbs.is_finite() && self.fat.is_finite()
    }

    /// Addition that reports calorie overflow instead of wrapping.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        Some(Self {
            calories: self.calories.checked_add(rhs.calories)?,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        })
    }
}

impl Add for NutritionTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

impl AddAssign for NutritionTotals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for NutritionTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resting_rate_male() {
        let rmr = resting_rate(70.0, 175.0, 30, Sex::Male);
        assert_eq!(rmr, 1648.75);
    }

    #[test]
    fn test_resting_rate_female_and_other_share_formula() {
        let f = resting_rate(60.0, 165.0, 40, Sex::Female);
        let o = resting_rate(60.0, 165.0, 40, Sex::Other);
        assert_eq!(f, 600.0 + 1031.25 - 200.0 - 161.0);
        assert_eq!(f, o);
    }

    #[test]
    fn test_daily_target_lose_fat() {
        // 1648.75 * 1.55 * 0.8 = 2044.45
        let target = daily_calorie_target(1648.75, ActivityLevel::ModeratelyActive, Goal::LoseFat);
        assert_eq!(target, 2044);
    }

    #[test]
    fn test_daily_target_surplus_and_maintenance() {
        assert_eq!(
            daily_calorie_target(1500.0, ActivityLevel::Sedentary, Goal::MaintainWeight),
            1800
        );
        assert_eq!(
            daily_calorie_target(1500.0, ActivityLevel::Sedentary, Goal::GainWeight),
            1980
        );
        assert_eq!(
            daily_calorie_target(1500.0, ActivityLevel::Sedentary, Goal::BuildMuscle),
            1980
        );
    }

    #[test]
    fn test_unknown_activity_defaults_to_sedentary() {
        assert_eq!(parse_activity_level("couch"), ActivityLevel::Sedentary);
        assert_eq!(parse_activity_level("Very Active"), ActivityLevel::VeryActive);
        assert_eq!(activity_factor(parse_activity_level("")), 1.2);
    }

    #[test]
    fn test_totals_sum() {
        let a = NutritionTotals { calories: 100, protein: 1.5, carbs: 2.0, fat: 3.0 };
        let b = NutritionTotals { calories: 250, protein: 0.5, carbs: 1.0, fat: 0.0 };
        let total: NutritionTotals = [a, b].into_iter().sum();
        assert_eq!(total.calories, 350);
        assert_eq!(total.protein, 2.0);
        assert!(a.checked_add(NutritionTotals { calories: u32::MAX, ..b }).is_none());
    }
}
