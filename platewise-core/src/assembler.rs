//! Plan assembly: the single place nutrition totals are derived.
//!
//! Meal totals are the sum over recipes, day totals the sum over meals, and
//! the weekly total the sum over days. Totals reported by a language model are
//! never consulted.

use chrono::{Days, NaiveDate};

use crate::error::PlanError;
use crate::nutrition::NutritionTotals;
use crate::plan::{DayPlan, DaySelection, Meal, MealSlot, WeeklyPlan};

/// Build a [`WeeklyPlan`] of exactly `days` days starting at `week_start`.
///
/// Selections beyond `days` are ignored; missing days become empty
/// breakfast/lunch/dinner days.
pub fn assemble(
    user_id: &str,
    week_start: NaiveDate,
    selections: &[DaySelection],
    days: u32,
) -> Result<WeeklyPlan, PlanError> {
    check_date_range(week_start, days)?;
    let mut out = Vec::new();
    let mut weekly = NutritionTotals::default();
    let empty = DaySelection::empty_day();

    for index in 0..days {
        let date = week_start
            .checked_add_days(Days::new(index as u64))
            .ok_or_else(|| PlanError::Assembly(format!("date overflow at day {index}")))?;
        let selection = selections.get(index as usize).unwrap_or(&empty);

        let day = assemble_day(user_id, date, selection)?;
        weekly = weekly
            .checked_add(day.totals)
            .ok_or_else(|| PlanError::Assembly("weekly calorie total overflowed".into()))?;
        out.push(day);
    }

    Ok(WeeklyPlan {
        user_id: user_id.to_string(),
        week_start,
        days: out,
        weekly_totals: weekly,
    })
}

/// Fails when the last planned day is not a representable date.
pub(crate) fn check_date_range(week_start: NaiveDate, days: u32) -> Result<(), PlanError> {
    week_start
        .checked_add_days(Days::new(u64::from(days)))
        .map(|_| ())
        .ok_or_else(|| PlanError::Assembly(format!("{days} days from {week_start} overflows the calendar")))
}

fn assemble_day(user_id: &str, date: NaiveDate, selection: &DaySelection) -> Result<DayPlan, PlanError> {
    let mut meals = Vec::with_capacity(selection.slots.len());
    let mut totals = NutritionTotals::default();

    for slot in &selection.slots {
        let meal = assemble_meal(slot)?;
        totals = totals
            .checked_add(meal.totals)
            .ok_or_else(|| PlanError::Assembly(format!("calorie total overflowed on {date}")))?;
        meals.push(meal);
    }

    Ok(DayPlan {
        id: format!("{user_id}-{date}"),
        user_id: user_id.to_string(),
        date,
        meals,
        totals,
    })
}

fn assemble_meal(slot: &MealSlot) -> Result<Meal, PlanError> {
    let mut totals = NutritionTotals::default();
    for recipe in &slot.recipes {
        let n = recipe.nutrition();
        if !n.is_finite() {
            return Err(PlanError::Assembly(format!(
                "recipe '{}' has non-finite macro values",
                recipe.name
            )));
        }
        totals = totals.checked_add(n).ok_or_else(|| {
            PlanError::Assembly(format!("calorie total overflowed in {}", slot.meal_type))
        })?;
    }

    Ok(Meal {
        meal_type: slot.meal_type,
        recipes: slot.recipes.clone(),
        totals,
    })
}
