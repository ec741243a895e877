//! Plain-text views printed by the CLI.

use chrono::Datelike;
use platewise_catalog::CatalogStats;
use platewise_core::{DayPlan, MealType, NutritionTotals, PlanSource, Recipe, WeeklyPlan};

fn title(meal_type: MealType) -> &'static str {
    match meal_type {
        MealType::Breakfast => "Breakfast",
        MealType::Lunch => "Lunch",
        MealType::Dinner => "Dinner",
        MealType::Snack => "Snack",
        MealType::Smoothie => "Smoothie",
    }
}

fn macros(t: &NutritionTotals) -> String {
    format!("P {:.0}g  C {:.0}g  F {:.0}g", t.protein, t.carbs, t.fat)
}

pub fn week_summary(plan: &WeeklyPlan, source: PlanSource, target: u32) -> String {
    let mut s = String::new();
    let origin = match source {
        PlanSource::Ai => "AI plan",
        PlanSource::Fallback => "fallback plan",
    };
    s.push_str(&format!("# Week of {} ({origin})\n\n", plan.week_start));

    for (i, day) in plan.days.iter().enumerate() {
        s.push_str(&format!(
            "{:>2}. {} {}  {:>5} kcal  {}\n",
            i + 1,
            day.date.weekday(),
            day.date,
            day.totals.calories,
            macros(&day.totals)
        ));
    }

    let avg = plan.average_daily_calories();
    s.push_str(&format!(
        "\nWeek: {} kcal  {}\n",
        plan.weekly_totals.calories,
        macros(&plan.weekly_totals)
    ));
    s.push_str(&format!("Average per day: {avg} kcal (target {target} kcal)\n"));
    s
}

pub fn day_detail(day: &DayPlan) -> String {
    let mut s = String::new();
    s.push_str(&format!("## {} {}\n\n", day.date.weekday(), day.date));
    for meal in &day.meals {
        s.push_str(&format!("{} ({} kcal)\n", title(meal.meal_type), meal.totals.calories));
        if meal.recipes.is_empty() {
            s.push_str("  (nothing selected)\n");
        }
        for r in &meal.recipes {
            s.push_str(&format!("  - {} ({} kcal, {} min)\n", r.name, r.calories_per_serving, r.total_time));
        }
    }
    s.push_str(&format!("\nTotal: {} kcal  {}\n", day.totals.calories, macros(&day.totals)));
    s
}

fn diet_labels(r: &Recipe) -> Vec<&'static str> {
    let mut labels = Vec::new();
    if r.is_vegan {
        labels.push("vegan");
    } else if r.is_vegetarian {
        labels.push("vegetarian");
    }
    if r.is_gluten_free {
        labels.push("gluten-free");
    }
    if r.is_dairy_free {
        labels.push("dairy-free");
    }
    labels
}

pub fn recipe_line(r: &Recipe) -> String {
    let mut s = format!(
        "{:>3}  {} [{}]  {} min, {} kcal",
        r.id, r.name, r.category, r.total_time, r.calories_per_serving
    );
    let labels = diet_labels(r);
    if !labels.is_empty() {
        s.push_str(&format!("  ({})", labels.join(", ")));
    }
    s
}

pub fn recipe_detail(r: &Recipe) -> String {
    let mut s = String::new();
    s.push_str(&format!("# {}\n\n", r.name));
    if let Some(d) = &r.description {
        s.push_str(&format!("{d}\n\n"));
    }
    s.push_str(&format!("Category: {}\n", r.category));
    s.push_str(&format!("Time: {} min\n", r.total_time));
    s.push_str(&format!(
        "Per serving: {} kcal  {}  fiber {:.0}g\n",
        r.calories_per_serving,
        macros(&r.nutrition()),
        r.fiber_grams
    ));
    let labels = diet_labels(r);
    if !labels.is_empty() {
        s.push_str(&format!("Diet: {}\n", labels.join(", ")));
    }
    if !r.tags.is_empty() {
        s.push_str(&format!("Tags: {}\n", r.tags.join(", ")));
    }
    if !r.ingredients.is_empty() {
        s.push_str("\nIngredients:\n");
        for i in &r.ingredients {
            s.push_str(&format!("- {i}\n"));
        }
    }
    if !r.instructions.is_empty() {
        s.push_str("\nSteps:\n");
        for (n, step) in r.instructions.iter().enumerate() {
            s.push_str(&format!("{}. {step}\n", n + 1));
        }
    }
    s
}

pub fn stats_view(stats: &CatalogStats) -> String {
    let mut s = String::new();
    s.push_str(&format!("Recipes: {}\n", stats.total_recipes));
    s.push_str(&format!("Average time: {} min\n", stats.avg_time_minutes));
    s.push_str(&format!("Average calories: {} kcal\n", stats.avg_calories));
    s.push_str(&format!("Vegetarian: {}%\n", stats.vegetarian_percentage));
    if !stats.categories.is_empty() {
        s.push_str("\nCategories:\n");
        for c in &stats.categories {
            s.push_str(&format!("- {}: {}\n", c.name, c.recipe_count));
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use platewise_catalog::sample_catalog;
    use platewise_core::{DaySelection, MealSlot, assemble};

    fn plan() -> WeeklyPlan {
        let catalog = sample_catalog().unwrap();
        let by_id = |id: u64| catalog.iter().find(|r| r.id == id).cloned().unwrap();
        let day = DaySelection {
            slots: vec![
                MealSlot::new(MealType::Breakfast, vec![by_id(8)]),
                MealSlot::new(MealType::Lunch, vec![by_id(3)]),
                MealSlot::empty(MealType::Dinner),
            ],
        };
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 11).unwrap();
        assemble("user", sunday, &[day], 2).unwrap()
    }

    #[test]
    fn test_week_summary() {
        let out = week_summary(&plan(), PlanSource::Fallback, 1800);
        assert!(out.starts_with("# Week of 2026-10-11 (fallback plan)"));
        assert!(out.contains(" 1. Sun 2026-10-11    496 kcal"));
        assert!(out.contains(" 2. Mon 2026-10-12      0 kcal"));
        assert!(out.contains("Average per day: 248 kcal (target 1800 kcal)"));
    }

    #[test]
    fn test_day_detail_marks_empty_meals() {
        let p = plan();
        let out = day_detail(&p.days[0]);
        assert!(out.contains("Breakfast (198 kcal)\n  - Green Detox Smoothie (198 kcal, 6 min)"));
        assert!(out.contains("Dinner (0 kcal)\n  (nothing selected)"));
        assert!(out.contains("Total: 496 kcal"));
    }

    #[test]
    fn test_recipe_views() {
        let catalog = sample_catalog().unwrap();
        let quinoa = &catalog[0];
        assert_eq!(
            recipe_line(quinoa),
            "  1  Mediterranean Quinoa Bowl [Bowls]  20 min, 385 kcal  (vegetarian, gluten-free)"
        );
        let detail = recipe_detail(quinoa);
        assert!(detail.contains("Per serving: 385 kcal  P 14g  C 58g  F 12g  fiber 8g"));
        assert!(detail.contains("- feta cheese"));
    }
}
