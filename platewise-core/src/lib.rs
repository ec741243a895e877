//! platewise-core: meal-plan generation and nutrition aggregation

pub mod assembler;
pub mod error;
pub mod fallback;
pub mod filter;
pub mod generator;
pub mod nutrition;
pub mod orchestrator;
pub mod plan;
pub mod profile;
pub mod prompt;
pub mod recipe;
pub mod response;
pub mod week;

#[cfg(test)]
pub(crate) mod testing;

pub use assembler::assemble;
pub use error::PlanError;
pub use fallback::{generate_fallback, select_days, slots_for, source_categories};
pub use filter::{filter_by_profile, matches_profile};
pub use generator::{OfflineGenerator, TextGenerator, request_plan};
pub use nutrition::{
    NutritionTotals, activity_factor, daily_calorie_target, goal_adjustment,
    profile_calorie_target, resting_rate,
};
pub use orchestrator::{GeneratedPlan, MealPlanOrchestrator, PlanRequest, PlanSource, PlanState};
pub use plan::{DayPlan, DaySelection, Meal, MealSlot, MealType, WeeklyPlan};
pub use profile::{ActivityLevel, DietType, Goal, Sex, UserProfile, DEFAULT_USER_ID};
pub use prompt::build_prompt;
pub use recipe::{Recipe, normalize_category};
pub use response::{extract_json_block, parse_response, try_parse_response};
pub use week::{current_week_start, today_in, week_start_for};
