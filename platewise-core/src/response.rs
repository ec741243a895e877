//! Parsing of the language model's free-text reply.
//!
//! The reply is untrusted. We take the span from the first `{` to the last
//! `}`, parse it as JSON, and walk it defensively. Recipe names are resolved
//! case-insensitively against the catalog; unknown names are dropped.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::PlanError;
use crate::plan::{DaySelection, MealSlot, MealType};
use crate::recipe::Recipe;

static JSON_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// JSON keys under `meals` and the slot each feeds. Breakfast, lunch and
/// dinner are always emitted; the others only when the key is present.
const MEAL_KEYS: [(&str, MealType, bool); 5] = [
    ("breakfast", MealType::Breakfast, true),
    ("lunch", MealType::Lunch, true),
    ("dinner", MealType::Dinner, true),
    ("snacks", MealType::Snack, false),
    ("smoothies", MealType::Smoothie, false),
];

/// Parse a reply into per-day selections. `None` means "use the fallback".
/// Never panics.
pub fn parse_response(raw: &str, catalog: &[Recipe]) -> Option<Vec<DaySelection>> {
    match try_parse_response(raw, catalog) {
        Ok(days) => Some(days),
        Err(e) => {
            debug!(error = %e, "discarding AI response");
            None
        }
    }
}

/// Same as [`parse_response`] but reports why the reply was rejected.
pub fn try_parse_response(raw: &str, catalog: &[Recipe]) -> Result<Vec<DaySelection>, PlanError> {
    let block = extract_json_block(raw)
        .ok_or_else(|| PlanError::MalformedAiResponse("no JSON object found".into()))?;

    let value: Value = serde_json::from_str(block)
        .map_err(|e| PlanError::MalformedAiResponse(format!("invalid JSON: {e}")))?;

    let days = value
        .get("days")
        .and_then(Value::as_array)
        .ok_or_else(|| PlanError::MalformedAiResponse("missing \"days\" array".into()))?;

    let by_name: HashMap<String, &Recipe> = catalog
        .iter()
        .map(|r| (r.name.trim().to_lowercase(), r))
        .collect();

    Ok(days.iter().map(|d| parse_day(d, &by_name)).collect())
}

/// Greedy span from the first `{` to the last `}`.
pub fn extract_json_block(raw: &str) -> Option<&str> {
    JSON_BLOCK.find(raw).map(|m| m.as_str())
}

fn parse_day(day: &Value, by_name: &HashMap<String, &Recipe>) -> DaySelection {
    let meals = day.get("meals");
    let mut slots = Vec::new();

    for (key, meal_type, always) in MEAL_KEYS {
        match meals.and_then(|m| m.get(key)) {
            Some(names) => slots.push(MealSlot::new(meal_type, resolve_names(names, by_name))),
            None if always => slots.push(MealSlot::empty(meal_type)),
            None => {}
        }
    }

    DaySelection { slots }
}

fn resolve_names(names: &Value, by_name: &HashMap<String, &Recipe>) -> Vec<Recipe> {
    let Some(list) = names.as_array() else {
        return Vec::new();
    };
    list.iter()
        .filter_map(Value::as_str)
        .filter_map(|n| by_name.get(&n.trim().to_lowercase()))
        .map(|r| (*r).clone())
        .collect()
}
