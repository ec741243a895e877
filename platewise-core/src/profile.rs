//! User dietary profile.
//!
//! Built by the setup flow and handed to the planner on every request. The
//! planner treats it as validated input and performs no range checks.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::nutrition::parse_activity_level;

/// Fallback user id when a profile was never assigned one.
pub const DEFAULT_USER_ID: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    LoseFat,
    MaintainWeight,
    BuildMuscle,
    GainWeight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtremelyActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietType {
    Anything,
    Vegetarian,
    Vegan,
    Keto,
    Paleo,
    Mediterranean,
    Carnivore,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Other => "other",
        }
    }
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::LoseFat => "lose_fat",
            Goal::MaintainWeight => "maintain_weight",
            Goal::BuildMuscle => "build_muscle",
            Goal::GainWeight => "gain_weight",
        }
    }
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtremelyActive => "extremely_active",
        }
    }
}

impl DietType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DietType::Anything => "anything",
            DietType::Vegetarian => "vegetarian",
            DietType::Vegan => "vegan",
            DietType::Keto => "keto",
            DietType::Paleo => "paleo",
            DietType::Mediterranean => "mediterranean",
            DietType::Carnivore => "carnivore",
        }
    }
}

macro_rules! display_as_str {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Sex, Goal, ActivityLevel, DietType);

/// A user's body metrics, goal and food preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Years.
    pub age: u32,
    pub sex: Sex,
    /// Centimetres.
    pub height_cm: f64,
    /// Kilograms.
    pub weight_kg: f64,

    pub goal: Goal,
    /// Missing, null or unrecognised levels read as sedentary.
    #[serde(default = "default_activity_level", deserialize_with = "lenient_activity_level")]
    pub activity_level: ActivityLevel,
    pub diet_type: DietType,

    /// Lowercase terms; a recipe mentioning any of them is excluded.
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
    #[serde(default)]
    pub favorites: Vec<String>,

    #[serde(default = "default_meals_per_day")]
    pub meals_per_day: u32,
    #[serde(default)]
    pub include_snacks: bool,
    #[serde(default)]
    pub include_smoothies: bool,
}

fn default_meals_per_day() -> u32 {
    3
}

fn default_activity_level() -> ActivityLevel {
    ActivityLevel::Sedentary
}

fn lenient_activity_level<'de, D: Deserializer<'de>>(d: D) -> Result<ActivityLevel, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.as_deref().map_or_else(default_activity_level, parse_activity_level))
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            age: 25,
            sex: Sex::Female,
            height_cm: 165.0,
            weight_kg: 65.0,
            goal: Goal::LoseFat,
            activity_level: ActivityLevel::ModeratelyActive,
            diet_type: DietType::Anything,
            allergies: Vec::new(),
            dislikes: Vec::new(),
            favorites: Vec::new(),
            meals_per_day: default_meals_per_day(),
            include_snacks: false,
            include_smoothies: false,
        }
    }
}

impl UserProfile {
    /// Id used to key stored plans.
    pub fn user_id(&self) -> &str {
        self.id.as_deref().unwrap_or(DEFAULT_USER_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names() {
        let json = serde_json::to_string(&ActivityLevel::ModeratelyActive).unwrap();
        assert_eq!(json, "\"moderately_active\"");
        let goal: Goal = serde_json::from_str("\"build_muscle\"").unwrap();
        assert_eq!(goal, Goal::BuildMuscle);
        assert_eq!(DietType::Mediterranean.to_string(), "mediterranean");
    }

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let json = r#"{
            "age": 30, "sex": "male", "height_cm": 175, "weight_kg": 70,
            "goal": "maintain_weight", "activity_level": "sedentary", "diet_type": "vegan"
        }"#;
        let p: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(p.meals_per_day, 3);
        assert!(!p.include_snacks);
        assert!(p.allergies.is_empty());
        assert_eq!(p.user_id(), DEFAULT_USER_ID);
    }

    #[test]
    fn test_unknown_or_missing_activity_level_is_sedentary() {
        let base = r#""age": 30, "sex": "male", "height_cm": 175, "weight_kg": 70,
            "goal": "maintain_weight", "diet_type": "anything""#;

        let couch: UserProfile =
            serde_json::from_str(&format!(r#"{{{base}, "activity_level": "couch"}}"#)).unwrap();
        assert_eq!(couch.activity_level, ActivityLevel::Sedentary);

        let missing: UserProfile = serde_json::from_str(&format!("{{{base}}}")).unwrap();
        assert_eq!(missing.activity_level, ActivityLevel::Sedentary);
        assert_eq!(crate::nutrition::activity_factor(missing.activity_level), 1.2);

        let null: UserProfile =
            serde_json::from_str(&format!(r#"{{{base}, "activity_level": null}}"#)).unwrap();
        assert_eq!(null.activity_level, ActivityLevel::Sedentary);

        let known: UserProfile =
            serde_json::from_str(&format!(r#"{{{base}, "activity_level": "very_active"}}"#)).unwrap();
        assert_eq!(known.activity_level, ActivityLevel::VeryActive);
    }

    #[test]
    fn test_activity_level_round_trips_through_json() {
        let p = UserProfile {
            activity_level: ActivityLevel::ExtremelyActive,
            ..UserProfile::default()
        };
        let back: UserProfile = serde_json::from_str(&serde_json::to_string(&p).unwrap()).unwrap();
        assert_eq!(back, p);
    }
}
