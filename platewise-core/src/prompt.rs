//! Prompt construction for the AI meal-plan request.

use crate::nutrition::profile_calorie_target;
use crate::profile::UserProfile;
use crate::recipe::Recipe;

/// Build the natural-language request sent to the text generator.
///
/// The prompt embeds the profile, the computed daily calorie target, the
/// recipe list the model must choose from, and the JSON shape the response
/// parser expects.
pub fn build_prompt(profile: &UserProfile, catalog: &[Recipe], days: u32) -> String {
    let target = profile_calorie_target(profile);
    let mut s = String::new();

    s.push_str(&format!(
        "Create a {days}-day meal plan for a {}-year-old {} who is {}cm tall and weighs {}kg.\n",
        profile.age, profile.sex, profile.height_cm, profile.weight_kg
    ));
    s.push('\n');
    s.push_str(&format!("Goal: {}\n", profile.goal));
    s.push_str(&format!("Activity Level: {}\n", profile.activity_level));
    s.push_str(&format!("Diet Type: {}\n", profile.diet_type));
    s.push_str(&format!("Daily Calorie Target: {target}\n"));
    s.push_str(&format!("Allergies: {}\n", join_or_none(&profile.allergies)));
    s.push_str(&format!("Dislikes: {}\n", join_or_none(&profile.dislikes)));
    s.push_str(&format!("Favorites: {}\n", join_or_none(&profile.favorites)));

    s.push_str("\nAvailable Recipes:\n");
    for r in catalog {
        s.push_str(&format!(
            "- {} ({} cal, {}, {})\n",
            r.name,
            r.calories_per_serving,
            r.category,
            r.tags.join(", ")
        ));
    }

    let mut requirements = vec![
        "Only use recipe names exactly as listed above".to_string(),
        "Avoid recipes containing allergies and dislikes".to_string(),
        "Prioritize favorite ingredients when possible".to_string(),
        "Follow the specified diet type restrictions".to_string(),
        "Balance macronutrients appropriately for the goal".to_string(),
        format!("Include {} main meals per day", profile.meals_per_day),
        "Vary recipes throughout the week".to_string(),
        "Stay within the daily calorie target".to_string(),
    ];
    if profile.include_snacks {
        requirements.push("Include one snack per day".to_string());
    }
    if profile.include_smoothies {
        requirements.push("Include one smoothie per day under \"smoothies\"".to_string());
    }

    s.push_str("\nRequirements:\n");
    for (i, req) in requirements.iter().enumerate() {
        s.push_str(&format!("{}. {req}\n", i + 1));
    }

    s.push_str(
        r#"
Return a JSON object with exactly this shape and no other JSON:
{
  "days": [
    {
      "day": 1,
      "date": "YYYY-MM-DD",
      "meals": {
        "breakfast": ["Recipe Name"],
        "lunch": ["Recipe Name"],
        "dinner": ["Recipe Name"],
        "snacks": ["Recipe Name"]
      },
      "totalCalories": 1800
    }
  ]
}
"#,
    );
    s
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}
