use async_trait::async_trait;
use chrono::NaiveDate;
use platewise_catalog::{CatalogStats, RecipeQuery, sample_catalog};
use platewise_core::{
    DietType, MealPlanOrchestrator, MealType, NutritionTotals, OfflineGenerator, PlanRequest,
    PlanSource, TextGenerator, UserProfile, filter_by_profile, week_start_for,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

struct Reply(&'static str);

#[async_trait]
impl TextGenerator for Reply {
    async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok(self.0.to_string())
    }

    fn name(&self) -> &str {
        "reply"
    }
}

fn vegan_no_peanut() -> UserProfile {
    UserProfile {
        diet_type: DietType::Vegan,
        allergies: vec!["peanut".into()],
        ..UserProfile::default()
    }
}

fn sunday() -> NaiveDate {
    week_start_for(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
}

/// Offline run over the bundled catalog: every chosen recipe respects the
/// profile and totals chain up from meals to the week.
#[tokio::test]
async fn test_offline_week_respects_profile() {
    let catalog = sample_catalog().unwrap();
    let profile = vegan_no_peanut();
    let allowed = filter_by_profile(&catalog, &profile);
    assert!(allowed.iter().all(|r| r.is_vegan));
    assert!(!allowed.iter().any(|r| r.name == "Hemp Seed Energy Balls"));

    let orch = MealPlanOrchestrator::new(OfflineGenerator);
    let req = PlanRequest {
        profile: &profile,
        catalog: &catalog,
        days: 7,
        week_start: sunday(),
    };
    let mut rng = StdRng::seed_from_u64(2026);
    let out = orch.generate_with_rng(&req, &mut rng).await.unwrap();

    assert_eq!(out.source, PlanSource::Fallback);
    assert_eq!(out.plan.days.len(), 7);
    assert_eq!(out.plan.week_start, NaiveDate::from_ymd_opt(2026, 10, 11).unwrap());
    for (i, day) in out.plan.days.iter().enumerate() {
        assert_eq!(day.date, sunday() + chrono::Duration::days(i as i64));
        assert_eq!(day.meals.len(), 3);
        assert!(day.meal(MealType::Snack).is_none());
        for meal in &day.meals {
            assert_eq!(meal.recipes.len(), 1, "{} on day {i}", meal.meal_type);
        }
        let meal_sum: NutritionTotals = day.meals.iter().map(|m| m.totals).sum();
        assert_eq!(day.totals, meal_sum);
    }
    for r in out.plan.recipes() {
        assert!(allowed.contains(r), "{} is not allowed", r.name);
    }
    let week: NutritionTotals = out.plan.days.iter().map(|d| d.totals).sum();
    assert_eq!(out.plan.weekly_totals, week);
}

#[tokio::test]
async fn test_snacks_add_a_slot_from_the_snack_bucket() {
    let catalog = sample_catalog().unwrap();
    let profile = UserProfile {
        include_snacks: true,
        ..UserProfile::default()
    };
    let orch = MealPlanOrchestrator::new(OfflineGenerator);
    let req = PlanRequest {
        profile: &profile,
        catalog: &catalog,
        days: 7,
        week_start: sunday(),
    };
    let mut rng = StdRng::seed_from_u64(5);
    let out = orch.generate_with_rng(&req, &mut rng).await.unwrap();
    for day in &out.plan.days {
        let snack = day.meal(MealType::Snack).unwrap();
        assert_eq!(snack.recipes.len(), 1);
        assert_eq!(snack.recipes[0].category, "Snacks");
    }
}

/// The model suggests a salmon bowl to a vegan; it never reaches the plan.
#[tokio::test]
async fn test_ai_suggestions_outside_profile_are_dropped() {
    let catalog = sample_catalog().unwrap();
    let profile = vegan_no_peanut();
    let orch = MealPlanOrchestrator::new(Reply(
        r#"Sure! {"days":[{"day":1,"meals":{
            "breakfast":["green detox smoothie"],
            "lunch":["Lentil Turmeric Soup","Hemp Seed Energy Balls"],
            "dinner":["Salmon Omega Bowl"],
            "snacks":[]},"totalCalories":5000}]}"#,
    ));
    let req = PlanRequest {
        profile: &profile,
        catalog: &catalog,
        days: 1,
        week_start: sunday(),
    };
    let out = orch.generate(&req).await.unwrap();

    assert_eq!(out.source, PlanSource::Ai);
    let day = &out.plan.days[0];
    let names: Vec<_> = day.recipes().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Green Detox Smoothie", "Lentil Turmeric Soup"]);
    assert_eq!(day.totals.calories, 198 + 298);
    assert!(day.meal(MealType::Dinner).unwrap().recipes.is_empty());
}

#[test]
fn test_search_and_stats_agree_on_vegetarian_share() {
    let catalog = sample_catalog().unwrap();
    let vegetarian = RecipeQuery {
        vegetarian: true,
        ..Default::default()
    }
    .apply(&catalog)
    .len();
    let stats = CatalogStats::from_recipes(&catalog);
    let expected = (vegetarian as f64 / catalog.len() as f64 * 100.0).round() as u32;
    assert_eq!(stats.vegetarian_percentage, expected);
}
