//! Meal-plan orchestration.
//!
//! Idle -> Requesting -> Parsing -> Assembling -> Done, or on any AI failure
//! Requesting/Parsing -> FallbackGenerating -> Assembling -> Done.
//! Exactly one generator call per invocation, no retries, and the fallback
//! never runs concurrently with the AI request.

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::assembler::{assemble, check_date_range};
use crate::error::PlanError;
use crate::fallback::select_days;
use crate::filter::filter_by_profile;
use crate::generator::{TextGenerator, request_plan};
use crate::plan::{DaySelection, WeeklyPlan};
use crate::profile::UserProfile;
use crate::prompt::build_prompt;
use crate::recipe::Recipe;
use crate::response::try_parse_response;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanState {
    Idle,
    Requesting,
    Parsing,
    RequestFailed,
    FallbackGenerating,
    Assembling,
    Done,
}

/// Which path produced the day selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSource {
    Ai,
    Fallback,
}

/// Inputs for one planning run.
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest<'a> {
    pub profile: &'a UserProfile,
    pub catalog: &'a [Recipe],
    pub days: u32,
    pub week_start: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPlan {
    pub plan: WeeklyPlan,
    pub source: PlanSource,
    /// Why the AI path was abandoned, when it was.
    pub fallback_reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MealPlanOrchestrator<G> {
    generator: G,
}

impl<G: TextGenerator> MealPlanOrchestrator<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Produce a complete weekly plan. Only assembly failures are returned
    /// as errors; AI failures are answered with the fallback planner.
    pub async fn generate(&self, request: &PlanRequest<'_>) -> Result<GeneratedPlan, PlanError> {
        let filtered = filter_by_profile(request.catalog, request.profile);
        let ai = self.ai_selections(request, &filtered).await;
        let mut rng = rand::rng();
        finish(request, &filtered, ai, &mut rng)
    }

    /// [`generate`](Self::generate) with a caller-supplied RNG for the fallback path.
    pub async fn generate_with_rng<R: Rng + Send + ?Sized>(
        &self,
        request: &PlanRequest<'_>,
        rng: &mut R,
    ) -> Result<GeneratedPlan, PlanError> {
        let filtered = filter_by_profile(request.catalog, request.profile);
        let ai = self.ai_selections(request, &filtered).await;
        finish(request, &filtered, ai, rng)
    }

    async fn ai_selections(
        &self,
        request: &PlanRequest<'_>,
        filtered: &[Recipe],
    ) -> Result<Vec<DaySelection>, PlanError> {
        debug!(
            state = ?PlanState::Idle,
            recipes = filtered.len(),
            days = request.days,
            "planning started"
        );

        let prompt = build_prompt(request.profile, filtered, request.days);
        debug!(state = ?PlanState::Requesting, prompt_len = prompt.len(), "sending prompt");
        let raw = match request_plan(&self.generator, &prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(state = ?PlanState::RequestFailed, error = %e, "AI request failed");
                return Err(e);
            }
        };

        debug!(state = ?PlanState::Parsing, response_len = raw.len(), "parsing AI response");
        let days = try_parse_response(&raw, filtered)?;
        if days.iter().all(DaySelection::is_empty) {
            return Err(PlanError::MalformedAiResponse(
                "no day contained a known recipe".into(),
            ));
        }
        Ok(days)
    }
}

fn finish<R: Rng + ?Sized>(
    request: &PlanRequest<'_>,
    filtered: &[Recipe],
    ai: Result<Vec<DaySelection>, PlanError>,
    rng: &mut R,
) -> Result<GeneratedPlan, PlanError> {
    check_date_range(request.week_start, request.days)?;
    let (selections, source, fallback_reason) = match ai {
        Ok(days) => (days, PlanSource::Ai, None),
        Err(e) if e.is_recoverable() => {
            info!(state = ?PlanState::FallbackGenerating, reason = %e, "using fallback planner");
            let days = select_days(request.profile, filtered, request.days, rng);
            (days, PlanSource::Fallback, Some(e.to_string()))
        }
        Err(e) => return Err(e),
    };

    debug!(state = ?PlanState::Assembling, ?source, "assembling plan");
    let plan = assemble(
        request.profile.user_id(),
        request.week_start,
        &selections,
        request.days,
    )?;

    info!(
        state = ?PlanState::Done,
        ?source,
        days = plan.days.len(),
        weekly_calories = plan.weekly_totals.calories,
        "meal plan ready"
    );
    Ok(GeneratedPlan {
        plan,
        source,
        fallback_reason,
    })
}
