//! Planner error taxonomy.
//!
//! `AiUnavailable` and `MalformedAiResponse` are recovered inside the
//! orchestrator by switching to the fallback planner. `Assembly` is the only
//! variant a caller ever sees from [`crate::MealPlanOrchestrator::generate`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("text generator unavailable: {0}")]
    AiUnavailable(String),

    #[error("malformed AI response: {0}")]
    MalformedAiResponse(String),

    #[error("plan assembly failed: {0}")]
    Assembly(String),
}

impl PlanError {
    /// True for failures the orchestrator answers with the fallback planner.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PlanError::AiUnavailable(_) | PlanError::MalformedAiResponse(_))
    }
}
