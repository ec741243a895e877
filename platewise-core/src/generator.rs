//! Text-generator seam.
//!
//! Concrete providers (Gemini, Anthropic, OpenAI) live in the CLI. The core
//! only needs "prompt in, text out" and treats every failure the same way.

use async_trait::async_trait;
use tracing::debug;

use crate::error::PlanError;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send one prompt and return the model's reply text.
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;

    /// Short provider label for logs.
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        (**self).generate(prompt).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// A generator that is never reachable. Forces the fallback planner.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGenerator;

#[async_trait]
impl TextGenerator for OfflineGenerator {
    async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
        anyhow::bail!("offline mode: no text generator configured")
    }

    fn name(&self) -> &str {
        "offline"
    }
}

/// Invoke the generator once. Any failure becomes [`PlanError::AiUnavailable`];
/// no retry is attempted.
pub async fn request_plan<G: TextGenerator + ?Sized>(
    generator: &G,
    prompt: &str,
) -> Result<String, PlanError> {
    debug!(provider = generator.name(), prompt_len = prompt.len(), "requesting meal plan");
    generator
        .generate(prompt)
        .await
        .map_err(|e| PlanError::AiUnavailable(format!("{}: {e:#}", generator.name())))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
            Ok(format!("echo: {prompt}"))
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test]
    async fn test_request_returns_text_verbatim() {
        let out = request_plan(&Echo, "hi").await.unwrap();
        assert_eq!(out, "echo: hi");
    }

    #[tokio::test]
    async fn test_failure_maps_to_ai_unavailable() {
        let err = request_plan(&OfflineGenerator, "hi").await.unwrap_err();
        assert!(matches!(err, PlanError::AiUnavailable(_)));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_boxed_generator_delegates() {
        let boxed: Box<dyn TextGenerator> = Box::new(Echo);
        assert_eq!(boxed.name(), "echo");
        assert_eq!(request_plan(&boxed, "x").await.unwrap(), "echo: x");
    }
}
