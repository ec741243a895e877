use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use clap::ValueEnum;
use platewise_core::{OfflineGenerator, TextGenerator};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

use crate::auth::{AuthState, resolve_key};
use crate::config::LlmSection;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ProviderKind {
    #[serde(rename = "gemini")]
    #[value(name = "gemini")]
    Gemini,
    #[serde(rename = "anthropic")]
    #[value(name = "anthropic")]
    Anthropic,
    #[serde(rename = "openai")]
    #[value(name = "openai")]
    OpenAI,
}

impl ProviderKind {
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-1.5-flash",
            ProviderKind::Anthropic => "claude-3-5-sonnet-latest",
            ProviderKind::OpenAI => "gpt-4o-mini",
        }
    }

    pub fn env_var(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::OpenAI => "OPENAI_API_KEY",
        }
    }

    pub fn key_prefix(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "AIza",
            ProviderKind::Anthropic => "sk-ant-",
            ProviderKind::OpenAI => "sk-",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProviderKind::Gemini => "Gemini",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::OpenAI => "OpenAI",
        })
    }
}

/// A hosted chat model behind the core's text-generator seam.
pub struct LlmGenerator {
    provider: ProviderKind,
    model: String,
    temperature: f32,
    max_tokens: u32,
    api_key: String,
    http: reqwest::Client,
}

/// Pick the generator for this run. Without a key (or with `offline`) the
/// planner gets [`OfflineGenerator`] and goes straight to the fallback path.
pub fn build_generator(cfg: &LlmSection, auth: &AuthState, offline: bool) -> Result<Box<dyn TextGenerator>> {
    if offline {
        return Ok(Box::new(OfflineGenerator));
    }
    let Some(api_key) = resolve_key(auth, cfg.provider) else {
        warn!(
            provider = %cfg.provider,
            "no API key found (set {} or run: platewise auth set-key); using the offline planner",
            cfg.provider.env_var()
        );
        return Ok(Box::new(OfflineGenerator));
    };

    let http = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("building HTTP client")?;

    Ok(Box::new(LlmGenerator {
        provider: cfg.provider,
        model: cfg.model().to_string(),
        temperature: cfg.temperature,
        max_tokens: cfg.max_tokens,
        api_key,
        http,
    }))
}

#[async_trait]
impl TextGenerator for LlmGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(provider = %self.provider, model = %self.model, "calling model");
        match self.provider {
            ProviderKind::Gemini => self.gemini_complete(prompt).await,
            ProviderKind::Anthropic => self.anthropic_complete(prompt).await,
            ProviderKind::OpenAI => self.openai_complete(prompt).await,
        }
    }

    fn name(&self) -> &str {
        match self.provider {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAI => "openai",
        }
    }
}

#[derive(Deserialize)]
struct GeminiResp {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

impl GeminiResp {
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct AnthropicResp {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    t: String,
    text: Option<String>,
}

impl AnthropicResp {
    fn text(self) -> String {
        let mut s = String::new();
        for b in self.content {
            if b.t == "text" {
                if let Some(t) = b.text {
                    s.push_str(&t);
                }
            }
        }
        s
    }
}

#[derive(Deserialize)]
struct OpenAiResp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: Option<String>,
}

impl OpenAiResp {
    fn text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default()
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'static str,
    content: &'a str,
}

impl LlmGenerator {
    async fn gemini_complete(&self, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Part<'a> {
            text: &'a str,
        }

        #[derive(Serialize)]
        struct Content<'a> {
            role: &'static str,
            parts: Vec<Part<'a>>,
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct GenerationConfig {
            temperature: f32,
            max_output_tokens: u32,
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Req<'a> {
            contents: Vec<Content<'a>>,
            generation_config: GenerationConfig,
        }

        let body = Req {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_tokens,
            },
        };

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model
        );
        let resp = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("gemini request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("gemini error: {status} {txt}");
        }

        let out: GeminiResp = resp.json().await.context("parse gemini response")?;
        Ok(out.text().trim().to_string())
    }

    async fn anthropic_complete(&self, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            max_tokens: u32,
            temperature: f32,
            messages: Vec<Msg<'a>>,
        }

        let body = Req {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![Msg {
                role: "user",
                content: prompt,
            }],
        };

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(&self.api_key)?);
        headers.insert("anthropic-version", HeaderValue::from_static("2023-06-01"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let resp = self
            .http
            .post("https://api.anthropic.com/v1/messages")
            .headers(headers)
            .json(&body)
            .send()
            .await
            .context("anthropic request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("anthropic error: {status} {txt}");
        }

        let out: AnthropicResp = resp.json().await.context("parse anthropic response")?;
        Ok(out.text().trim().to_string())
    }

    async fn openai_complete(&self, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
        }

        let body = Req {
            model: &self.model,
            messages: vec![Msg {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let resp = self
            .http
            .post("https://api.openai.com/v1/chat/completions")
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .context("openai request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("openai error: {status} {txt}");
        }

        let out: OpenAiResp = resp.json().await.context("parse openai response")?;
        Ok(out.text().trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_wire_names() {
        assert_eq!(serde_json::to_string(&ProviderKind::OpenAI).unwrap(), "\"openai\"");
        let p: ProviderKind = serde_json::from_str("\"gemini\"").unwrap();
        assert_eq!(p, ProviderKind::Gemini);
        assert_eq!(ProviderKind::from_str("anthropic", true).unwrap(), ProviderKind::Anthropic);
    }

    #[test]
    fn test_gemini_text_joins_parts() {
        let json = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"days\":"},{"text":"[]}"}]},
            "finishReason":"STOP"}]}"#;
        let resp: GeminiResp = serde_json::from_str(json).unwrap();
        assert_eq!(resp.text(), "{\"days\":[]}");

        let blocked: GeminiResp = serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert_eq!(blocked.text(), "");
    }

    #[test]
    fn test_anthropic_text_skips_non_text_blocks() {
        let json = r#"{"content":[{"type":"thinking","thinking":"..."},{"type":"text","text":"hello"}]}"#;
        let resp: AnthropicResp = serde_json::from_str(json).unwrap();
        assert_eq!(resp.text(), "hello");
    }

    #[test]
    fn test_openai_text_takes_first_choice() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"plan"}},{"message":{"content":"other"}}]}"#;
        let resp: OpenAiResp = serde_json::from_str(json).unwrap();
        assert_eq!(resp.text(), "plan");
    }

    #[test]
    fn test_offline_flag_uses_offline_generator() {
        let cfg = LlmSection::default();
        let g = build_generator(&cfg, &AuthState::default(), true).unwrap();
        assert_eq!(g.name(), "offline");
    }
}
