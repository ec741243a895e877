use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::llm::ProviderKind;

/// API keys saved by `platewise auth set-key`. Environment variables win.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AuthState {
    pub gemini_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

impl AuthState {
    fn slot(&mut self, provider: ProviderKind) -> &mut Option<String> {
        match provider {
            ProviderKind::Gemini => &mut self.gemini_api_key,
            ProviderKind::Anthropic => &mut self.anthropic_api_key,
            ProviderKind::OpenAI => &mut self.openai_api_key,
        }
    }

    fn stored(&self, provider: ProviderKind) -> Option<&str> {
        match provider {
            ProviderKind::Gemini => self.gemini_api_key.as_deref(),
            ProviderKind::Anthropic => self.anthropic_api_key.as_deref(),
            ProviderKind::OpenAI => self.openai_api_key.as_deref(),
        }
    }
}

fn auth_path(home: &Path) -> PathBuf {
    home.join("auth.json")
}

pub fn load_auth(home: &Path) -> Result<AuthState> {
    let p = auth_path(home);
    if !p.exists() {
        return Ok(AuthState::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_auth(home: &Path, auth: &AuthState) -> Result<()> {
    let p = auth_path(home);
    let s = serde_json::to_string_pretty(auth)?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// Key for `provider`: its environment variable first, then auth.json.
pub fn resolve_key(auth: &AuthState, provider: ProviderKind) -> Option<String> {
    std::env::var(provider.env_var())
        .ok()
        .filter(|k| !k.trim().is_empty())
        .or_else(|| auth.stored(provider).map(str::to_string))
}

pub fn check_key(provider: ProviderKind, key: &str) -> Result<()> {
    let prefix = provider.key_prefix();
    if key.is_empty() {
        bail!("no key entered");
    }
    if !key.starts_with(prefix) {
        bail!("key didn't look like a {provider} key (expected prefix {prefix})");
    }
    Ok(())
}

fn prompt_secret(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

pub fn set_key(home: &Path, provider: ProviderKind) -> Result<()> {
    let key = prompt_secret(&format!(
        "Paste {provider} API key (starts with {})",
        provider.key_prefix()
    ))?;
    check_key(provider, &key)?;

    let mut auth = load_auth(home)?;
    *auth.slot(provider) = Some(key);
    save_auth(home, &auth)?;
    println!("Saved {provider} API key to {}", auth_path(home).display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_prefixes() {
        assert!(check_key(ProviderKind::Anthropic, "sk-ant-abc").is_ok());
        assert!(check_key(ProviderKind::Anthropic, "sk-abc").is_err());
        assert!(check_key(ProviderKind::OpenAI, "sk-proj-1").is_ok());
        assert!(check_key(ProviderKind::Gemini, "AIzaSyExample").is_ok());
        assert!(check_key(ProviderKind::Gemini, "").is_err());
    }

    #[test]
    fn test_auth_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_auth(dir.path()).unwrap(), AuthState::default());

        let mut auth = AuthState::default();
        *auth.slot(ProviderKind::OpenAI) = Some("sk-test".into());
        save_auth(dir.path(), &auth).unwrap();

        let loaded = load_auth(dir.path()).unwrap();
        assert_eq!(loaded.stored(ProviderKind::OpenAI), Some("sk-test"));
        assert_eq!(loaded.stored(ProviderKind::Gemini), None);
    }
}
