//! Studio configuration: TOML file, environment overrides, validation.
//!
//! ```toml
//! max_iterations = 2
//!
//! [retry]
//! max_retries = 2
//! base_delay_secs = 10
//!
//! [provider]
//! kind = "ollama"
//! model = "gemma3:270m"
//! base_url = "http://localhost:11434"
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StudioError;
use crate::retry::RetryPolicy;

pub const DEFAULT_MAX_ITERATIONS: u32 = 2;

const GEMINI_DEFAULT_MODEL: &str = "gemini-2.5-flash";
const GEMINI_DEFAULT_URL: &str = "https://generativelanguage.googleapis.com";
const OLLAMA_DEFAULT_MODEL: &str = "gemma3:270m";
const OLLAMA_DEFAULT_URL: &str = "http://localhost:11434";

/// Which completion backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Gemini,
    Ollama,
}

impl FromStr for ProviderKind {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            other => Err(StudioError::Config(format!(
                "unknown provider kind '{}' (expected gemini or ollama)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub model: Option<String>,
    pub base_url: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl ProviderConfig {
    pub fn model_or_default(&self) -> String {
        self.model.clone().unwrap_or_else(|| {
            match self.kind {
                ProviderKind::Gemini => GEMINI_DEFAULT_MODEL,
                ProviderKind::Ollama => OLLAMA_DEFAULT_MODEL,
            }
            .to_string()
        })
    }

    pub fn base_url_or_default(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            match self.kind {
                ProviderKind::Gemini => GEMINI_DEFAULT_URL,
                ProviderKind::Ollama => OLLAMA_DEFAULT_URL,
            }
            .to_string()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Upper bound on propose/review rounds per request.
    pub max_iterations: u32,
    /// Backoff applied to every agent's completion call.
    pub retry: RetryPolicy,
    pub provider: ProviderConfig,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            retry: RetryPolicy::default(),
            provider: ProviderConfig::default(),
        }
    }
}

impl StudioConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, StudioError> {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    /// Parse a TOML file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, StudioError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StudioError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, StudioError> {
        toml::from_str(content)
            .map_err(|e| StudioError::Config(format!("failed to parse studio config: {}", e)))
    }

    /// Overlay `STUDIO_*` / `GEMINI_API_KEY` values returned by `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, StudioError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(kind) = lookup("STUDIO_PROVIDER") {
            self.provider.kind = kind.parse()?;
        }
        if let Some(model) = lookup("STUDIO_MODEL") {
            self.provider.model = Some(model);
        }
        if let Some(url) = lookup("STUDIO_BASE_URL") {
            self.provider.base_url = Some(url);
        }
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.provider.api_key = Some(key);
        }
        if let Some(raw) = lookup("STUDIO_MAX_ITERATIONS") {
            self.max_iterations = raw.trim().parse().map_err(|_| {
                StudioError::Config(format!("STUDIO_MAX_ITERATIONS must be a number, got '{}'", raw))
            })?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), StudioError> {
        if self.max_iterations == 0 {
            return Err(StudioError::Config(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = StudioConfig::default();
        assert_eq!(config.max_iterations, 2);
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.retry.base_delay_secs, 10);
        assert_eq!(config.provider.kind, ProviderKind::Gemini);
        assert_eq!(config.provider.model_or_default(), "gemini-2.5-flash");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = StudioConfig::from_toml_str(
            r#"
            [provider]
            kind = "ollama"
            "#,
        )
        .unwrap();
        assert_eq!(config.max_iterations, 2);
        assert_eq!(config.provider.kind, ProviderKind::Ollama);
        assert_eq!(config.provider.base_url_or_default(), "http://localhost:11434");
        assert_eq!(config.provider.model_or_default(), "gemma3:270m");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "max_iterations = 1\n[retry]\nmax_retries = 0\nbase_delay_secs = 1"
        )
        .unwrap();
        let config = StudioConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_iterations, 1);
        assert_eq!(config.retry, RetryPolicy { max_retries: 0, base_delay_secs: 1 });
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = StudioConfig::from_file(Path::new("/nonexistent/studio.toml")).unwrap_err();
        assert!(matches!(err, StudioError::Config(_)));
    }

    #[test]
    fn test_env_overlay() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("STUDIO_PROVIDER", "Ollama"),
            ("STUDIO_MODEL", "llama3"),
            ("STUDIO_MAX_ITERATIONS", "3"),
        ]);
        let config = StudioConfig::default()
            .with_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.provider.kind, ProviderKind::Ollama);
        assert_eq!(config.provider.model_or_default(), "llama3");
        assert_eq!(config.max_iterations, 3);
    }

    #[test]
    fn test_env_rejects_garbage() {
        let bad_kind = StudioConfig::default().with_env(|key| {
            (key == "STUDIO_PROVIDER").then(|| "openai".to_string())
        });
        assert!(bad_kind.is_err());

        let bad_iterations = StudioConfig::default().with_env(|key| {
            (key == "STUDIO_MAX_ITERATIONS").then(|| "two".to_string())
        });
        assert!(bad_iterations.is_err());
    }

    #[test]
    fn test_zero_iterations_invalid() {
        let config = StudioConfig {
            max_iterations: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(StudioError::Config(_))));
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut config = StudioConfig::default();
        config.provider.api_key = Some("secret".into());
        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("secret"));
    }
}
