//! Text-completion backends.
//!
//! Agents only see [`TextCompletionProvider`]; the concrete HTTP clients
//! live in submodules. Providers make exactly one request per call and never
//! retry. Backoff belongs to the agent layer.

pub mod gemini;
pub mod ollama;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::{ProviderError, StudioError};

pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

/// Prompt in, generated text out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextCompletionProvider: Send + Sync {
    /// Short backend identifier for logs.
    fn name(&self) -> &'static str;

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

pub type SharedProvider = Arc<dyn TextCompletionProvider>;

/// Build the provider selected by `config`.
pub fn build_provider(config: &ProviderConfig) -> Result<SharedProvider, StudioError> {
    let provider: SharedProvider = match config.kind {
        ProviderKind::Gemini => {
            let api_key = config
                .api_key
                .clone()
                .filter(|key| !key.is_empty())
                .ok_or_else(|| {
                    StudioError::Config("Gemini provider requires an API key".to_string())
                })?;
            Arc::new(GeminiProvider::new(
                api_key,
                config.model_or_default(),
                config.base_url_or_default(),
            )?)
        }
        ProviderKind::Ollama => Arc::new(OllamaProvider::new(
            config.base_url_or_default(),
            config.model_or_default(),
        )?),
    };
    tracing::info!(
        provider = provider.name(),
        model = %config.model_or_default(),
        "Completion provider ready"
    );
    Ok(provider)
}

pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub(crate) fn http_client() -> Result<reqwest::Client, StudioError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| StudioError::Config(format!("failed to create HTTP client: {}", e)))
}

/// Map a non-success HTTP answer onto the provider error taxonomy.
pub(crate) fn classify_failure(
    backend: &str,
    status: StatusCode,
    body: &str,
    retry_after: Option<Duration>,
) -> ProviderError {
    let lowered = body.to_ascii_lowercase();
    let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
        || lowered.contains("resource_exhausted")
        || lowered.contains("rate limit");

    if rate_limited {
        ProviderError::RateLimited {
            message: format!("{} API error ({}): {}", backend, status, body),
            retry_after,
        }
    } else {
        ProviderError::Transport(format!("{} API error ({}): {}", backend, status, body))
    }
}

/// Parse a `Retry-After` header given in seconds.
pub(crate) fn retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
