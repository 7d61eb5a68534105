//! Error taxonomy for the studio.
//!
//! | Error            | Raised by       | Observed by the orchestrator? |
//! |------------------|-----------------|-------------------------------|
//! | `ProviderError`  | completion call | no — retried, then fallback   |
//! | `ExtractError`   | JSON extraction | no — fallback                 |
//! | `AgentError`     | agent internals | no — fallback                 |
//! | `StudioError`    | studio / config | yes — programming errors only |

use std::time::Duration;

use thiserror::Error;

/// Failure of a single text-completion call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The backend refused the call because of rate limiting / quota.
    #[error("Rate limited: {message}")]
    RateLimited {
        message: String,
        /// Backend-suggested wait, when it sent one. Informational only.
        retry_after: Option<Duration>,
    },

    /// Network failure or a non-success status that is not rate limiting.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered but the body did not contain any text.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after: None,
        }
    }

    /// Whether a retry with backoff may succeed.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs may carry credentials.
        let err = err.without_url();
        if err.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS) {
            Self::rate_limited(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Model output could not be turned into a structured payload.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no JSON object found in model output")]
    NoJsonObject,

    #[error("malformed JSON payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("payload is missing required field `{0}`")]
    MissingField(&'static str),
}

/// Anything that can go wrong inside one agent call.
///
/// Agents convert this into their fallback response; it never reaches
/// the orchestrator.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Parse(#[from] ExtractError),
}

/// Errors surfaced by the studio itself.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Broken internal invariant of the collaboration protocol.
    #[error("Protocol error: {0}")]
    Protocol(String),
}
