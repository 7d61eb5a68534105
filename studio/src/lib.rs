//! MorphUI Design Studio
//!
//! Multi-agent design collaboration: a designer proposes, an engineer and a
//! UX specialist review, and the studio loops until both reviewers approve
//! or the iteration budget runs out.
//!
//! # Flow
//!
//! ```text
//! DesignRequest ─▶ Designer.propose ─▶ Engineer.review ─┐
//!                        ▲          └──▶ UX.review ──────┤
//!                        │                              ▼
//!                        └── feedback ◀── no ── both approve? ── yes ─▶ synthesize ─▶ CollaborationResult
//!                                                       │
//!                                         max iterations ─▶ synthesize (consensus = false)
//! ```
//!
//! Every agent call goes through a [`provider::TextCompletionProvider`] with
//! rate-limit backoff ([`retry`]). Failures never escape an agent: they become
//! low-confidence fallback responses flagged with `fallback = true`.
//!
//! # Usage
//!
//! ```bash
//! morph-studio generate --prompt "Design a calming dashboard" --mood stressed
//! morph-studio quick --prompt "A friendly empty state"
//! morph-studio status
//! ```

#![allow(clippy::uninlined_format_args)]

pub mod agents;
pub mod config;
pub mod error;
pub mod json;
pub mod orchestrator;
pub mod provider;
pub mod retry;
pub mod session;
pub mod synthesis;
pub mod types;

pub use agents::{Agent, DesignerAgent, EngineerAgent, SharedAgent, UxAgent};
pub use config::{ProviderConfig, ProviderKind, StudioConfig};
pub use error::{AgentError, ExtractError, ProviderError, StudioError};
pub use orchestrator::{DesignStudio, StudioStatus};
pub use provider::{build_provider, SharedProvider, TextCompletionProvider};
pub use retry::RetryPolicy;
pub use session::{CollaborationSession, StudioPhase};
pub use types::{
    AgentResponse, AgentRole, CollaborationResult, DesignContext, DesignRequest,
    DiscussionEntry, EntryMetadata, Proposal, Review, Transcript,
};
