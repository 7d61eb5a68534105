//! Studio agents — designer, engineer and UX personas.
//!
//! Every variant is a thin wrapper over the shared persona core: it
//! contributes its instructions, prompt wording and fallback content, and
//! exposes the same two capabilities.
//!
//! ```text
//! propose(request, ctx) ─┐
//!                        ├─▶ prompt ─▶ retry(provider.complete) ─▶ extract JSON ─▶ response
//! review(proposal, ctx) ─┘                     │                        │
//!                                              └──── any failure ───────┴─▶ fallback response
//! ```
//!
//! Neither capability can fail: the agent boundary is where provider and
//! parse errors stop.

pub mod designer;
pub mod engineer;
pub mod persona;
pub mod ux;

use std::sync::Arc;

use async_trait::async_trait;

use crate::types::{AgentRole, DesignContext, Proposal, Review};

pub use designer::DesignerAgent;
pub use engineer::EngineerAgent;
pub use persona::{heuristic_confidence, render_context, Persona, MAX_CONFIDENCE};
pub use ux::UxAgent;

/// An LLM-backed persona that can propose designs and review proposals.
#[async_trait]
pub trait Agent: Send + Sync {
    fn role(&self) -> AgentRole;

    /// Free-text description of what this agent knows about.
    fn expertise(&self) -> &str;

    /// Produce a proposal for `request`. Degrades to a fallback on failure.
    async fn propose(&self, request: &str, context: &DesignContext) -> Proposal;

    /// Evaluate another agent's proposal. Degrades to an approving
    /// fallback on failure.
    async fn review(&self, proposal: &Proposal, context: &DesignContext) -> Review;
}

pub type SharedAgent = Arc<dyn Agent>;
