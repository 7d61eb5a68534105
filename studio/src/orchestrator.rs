//! Design studio orchestrator — drives the propose → review → consensus loop.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use crate::agents::{DesignerAgent, EngineerAgent, SharedAgent, UxAgent};
use crate::config::StudioConfig;
use crate::error::StudioError;
use crate::provider::SharedProvider;
use crate::session::{CollaborationSession, StudioPhase};
use crate::synthesis::{aggregate_confidence, iteration_feedback, synthesize_final_design};
use crate::types::{
    validate_prompt, AgentRole, CollaborationResult, DesignContext, DesignRequest,
    DiscussionEntry, Proposal, Review, Transcript,
};

const CAPABILITIES: [&str; 4] = [
    "Multi-agent design collaboration",
    "Technical feasibility validation",
    "UX and accessibility review",
    "Consensus-driven design decisions",
];

/// Readiness report for the studio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioStatus {
    pub ready: bool,
    pub agents: Vec<AgentRole>,
    pub capabilities: Vec<String>,
    pub max_iterations: u32,
}

/// Responses of one completed round.
struct Round {
    proposal: Proposal,
    engineer_review: Review,
    ux_review: Review,
}

/// Orchestrates one designer and two reviewers.
///
/// Holds no per-run state; a single instance can serve concurrent runs.
pub struct DesignStudio {
    designer: SharedAgent,
    engineer: SharedAgent,
    ux: SharedAgent,
    config: StudioConfig,
}

impl DesignStudio {
    /// Build the three standard agents over one shared provider.
    pub fn new(provider: SharedProvider, config: StudioConfig) -> Result<Self, StudioError> {
        let retry = config.retry.clone();
        Self::with_agents(
            Arc::new(DesignerAgent::new(provider.clone(), retry.clone())),
            Arc::new(EngineerAgent::new(provider.clone(), retry.clone())),
            Arc::new(UxAgent::new(provider, retry)),
            config,
        )
    }

    pub fn with_agents(
        designer: SharedAgent,
        engineer: SharedAgent,
        ux: SharedAgent,
        config: StudioConfig,
    ) -> Result<Self, StudioError> {
        config.validate()?;
        Ok(Self {
            designer,
            engineer,
            ux,
            config,
        })
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn status(&self) -> StudioStatus {
        StudioStatus {
            ready: true,
            agents: vec![self.designer.role(), self.engineer.role(), self.ux.role()],
            capabilities: CAPABILITIES.iter().map(|c| c.to_string()).collect(),
            max_iterations: self.config.max_iterations,
        }
    }

    /// Run the full collaboration protocol for `request`.
    ///
    /// Only an invalid request or a broken internal invariant is an error;
    /// provider failures surface as fallback responses inside the result.
    pub async fn generate_design(
        &self,
        request: &DesignRequest,
    ) -> Result<CollaborationResult, StudioError> {
        request.validate()?;

        let run_id = Uuid::new_v4();
        let span = info_span!(
            "studio.generate_design",
            run_id = %run_id,
            consensus = tracing::field::Empty,
            iterations = tracing::field::Empty,
        );
        self.collaborate(request, run_id, span.clone())
            .instrument(span)
            .await
    }

    async fn collaborate(
        &self,
        request: &DesignRequest,
        run_id: Uuid,
        span: Span,
    ) -> Result<CollaborationResult, StudioError> {
        let mut session = CollaborationSession::new(self.config.max_iterations);
        let mut transcript = Transcript::new();
        transcript.push(DiscussionEntry::system(format!(
            "Design Request: {}",
            request.prompt
        )));

        let mut last_round: Option<Round> = None;
        let mut consensus = false;

        session.transition(StudioPhase::Proposing)?;
        while !session.is_complete() {
            info!(
                iteration = session.iteration(),
                max_iterations = session.max_iterations(),
                "Starting collaboration round"
            );
            // Each turn sees every entry written before it.
            let context = DesignContext::for_request(request, &transcript);
            let proposal = self.designer.propose(&request.prompt, &context).await;
            transcript.push(DiscussionEntry::from_proposal(&proposal));
            session.transition(StudioPhase::EngineerReview)?;

            let context = DesignContext::for_request(request, &transcript);
            let engineer_review = self.engineer.review(&proposal, &context).await;
            transcript.push(DiscussionEntry::from_review(&engineer_review));
            session.transition(StudioPhase::UxReview)?;

            let context = DesignContext::for_request(request, &transcript);
            let ux_review = self.ux.review(&proposal, &context).await;
            transcript.push(DiscussionEntry::from_review(&ux_review));
            session.transition(StudioPhase::ConsensusCheck)?;

            consensus = engineer_review.approved() && ux_review.approved();
            info!(
                iteration = session.iteration(),
                designer_confidence = proposal.confidence,
                fallback = proposal.fallback || engineer_review.fallback || ux_review.fallback,
                engineer_approves = engineer_review.approved(),
                ux_approves = ux_review.approved(),
                consensus,
                "Round complete"
            );

            if !consensus {
                transcript.push(DiscussionEntry::system(format!(
                    "Feedback for next iteration: {}",
                    iteration_feedback(&engineer_review, &ux_review)
                )));
            }
            session.conclude_round(consensus)?;

            last_round = Some(Round {
                proposal,
                engineer_review,
                ux_review,
            });
        }

        let round = last_round.ok_or_else(|| {
            StudioError::Protocol("collaboration finished without a completed round".to_string())
        })?;

        if !consensus {
            warn!(
                iterations = session.iteration(),
                "No consensus after max iterations, using last round's design"
            );
        }

        let final_design =
            synthesize_final_design(&round.proposal, &round.engineer_review, &round.ux_review);
        let confidence = aggregate_confidence(
            &round.proposal,
            &round.engineer_review,
            &round.ux_review,
            consensus,
        );

        span.record("consensus", consensus);
        span.record("iterations", session.iteration());
        info!(confidence, status = %session.status_line(), "Collaboration finished");

        Ok(CollaborationResult {
            run_id,
            final_design,
            consensus,
            confidence,
            discussion: transcript.into_entries(),
            designer_proposal: round.proposal,
            engineer_review: round.engineer_review,
            ux_review: round.ux_review,
            iteration_count: session.iteration(),
            timestamp: Utc::now(),
        })
    }

    /// Single designer proposal with no review or consensus.
    pub async fn quick_design(
        &self,
        prompt: &str,
        context: Option<&DesignContext>,
    ) -> Result<Proposal, StudioError> {
        validate_prompt(prompt)?;
        let default_context = DesignContext::default();
        let context = context.unwrap_or(&default_context);
        Ok(self.designer.propose(prompt, context).await)
    }
}
