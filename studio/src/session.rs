//! Collaboration state machine — phases, transitions, and round tracking.
//!
//! ```text
//! Idle → Proposing → EngineerReview → UxReview → ConsensusCheck
//!           ▲                                          │
//!           │                                          ├─ both approve → Converged
//!           └──────── rounds left, no consensus ───────┤
//!                                                      └─ max rounds → Exhausted
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StudioError;

/// Phase of a collaboration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudioPhase {
    /// Run created, no agent called yet.
    Idle,
    /// Designer is producing a proposal.
    Proposing,
    /// Engineer is reviewing the current proposal.
    EngineerReview,
    /// UX is reviewing the current proposal.
    UxReview,
    /// Both reviews are in.
    ConsensusCheck,
    /// Both reviewers approved the same proposal.
    Converged,
    /// Iterations exhausted without consensus.
    Exhausted,
}

impl StudioPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Converged | Self::Exhausted)
    }

    /// Valid transitions from this phase.
    pub fn valid_transitions(self) -> &'static [StudioPhase] {
        match self {
            Self::Idle => &[Self::Proposing],
            Self::Proposing => &[Self::EngineerReview],
            Self::EngineerReview => &[Self::UxReview],
            Self::UxReview => &[Self::ConsensusCheck],
            Self::ConsensusCheck => &[Self::Converged, Self::Proposing, Self::Exhausted],
            Self::Converged | Self::Exhausted => &[],
        }
    }
}

impl std::fmt::Display for StudioPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Proposing => write!(f, "proposing"),
            Self::EngineerReview => write!(f, "engineer_review"),
            Self::UxReview => write!(f, "ux_review"),
            Self::ConsensusCheck => write!(f, "consensus_check"),
            Self::Converged => write!(f, "converged"),
            Self::Exhausted => write!(f, "exhausted"),
        }
    }
}

/// A phase transition record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseTransition {
    /// Previous phase.
    pub from: StudioPhase,
    /// New phase.
    pub to: StudioPhase,
    /// When the transition occurred.
    pub timestamp: DateTime<Utc>,
}

/// Error for invalid state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError {
    /// Phase the session was in.
    pub from: StudioPhase,
    /// Phase that was refused.
    pub to: StudioPhase,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid transition {} → {} (allowed: {:?})",
            self.from,
            self.to,
            self.from.valid_transitions()
        )
    }
}

impl std::error::Error for TransitionError {}

impl From<TransitionError> for StudioError {
    fn from(err: TransitionError) -> Self {
        StudioError::Protocol(err.to_string())
    }
}

/// Per-run phase tracker. Lives for one `generate_design` call.
#[derive(Debug, Clone)]
pub struct CollaborationSession {
    /// Current phase.
    phase: StudioPhase,
    /// Rounds started so far (1-indexed once running).
    iteration: u32,
    /// Maximum rounds allowed.
    max_iterations: u32,
    /// Transition history.
    transitions: Vec<PhaseTransition>,
}

impl CollaborationSession {
    pub fn new(max_iterations: u32) -> Self {
        Self {
            phase: StudioPhase::Idle,
            iteration: 0,
            max_iterations,
            transitions: Vec::new(),
        }
    }

    pub fn phase(&self) -> StudioPhase {
        self.phase
    }

    /// Iterations started so far (1-indexed once running).
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn transitions(&self) -> &[PhaseTransition] {
        &self.transitions
    }

    pub fn transition(&mut self, to: StudioPhase) -> Result<(), TransitionError> {
        if !self.phase.valid_transitions().contains(&to) {
            return Err(TransitionError {
                from: self.phase,
                to,
            });
        }
        if to == StudioPhase::Proposing && !self.has_iterations_remaining() {
            return Err(TransitionError {
                from: self.phase,
                to,
            });
        }

        self.transitions.push(PhaseTransition {
            from: self.phase,
            to,
            timestamp: Utc::now(),
        });
        self.phase = to;

        if to == StudioPhase::Proposing {
            self.iteration += 1;
        }
        Ok(())
    }

    /// Settle the consensus check: converge, loop again, or give up.
    pub fn conclude_round(&mut self, consensus: bool) -> Result<StudioPhase, TransitionError> {
        let next = if consensus {
            StudioPhase::Converged
        } else if self.has_iterations_remaining() {
            StudioPhase::Proposing
        } else {
            StudioPhase::Exhausted
        };
        self.transition(next)?;
        Ok(next)
    }

    pub fn has_iterations_remaining(&self) -> bool {
        self.iteration < self.max_iterations
    }

    pub fn is_complete(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Compact status line.
    pub fn status_line(&self) -> String {
        format!(
            "[{}] iteration {}/{}",
            self.phase, self.iteration, self.max_iterations
        )
    }
}
