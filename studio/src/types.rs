//! Data model shared by agents and the orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StudioError;

/// Participant that authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Designer,
    Engineer,
    Ux,
    /// The orchestrator itself (request record, iteration feedback).
    System,
}

impl AgentRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Designer => "designer",
            Self::Engineer => "engineer",
            Self::Ux => "ux",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured extras attached to a transcript entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concerns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approves: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// One record of the collaboration transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionEntry {
    pub role: AgentRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<EntryMetadata>,
}

impl DiscussionEntry {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: AgentRole::System,
            content: content.into(),
            timestamp: Utc::now(),
            confidence: None,
            metadata: None,
        }
    }

    /// Entry for the designer's proposal: suggestions + reasoning.
    pub fn from_proposal(proposal: &AgentResponse) -> Self {
        Self {
            role: proposal.agent,
            content: proposal.message.clone(),
            timestamp: Utc::now(),
            confidence: Some(proposal.confidence),
            metadata: Some(EntryMetadata {
                suggestions: Some(proposal.suggestions.clone()),
                concerns: None,
                approves: None,
                reasoning: proposal.reasoning.clone(),
            }),
        }
    }

    /// Entry for a reviewer: approval + concerns + suggestions.
    pub fn from_review(review: &AgentResponse) -> Self {
        Self {
            role: review.agent,
            content: review.message.clone(),
            timestamp: Utc::now(),
            confidence: Some(review.confidence),
            metadata: Some(EntryMetadata {
                suggestions: Some(review.suggestions.clone()),
                concerns: Some(review.concerns.clone()),
                approves: Some(review.approved()),
                reasoning: None,
            }),
        }
    }
}

/// Append-only, chronologically ordered discussion log.
///
/// Timestamps never go backwards: an entry stamped earlier than its
/// predecessor (wall clock adjustments) is clamped to the predecessor's time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<DiscussionEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mut entry: DiscussionEntry) {
        if let Some(last) = self.entries.last() {
            if entry.timestamp < last.timestamp {
                entry.timestamp = last.timestamp;
            }
        }
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[DiscussionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<DiscussionEntry> {
        self.entries
    }
}

/// Immutable snapshot handed to every agent call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignContext {
    /// Mood the user is in (e.g. "stressed").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_mood: Option<String>,
    /// Time of day the design will be used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
    /// Feature or screen being designed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
    /// Constraints in the order they were given.
    #[serde(default)]
    pub constraints: Vec<String>,
    /// Transcript written before the current turn.
    #[serde(default)]
    pub previous_messages: Vec<DiscussionEntry>,
}

impl DesignContext {
    /// Context for `request` seeing the given transcript.
    pub fn for_request(request: &DesignRequest, transcript: &Transcript) -> Self {
        Self {
            user_mood: request.user_mood.clone(),
            time_of_day: request.time_of_day.clone(),
            feature: request.feature.clone(),
            constraints: request.constraints.clone(),
            previous_messages: transcript.entries().to_vec(),
        }
    }
}

/// Unit returned by every agent call, either a proposal or a review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentResponse {
    /// Which agent produced this response.
    #[serde(rename = "agentType")]
    pub agent: AgentRole,
    pub message: String,
    /// Always within `[0, MAX_CONFIDENCE]`.
    pub confidence: f64,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
    /// Approval vote. Reviews always carry it; proposals may omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approves: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// Set when this response is the degraded substitute for a failed call.
    #[serde(default)]
    pub fallback: bool,
}

/// A response produced by `Agent::propose`.
pub type Proposal = AgentResponse;
/// A response produced by `Agent::review`.
pub type Review = AgentResponse;

impl AgentResponse {
    /// Approval with the proposal default applied: absent means approved.
    pub fn approved(&self) -> bool {
        self.approves.unwrap_or(true)
    }
}

/// Input to a full collaboration run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
}

impl DesignRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.user_mood = Some(mood.into());
        self
    }

    pub fn with_time_of_day(mut self, time_of_day: impl Into<String>) -> Self {
        self.time_of_day = Some(time_of_day.into());
        self
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraints.push(constraint.into());
        self
    }

    pub fn validate(&self) -> Result<(), StudioError> {
        validate_prompt(&self.prompt)
    }
}

pub(crate) fn validate_prompt(prompt: &str) -> Result<(), StudioError> {
    if prompt.trim().is_empty() {
        return Err(StudioError::InvalidRequest(
            "prompt is required and must not be blank".to_string(),
        ));
    }
    Ok(())
}

/// Final output of `DesignStudio::generate_design`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationResult {
    pub run_id: Uuid,
    pub final_design: String,
    pub consensus: bool,
    /// Mean of the three final confidences, penalised without consensus.
    pub confidence: f64,
    pub discussion: Vec<DiscussionEntry>,
    pub designer_proposal: Proposal,
    pub engineer_review: Review,
    pub ux_review: Review,
    /// Iterations actually executed, in `1..=max_iterations`.
    pub iteration_count: u32,
    pub timestamp: DateTime<Utc>,
}
