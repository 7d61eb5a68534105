//! Shared machinery behind every agent variant.
//!
//! A [`PersonaAgent`] owns the immutable persona (role, expertise, rendered
//! instructions), the completion provider and the retry policy. Variants
//! only contribute prompt wording and fallback content; the call, parse and
//! degrade path is identical for all of them.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{AgentError, ExtractError};
use crate::json::parse_json;
use crate::provider::SharedProvider;
use crate::retry::RetryPolicy;
use crate::types::{AgentResponse, AgentRole, DesignContext};

/// Upper bound on any reported confidence.
pub const MAX_CONFIDENCE: f64 = 0.95;

/// Confidence of a fallback proposal.
pub const FALLBACK_PROPOSAL_CONFIDENCE: f64 = 0.3;
/// Confidence of a fallback review.
pub const FALLBACK_REVIEW_CONFIDENCE: f64 = 0.4;

const DESIGN_KEYWORDS: [&str; 5] = ["color", "layout", "animation", "spacing", "typography"];

/// Whether a call is producing a proposal or reviewing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResponseKind {
    Proposal,
    Review,
}

/// Fixed identity of an agent, set at construction.
#[derive(Debug, Clone)]
pub struct Persona {
    pub role: AgentRole,
    pub expertise: &'static str,
    instructions: String,
}

impl Persona {
    pub(crate) fn new(role: AgentRole, expertise: &'static str, brief: &PersonaBrief) -> Self {
        let instructions = build_persona_instructions(brief);
        Self {
            role,
            expertise,
            instructions,
        }
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }
}

/// Wording a variant supplies to build its persona instructions.
pub(crate) struct PersonaBrief {
    pub title: &'static str,
    pub knowledge: &'static [&'static str],
    pub mission: &'static str,
    pub guidelines: &'static [&'static str],
    pub message_hint: &'static str,
    pub suggestions_hint: &'static str,
    pub concerns_hint: &'static str,
    pub reasoning_hint: &'static str,
}

/// Render the role preamble, including the JSON schema every reply must follow.
///
/// `approves` is part of the schema but only required when reviewing; the
/// review prompt asks for it explicitly.
fn build_persona_instructions(brief: &PersonaBrief) -> String {
    let knowledge = brief
        .knowledge
        .iter()
        .map(|k| format!("- {}", k))
        .collect::<Vec<_>>()
        .join("\n");
    let guidelines = brief
        .guidelines
        .iter()
        .enumerate()
        .map(|(i, g)| format!("{}. {}", i + 1, g))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert {title} AI agent with deep knowledge of:\n{knowledge}\n\n\
         {mission}\n\n\
         When responding:\n{guidelines}\n\n\
         Output your responses as JSON with this structure:\n\
         {{\n  \"message\": \"{message}\",\n  \"confidence\": 0.8,\n  \
         \"suggestions\": [\"{suggestions}\"],\n  \"concerns\": [\"{concerns}\"],\n  \
         \"reasoning\": \"{reasoning}\",\n  \
         \"approves\": true/false (only when reviewing another agent's proposal)\n}}",
        title = brief.title,
        knowledge = knowledge,
        mission = brief.mission,
        guidelines = guidelines,
        message = brief.message_hint,
        suggestions = brief.suggestions_hint,
        concerns = brief.concerns_hint,
        reasoning = brief.reasoning_hint,
    )
}

/// Serialize the design context the way every prompt embeds it.
pub fn render_context(context: &DesignContext) -> String {
    let mut parts = Vec::new();

    if let Some(mood) = &context.user_mood {
        parts.push(format!("User Mood: {}", mood));
    }
    if let Some(time) = &context.time_of_day {
        parts.push(format!("Time of Day: {}", time));
    }
    if let Some(feature) = &context.feature {
        parts.push(format!("Feature: {}", feature));
    }
    if !context.constraints.is_empty() {
        parts.push(format!("Constraints: {}", context.constraints.join(", ")));
    }
    if !context.previous_messages.is_empty() {
        parts.push("\nPrevious Discussion:".to_string());
        for msg in &context.previous_messages {
            parts.push(format!("[{}]: {}", msg.role, msg.content));
        }
    }

    parts.join("\n")
}

/// Confidence estimate for replies that did not state one.
///
/// 0.5 base, +0.1 past 200 chars, +0.1 past 500 chars, +0.05 per design
/// keyword present, capped at [`MAX_CONFIDENCE`].
pub fn heuristic_confidence(response: &str) -> f64 {
    let mut confidence = 0.5;
    let length = response.chars().count();
    if length > 200 {
        confidence += 0.1;
    }
    if length > 500 {
        confidence += 0.1;
    }

    let lowered = response.to_lowercase();
    let matches = DESIGN_KEYWORDS
        .iter()
        .filter(|keyword| lowered.contains(*keyword))
        .count();
    confidence += matches as f64 * 0.05;

    confidence.min(MAX_CONFIDENCE)
}

pub fn clamp_confidence(value: f64) -> f64 {
    value.clamp(0.0, MAX_CONFIDENCE)
}

/// Reply shape requested in the persona instructions. Everything is
/// optional at the serde level; `message` is enforced afterwards.
#[derive(Debug, Default, Deserialize)]
struct ResponsePayload {
    message: Option<String>,
    confidence: Option<Value>,
    #[serde(default)]
    suggestions: Vec<String>,
    #[serde(default)]
    concerns: Vec<String>,
    approves: Option<bool>,
    reasoning: Option<String>,
}

/// Accept `0.8` as well as `"0.8"`.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|v: &f64| v.is_finite())
}

/// The provider-backed core shared by all variants.
pub(crate) struct PersonaAgent {
    persona: Persona,
    provider: SharedProvider,
    retry: RetryPolicy,
}

impl PersonaAgent {
    pub(crate) fn new(persona: Persona, provider: SharedProvider, retry: RetryPolicy) -> Self {
        Self {
            persona,
            provider,
            retry,
        }
    }

    pub(crate) fn persona(&self) -> &Persona {
        &self.persona
    }

    pub(crate) fn role(&self) -> AgentRole {
        self.persona.role
    }

    /// Run `prompt` and return a structured response, or `fallback()` if the
    /// call or the parse fails. Never fails itself.
    pub(crate) async fn respond<F>(&self, prompt: &str, kind: ResponseKind, fallback: F) -> AgentResponse
    where
        F: FnOnce() -> AgentResponse,
    {
        match self.exchange(prompt, kind).await {
            Ok(response) => {
                debug!(
                    role = %self.persona.role,
                    confidence = response.confidence,
                    approves = ?response.approves,
                    fallback = response.fallback,
                    "Agent responded"
                );
                response
            }
            Err(err) => {
                warn!(
                    role = %self.persona.role,
                    kind = ?kind,
                    error = %err,
                    fallback = true,
                    "Agent call failed, substituting fallback response"
                );
                fallback()
            }
        }
    }

    async fn exchange(&self, prompt: &str, kind: ResponseKind) -> Result<AgentResponse, AgentError> {
        let raw = self.retry.run(|| self.provider.complete(prompt)).await?;
        let payload: ResponsePayload = parse_json(&raw)?;

        let message = payload
            .message
            .filter(|m| !m.trim().is_empty())
            .ok_or(ExtractError::MissingField("message"))?;

        let confidence = payload
            .confidence
            .as_ref()
            .and_then(numeric)
            .map(clamp_confidence)
            .unwrap_or_else(|| heuristic_confidence(&raw));

        // Proposals count as approved unless they say otherwise; a review
        // that omits its vote has not approved anything.
        let approves = match kind {
            ResponseKind::Proposal => payload.approves.unwrap_or(true),
            ResponseKind::Review => payload.approves.unwrap_or(false),
        };

        Ok(AgentResponse {
            agent: self.persona.role,
            message,
            confidence,
            suggestions: payload.suggestions,
            concerns: payload.concerns,
            approves: Some(approves),
            reasoning: payload.reasoning,
            fallback: false,
        })
    }
}

/// Degraded response used when an agent call cannot complete.
pub(crate) fn fallback_response(
    role: AgentRole,
    kind: ResponseKind,
    message: String,
    suggestions: &[&str],
    concerns: &[&str],
    reasoning: &str,
) -> AgentResponse {
    let confidence = match kind {
        ResponseKind::Proposal => FALLBACK_PROPOSAL_CONFIDENCE,
        ResponseKind::Review => FALLBACK_REVIEW_CONFIDENCE,
    };
    AgentResponse {
        agent: role,
        message,
        confidence,
        suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        concerns: concerns.iter().map(|s| s.to_string()).collect(),
        approves: Some(true),
        reasoning: Some(reasoning.to_string()),
        fallback: true,
    }
}

/// Shared review prompt body: context, the proposal under review, criteria.
pub(crate) fn review_prompt(
    persona: &Persona,
    context: &DesignContext,
    preamble: &str,
    proposal: &AgentResponse,
    include_suggestions: bool,
    perspective: &str,
    criteria: &[&str],
) -> String {
    let mut prompt = format!(
        "{}\n\nCONTEXT:\n{}\n\n",
        persona.instructions(),
        render_context(context)
    );
    if !preamble.is_empty() {
        prompt.push_str(preamble);
        prompt.push_str("\n\n");
    }
    prompt.push_str(&format!(
        "Another agent ({}) has made this proposal:\n\"{}\"\n\n",
        proposal.agent, proposal.message
    ));
    if include_suggestions && !proposal.suggestions.is_empty() {
        prompt.push_str(&format!(
            "Suggestions: {}\n\n",
            proposal.suggestions.join(", ")
        ));
    }
    prompt.push_str(&format!("{}:\n", perspective));
    for (i, criterion) in criteria.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, criterion));
    }
    prompt.push_str(
        "\nRespond as JSON with message, confidence, approves (true/false), \
         suggestions, concerns and reasoning.",
    );
    prompt
}
