//! Deterministic assembly of the final design document and run metrics.

use crate::types::{Proposal, Review};

/// Penalty applied to the aggregate confidence of a run without consensus.
pub const NO_CONSENSUS_FACTOR: f64 = 0.7;

/// Assemble the final design text from the last round's three responses.
///
/// Sections backed by an empty list are left out entirely.
pub fn synthesize_final_design(designer: &Proposal, engineer: &Review, ux: &Review) -> String {
    let mut parts = vec!["## Design Proposal".to_string(), designer.message.clone()];

    push_section(&mut parts, "Design Suggestions", &designer.suggestions);
    push_section(&mut parts, "Technical Implementation", &engineer.suggestions);
    push_section(&mut parts, "Technical Considerations", &engineer.concerns);
    push_section(&mut parts, "UX Recommendations", &ux.suggestions);
    push_section(&mut parts, "Accessibility & Usability Notes", &ux.concerns);

    parts.join("\n")
}

fn push_section(parts: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    parts.push(format!("\n### {}:", title));
    parts.extend(items.iter().map(|item| format!("- {}", item)));
}

/// Summarize what kept the reviewers from approving, for the next round.
///
/// Only reviewers that withheld approval contribute. A dissenting reviewer
/// with nothing listed is still named so the entry is never empty.
pub fn iteration_feedback(engineer: &Review, ux: &Review) -> String {
    let mut feedback = Vec::new();
    let engineer_dissents = !engineer.approved();
    let ux_dissents = !ux.approved();

    if engineer_dissents && !engineer.concerns.is_empty() {
        feedback.push(format!("Technical concerns: {}", engineer.concerns.join(", ")));
    }
    if ux_dissents && !ux.concerns.is_empty() {
        feedback.push(format!("UX concerns: {}", ux.concerns.join(", ")));
    }
    if engineer_dissents && !engineer.suggestions.is_empty() {
        feedback.push(format!(
            "Technical suggestions: {}",
            engineer.suggestions.join(", ")
        ));
    }
    if ux_dissents && !ux.suggestions.is_empty() {
        feedback.push(format!("UX suggestions: {}", ux.suggestions.join(", ")));
    }

    if feedback.is_empty() {
        for review in [engineer, ux].into_iter().filter(|r| !r.approved()) {
            feedback.push(format!("{} did not approve the proposal", review.agent));
        }
    }

    feedback.join(" | ")
}

/// Mean of the three confidences, scaled by [`NO_CONSENSUS_FACTOR`] without
/// consensus, rounded to two decimals.
pub fn aggregate_confidence(
    designer: &Proposal,
    engineer: &Review,
    ux: &Review,
    consensus: bool,
) -> f64 {
    let average = (designer.confidence + engineer.confidence + ux.confidence) / 3.0;
    let factor = if consensus { 1.0 } else { NO_CONSENSUS_FACTOR };
    (average * factor * 100.0).round() / 100.0
}
