//! UX — predicts user reactions and checks accessibility.

use async_trait::async_trait;

use super::persona::{
    fallback_response, render_context, review_prompt, Persona, PersonaAgent, PersonaBrief,
    ResponseKind,
};
use super::Agent;
use crate::provider::SharedProvider;
use crate::retry::RetryPolicy;
use crate::types::{AgentRole, DesignContext, Proposal, Review};

const EXPERTISE: &str =
    "User psychology, accessibility (WCAG), usability testing, interaction design, user research";

const BRIEF: PersonaBrief = PersonaBrief {
    title: "UX Researcher and Accessibility Specialist",
    knowledge: &[
        "User psychology and behavior patterns",
        "WCAG 2.1 accessibility guidelines",
        "Cognitive load and information architecture",
        "Interaction design principles",
        "Usability heuristics (Nielsen's 10)",
        "Inclusive design and diverse user needs",
        "User testing methodologies",
    ],
    mission: "Your role is to predict how users will react and ensure accessibility for all users.\n\
              You think empathetically about user needs, limitations, and emotional responses.",
    guidelines: &[
        "Consider diverse user capabilities (visual, motor, cognitive)",
        "Predict emotional responses to design choices",
        "Identify usability issues and friction points",
        "Ensure WCAG compliance",
        "Think about user mental models and expectations",
    ],
    message_hint: "Your UX assessment",
    suggestions_hint: "UX or accessibility improvement",
    concerns_hint: "Usability issue or accessibility concern",
    reasoning_hint: "User-centered justification",
};

const TARGET_USERS: &str = "Target Users:\n\
    - General web users across devices\n\
    - Users with varying technical skills\n\
    - Users with accessibility needs (screen readers, keyboard navigation, color blindness, etc.)";

const PROPOSAL_QUESTIONS: &str = "Provide a UX assessment of this request. Consider:\n\
    1. How will users react emotionally?\n\
    2. Is it intuitive and easy to use?\n\
    3. Are there accessibility barriers?\n\
    4. What's the cognitive load?\n\
    5. Does it meet user expectations?\n\n\
    Be specific about user needs and potential issues.";

const REVIEW_CRITERIA: &[&str] = &[
    "Will users understand and enjoy this?",
    "Are there accessibility issues?",
    "Does it create unnecessary friction or confusion?",
    "Is it inclusive for diverse users?",
    "What's the emotional impact?",
];

pub struct UxAgent {
    core: PersonaAgent,
}

impl UxAgent {
    pub fn new(provider: SharedProvider, retry: RetryPolicy) -> Self {
        Self {
            core: PersonaAgent::new(Persona::new(AgentRole::Ux, EXPERTISE, &BRIEF), provider, retry),
        }
    }

    pub fn persona(&self) -> &Persona {
        self.core.persona()
    }

    fn fallback_proposal(request: &str) -> Proposal {
        fallback_response(
            AgentRole::Ux,
            ResponseKind::Proposal,
            format!(
                "From a UX perspective, \"{}\" should be user-friendly and accessible. \
                 Consider user emotional state, cognitive load, and ensure WCAG compliance.",
                request
            ),
            &[
                "Ensure keyboard navigation support",
                "Provide clear visual feedback",
                "Test with diverse user groups",
                "Maintain WCAG AA contrast ratios",
            ],
            &["Verify accessibility", "Test with screen readers"],
            "Fallback UX assessment (API unavailable)",
        )
    }

    fn fallback_review() -> Review {
        fallback_response(
            AgentRole::Ux,
            ResponseKind::Review,
            "From a UX perspective, this proposal should work well for users if properly \
             implemented with accessibility in mind."
                .to_string(),
            &[],
            &["Verify WCAG compliance", "Test with real users"],
            "Fallback review (API unavailable)",
        )
    }
}

#[async_trait]
impl Agent for UxAgent {
    fn role(&self) -> AgentRole {
        self.core.role()
    }

    fn expertise(&self) -> &str {
        self.core.persona().expertise
    }

    async fn propose(&self, request: &str, context: &DesignContext) -> Proposal {
        let prompt = format!(
            "{}\n\nUX REQUEST: {}\n\nCONTEXT:\n{}\n\n{}\n\n{}",
            self.core.persona().instructions(),
            request,
            render_context(context),
            TARGET_USERS,
            PROPOSAL_QUESTIONS
        );
        self.core
            .respond(&prompt, ResponseKind::Proposal, || Self::fallback_proposal(request))
            .await
    }

    async fn review(&self, proposal: &Proposal, context: &DesignContext) -> Review {
        let prompt = review_prompt(
            self.core.persona(),
            context,
            TARGET_USERS,
            proposal,
            true,
            "As a UX expert, review this proposal from a user experience and accessibility perspective",
            REVIEW_CRITERIA,
        );
        self.core
            .respond(&prompt, ResponseKind::Review, Self::fallback_review)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::provider::MockTextCompletionProvider;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_review_prompt_lists_proposal_suggestions() {
        let mut mock = MockTextCompletionProvider::new();
        mock.expect_complete()
            .withf(|prompt: &str| {
                prompt.contains("Suggestions: Larger tap targets, Reduce motion")
                    && prompt.contains("Target Users:")
            })
            .times(1)
            .returning(|_| {
                Ok(r#"{"message":"Accessible","confidence":0.9,"approves":true,"suggestions":["Add focus rings"]}"#.into())
            });
        let ux = UxAgent::new(Arc::new(mock), RetryPolicy::none());
        let proposal = Proposal {
            agent: AgentRole::Designer,
            message: "Minimal layout".into(),
            confidence: 0.7,
            suggestions: vec!["Larger tap targets".into(), "Reduce motion".into()],
            concerns: vec![],
            approves: Some(true),
            reasoning: None,
            fallback: false,
        };

        let review = ux.review(&proposal, &DesignContext::default()).await;
        assert_eq!(review.agent, AgentRole::Ux);
        assert!(review.approved());
        assert_eq!(review.suggestions, vec!["Add focus rings".to_string()]);
    }

    #[tokio::test]
    async fn test_fallback_review_lists_accessibility_checks() {
        let mut mock = MockTextCompletionProvider::new();
        mock.expect_complete()
            .returning(|_| Err(ProviderError::Transport("timeout".into())));
        let ux = UxAgent::new(Arc::new(mock), RetryPolicy::none());
        let proposal = Proposal {
            agent: AgentRole::Designer,
            message: "Anything".into(),
            confidence: 0.5,
            suggestions: vec![],
            concerns: vec![],
            approves: None,
            reasoning: None,
            fallback: false,
        };

        let review = ux.review(&proposal, &DesignContext::default()).await;
        assert!(review.fallback);
        assert_eq!(review.approves, Some(true));
        assert_eq!(
            review.concerns,
            vec!["Verify WCAG compliance".to_string(), "Test with real users".to_string()]
        );
    }

    #[tokio::test]
    async fn test_proposal_prompt_asks_ux_questions() {
        let mut mock = MockTextCompletionProvider::new();
        mock.expect_complete()
            .withf(|prompt: &str| {
                prompt.contains("UX REQUEST: Onboarding flow")
                    && prompt.contains("What's the cognitive load?")
            })
            .times(1)
            .returning(|_| Ok(r#"{"message":"Keep it short","approves":true}"#.into()));
        let ux = UxAgent::new(Arc::new(mock), RetryPolicy::none());

        let proposal = ux.propose("Onboarding flow", &DesignContext::default()).await;
        assert_eq!(proposal.message, "Keep it short");
        assert_eq!(proposal.confidence, 0.5);
    }
}
