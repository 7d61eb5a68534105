//! Engineer — judges technical feasibility, performance and maintainability.

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
    "React, TypeScript, CSS, animations, performance optimization, browser compatibility";

const TECH_STACK: &str = "Tech Stack:\n\
    - React 18 with TypeScript\n\
    - Styled Components for styling\n\
    - Framer Motion for animations\n\
    - Vite for building\n\
    - Zustand for state management";

const BRIEF: PersonaBrief = PersonaBrief {
    title: "Frontend Engineer",
    knowledge: &[
        "React 18+ and TypeScript",
        "CSS3, CSS-in-JS (Styled Components)",
        "Framer Motion animations",
        "Web performance optimization",
        "Browser compatibility and responsive design",
        "Accessibility (ARIA, WCAG)",
        "Modern build tools (Vite)",
    ],
    mission: "Your role is to validate technical feasibility and provide implementation guidance.\n\
              You think practically about code architecture, performance, and maintainability.",
    guidelines: &[
        "Consider implementation complexity",
        "Identify technical constraints and challenges",
        "Suggest practical solutions",
        "Think about performance implications",
        "Consider browser compatibility",
    ],
    message_hint: "Your technical assessment",
    suggestions_hint: "Technical suggestion",
    concerns_hint: "Performance concern or implementation challenge",
    reasoning_hint: "Technical justification for your assessment",
};

const REVIEW_CRITERIA: &[&str] = &[
    "Is it technically feasible?",
    "What are the implementation challenges?",
    "Performance implications?",
    "Browser compatibility concerns?",
    "Maintainability and code quality?",
];

pub struct EngineerAgent {
    core: PersonaAgent,
}

impl EngineerAgent {
    pub fn new(provider: SharedProvider, retry: RetryPolicy) -> Self {
        Self {
            core: PersonaAgent::new(
                Persona::new(AgentRole::Engineer, EXPERTISE, &BRIEF),
                provider,
                retry,
            ),
        }
    }

    pub fn persona(&self) -> &Persona {
        self.core.persona()
    }

    fn fallback_proposal(request: &str) -> Proposal {
        fallback_response(
            AgentRole::Engineer,
            ResponseKind::Proposal,
            format!(
                "From an engineering perspective, \"{}\" is implementable using React and Framer Motion. \
                 Consider component architecture, state management, and performance optimization.",
                request
            ),
            &[
                "Break down into smaller components",
                "Use React.memo for optimization",
                "Implement progressive enhancement",
            ],
            &["Need to test performance", "Consider bundle size"],
            "Fallback technical assessment (API unavailable)",
        )
    }

    fn fallback_review() -> Review {
        fallback_response(
            AgentRole::Engineer,
            ResponseKind::Review,
            "From a technical perspective, this proposal appears implementable with our current stack."
                .to_string(),
            &[],
            &["Need to validate performance impact"],
            "Fallback review (API unavailable)",
        )
    }
}

#[async_trait]
impl Agent for EngineerAgent {
    fn role(&self) -> AgentRole {
        self.core.role()
    }

    fn expertise(&self) -> &str {
        self.core.persona().expertise
    }

    async fn propose(&self, request: &str, context: &DesignContext) -> Proposal {
        let prompt = format!(
            "{}\n\nIMPLEMENTATION REQUEST: {}\n\nCONTEXT:\n{}\n\n{}\n\n\
             Provide a technical assessment of how to implement this. Consider feasibility, \
             performance, and best practices. Be specific about implementation approaches.",
            self.core.persona().instructions(),
            request,
            render_context(context),
            TECH_STACK
        );
        self.core
            .respond(&prompt, ResponseKind::Proposal, || Self::fallback_proposal(request))
            .await
    }

    async fn review(&self, proposal: &Proposal, context: &DesignContext) -> Review {
        let prompt = review_prompt(
            self.core.persona(),
            context,
            TECH_STACK,
            proposal,
            false,
            "As an engineer, review this proposal from a technical perspective",
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

    fn proposal() -> Proposal {
        Proposal {
            agent: AgentRole::Designer,
            message: "Animated gradient header".into(),
            confidence: 0.8,
            suggestions: vec!["Use teal".into()],
            concerns: vec![],
            approves: Some(true),
            reasoning: None,
            fallback: false,
        }
    }

    #[tokio::test]
    async fn test_review_prompt_embeds_proposal() {
        let mut mock = MockTextCompletionProvider::new();
        mock.expect_complete()
            .withf(|prompt: &str| {
                prompt.contains("Another agent (designer) has made this proposal:\n\"Animated gradient header\"")
                    && prompt.contains("Tech Stack:")
                    && prompt.contains("1. Is it technically feasible?")
                    && !prompt.contains("Suggestions: Use teal")
            })
            .times(1)
            .returning(|_| {
                Ok(r#"{"message":"Heavy on GPU","confidence":0.7,"approves":false,"concerns":["Jank on low-end devices"]}"#.into())
            });
        let engineer = EngineerAgent::new(Arc::new(mock), RetryPolicy::none());

        let review = engineer.review(&proposal(), &DesignContext::default()).await;
        assert_eq!(review.agent, AgentRole::Engineer);
        assert_eq!(review.approves, Some(false));
        assert_eq!(review.concerns, vec!["Jank on low-end devices".to_string()]);
        assert!(!review.fallback);
    }

    #[tokio::test]
    async fn test_fallback_review_approves() {
        let mut mock = MockTextCompletionProvider::new();
        mock.expect_complete()
            .returning(|_| Err(ProviderError::InvalidResponse("empty".into())));
        let engineer = EngineerAgent::new(Arc::new(mock), RetryPolicy::none());

        let review = engineer.review(&proposal(), &DesignContext::default()).await;
        assert!(review.fallback);
        assert_eq!(review.approves, Some(true));
        assert_eq!(review.confidence, 0.4);
        assert_eq!(review.reasoning.as_deref(), Some("Fallback review (API unavailable)"));
    }

    #[tokio::test]
    async fn test_fallback_proposal() {
        let mut mock = MockTextCompletionProvider::new();
        mock.expect_complete()
            .returning(|_| Ok("not json".into()));
        let engineer = EngineerAgent::new(Arc::new(mock), RetryPolicy::none());

        let proposal = engineer
            .propose("Add a mood toggle", &DesignContext::default())
            .await;
        assert!(proposal.fallback);
        assert_eq!(proposal.confidence, 0.3);
        assert!(proposal.message.contains("\"Add a mood toggle\""));
        assert_eq!(proposal.concerns.len(), 2);
    }
}
