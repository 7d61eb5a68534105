//! Designer — proposes visual direction: color, layout, typography.

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
    "Visual design, color theory, layout composition, typography, and aesthetic principles";

const BRIEF: PersonaBrief = PersonaBrief {
    title: "UI/UX Designer",
    knowledge: &[
        "Visual design principles (contrast, hierarchy, balance, alignment)",
        "Color theory and psychology",
        "Modern design systems and trends",
        "Typography and spacing",
        "Accessibility in visual design",
        "Responsive and adaptive layouts",
    ],
    mission: "Your role is to propose creative, beautiful, and functional design solutions.\n\
              You think visually and consider how users will perceive and interact with designs.",
    guidelines: &[
        "Be creative but practical",
        "Consider emotional impact of visual choices",
        "Explain your design reasoning",
        "Suggest multiple options when appropriate",
        "Think about the overall visual experience",
    ],
    message_hint: "Your design proposal with specific suggestions",
    suggestions_hint: "Specific design suggestion",
    concerns_hint: "Any potential issues to consider",
    reasoning_hint: "Why these design choices work",
};

const REVIEW_CRITERIA: &[&str] = &[
    "Does it create a good visual experience?",
    "Are the visual elements well-considered?",
    "Will it be aesthetically pleasing and functional?",
    "Any design improvements or concerns?",
];

pub struct DesignerAgent {
    core: PersonaAgent,
}

impl DesignerAgent {
    pub fn new(provider: SharedProvider, retry: RetryPolicy) -> Self {
        Self {
            core: PersonaAgent::new(
                Persona::new(AgentRole::Designer, EXPERTISE, &BRIEF),
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
            AgentRole::Designer,
            ResponseKind::Proposal,
            format!(
                "As a designer, I suggest focusing on creating a cohesive visual experience for \"{}\". \
                 Consider using color psychology, clear visual hierarchy, and intuitive layouts.",
                request
            ),
            &[
                "Use consistent spacing and alignment",
                "Choose colors that match the user mood",
                "Create clear visual hierarchy",
            ],
            &[],
            "Fallback design principles (API unavailable)",
        )
    }

    fn fallback_review() -> Review {
        fallback_response(
            AgentRole::Designer,
            ResponseKind::Review,
            "From a design perspective, this proposal seems reasonable.".to_string(),
            &[],
            &[],
            "Fallback review (API unavailable)",
        )
    }
}

#[async_trait]
impl Agent for DesignerAgent {
    fn role(&self) -> AgentRole {
        self.core.role()
    }

    fn expertise(&self) -> &str {
        self.core.persona().expertise
    }

    async fn propose(&self, request: &str, context: &DesignContext) -> Proposal {
        let prompt = format!(
            "{}\n\nDESIGN REQUEST: {}\n\nCONTEXT:\n{}\n\n\
             Provide a creative design proposal addressing this request. Think about colors, \
             layout, visual hierarchy, and user experience. Be specific and actionable.",
            self.core.persona().instructions(),
            request,
            render_context(context)
        );
        self.core
            .respond(&prompt, ResponseKind::Proposal, || Self::fallback_proposal(request))
            .await
    }

    async fn review(&self, proposal: &Proposal, context: &DesignContext) -> Review {
        let prompt = review_prompt(
            self.core.persona(),
            context,
            "",
            proposal,
            false,
            "As a designer, review this proposal from a visual design perspective",
            REVIEW_CRITERIA,
        );
        self.core
            .respond(&prompt, ResponseKind::Review, Self::fallback_review)
            .await
    }
}
