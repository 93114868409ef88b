// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use planwise_model::Capability;
use serde::{Deserialize, Serialize};

use crate::prompts::{EVENT_PROMPT, REFLECTION_PROMPT};

/// Immutable description of an agent: who it is, which model drives it,
/// what it may use, and how it is instructed.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentProfile {
    pub name: String,
    pub model: String,
    pub capabilities: Vec<Capability>,
    pub instruction: String,
    pub description: Option<String>,
}

impl AgentProfile {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            capabilities: Vec::new(),
            instruction: String::new(),
            description: None,
        }
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }
}

/// The two agents this service knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    /// Preparation guidance for an upcoming event.
    EventUnderstanding,
    /// Lessons learned from a post-event note.
    Reflection,
}

impl ProfileKind {
    pub fn agent_name(self) -> &'static str {
        match self {
            Self::EventUnderstanding => "EventUnderstandingAgent",
            Self::Reflection => "ReflectionAgent",
        }
    }

    /// Build the profile for this kind, driven by `model`.
    pub fn profile(self, model: &str) -> AgentProfile {
        let base = AgentProfile::new(self.agent_name(), model).with_capability(Capability::WebSearch);
        match self {
            Self::EventUnderstanding => base
                .with_instruction(EVENT_PROMPT)
                .with_description("Agent that analyzes scheduled activities using Google Search."),
            Self::Reflection => base.with_instruction(REFLECTION_PROMPT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_profile_has_description_and_search() {
        let p = ProfileKind::EventUnderstanding.profile("gemini-2.5-flash-lite");
        assert_eq!(p.name, "EventUnderstandingAgent");
        assert_eq!(p.model, "gemini-2.5-flash-lite");
        assert_eq!(p.capabilities, vec![Capability::WebSearch]);
        assert_eq!(
            p.description.as_deref(),
            Some("Agent that analyzes scheduled activities using Google Search.")
        );
        assert_eq!(p.instruction, EVENT_PROMPT);
    }

    #[test]
    fn reflection_profile_differs_only_in_configuration() {
        let p = ProfileKind::Reflection.profile("m");
        assert_eq!(p.name, "ReflectionAgent");
        assert!(p.description.is_none());
        assert_eq!(p.capabilities, vec![Capability::WebSearch]);
        assert_eq!(p.instruction, REFLECTION_PROMPT);
    }

    #[test]
    fn capability_is_not_duplicated() {
        let p = AgentProfile::new("a", "m")
            .with_capability(Capability::WebSearch)
            .with_capability(Capability::WebSearch);
        assert_eq!(p.capabilities.len(), 1);
    }
}
