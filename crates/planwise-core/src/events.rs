// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use planwise_model::Role;
use serde::{Deserialize, Serialize};

/// One piece of message content.  Only text is produced today.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub text: Option<String>,
    /// Marks reasoning text that is not part of the answer.
    #[serde(default)]
    pub thought: bool,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), thought: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, parts: vec![Part::text(text)] }
    }

    pub fn model(parts: Vec<Part>) -> Self {
        Self { role: Role::Assistant, parts }
    }

    /// Text of the first part, if that part carries any.
    pub fn first_text(&self) -> Option<&str> {
        self.parts.first().and_then(|p| p.text.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventActions {
    #[serde(default)]
    pub escalate: bool,
}

/// An element of the sequence produced by running one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnEvent {
    pub author: String,
    pub content: Option<Content>,
    /// `true` while the event is a streaming fragment of a longer response.
    #[serde(default)]
    pub partial: bool,
    pub actions: Option<EventActions>,
    pub error_message: Option<String>,
}

impl TurnEvent {
    /// A streaming fragment; never final.
    pub fn partial(author: impl Into<String>, parts: Vec<Part>) -> Self {
        Self {
            author: author.into(),
            content: Some(Content::model(parts)),
            partial: true,
            actions: None,
            error_message: None,
        }
    }

    /// A concluding event carrying the agent's answer.
    pub fn reply(author: impl Into<String>, parts: Vec<Part>) -> Self {
        Self {
            author: author.into(),
            content: (!parts.is_empty()).then(|| Content::model(parts)),
            partial: false,
            actions: None,
            error_message: None,
        }
    }

    /// A concluding event in which the agent gives up on the turn.
    pub fn escalation(author: impl Into<String>, message: Option<String>) -> Self {
        Self {
            author: author.into(),
            content: None,
            partial: false,
            actions: Some(EventActions { escalate: true }),
            error_message: message,
        }
    }

    pub fn escalates(&self) -> bool {
        self.actions.as_ref().is_some_and(|a| a.escalate)
    }

    /// Whether this event concludes the turn.
    pub fn is_final_response(&self) -> bool {
        !self.partial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_events_are_not_final() {
        assert!(!TurnEvent::partial("a", vec![Part::text("x")]).is_final_response());
        assert!(TurnEvent::reply("a", vec![Part::text("x")]).is_final_response());
        assert!(TurnEvent::escalation("a", None).is_final_response());
    }

    #[test]
    fn reply_without_parts_has_no_content() {
        assert!(TurnEvent::reply("a", vec![]).content.is_none());
    }

    #[test]
    fn first_text_ignores_later_parts() {
        let c = Content::model(vec![Part::default(), Part::text("second")]);
        assert_eq!(c.first_text(), None);
    }

    #[test]
    fn escalation_flag() {
        assert!(TurnEvent::escalation("a", Some("quota".into())).escalates());
        assert!(!TurnEvent::reply("a", vec![]).escalates());
    }
}
