// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::fmt;

use serde::{Deserialize, Serialize};

pub const NO_FINAL_RESPONSE: &str = "Agent did not produce a final response.";
pub const NO_SPECIFIC_MESSAGE: &str = "No specific message.";

/// Result of dispatching one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Text of the first part of the final event.
    Success(String),
    /// The agent gave up; carries its error message.
    Escalated(String),
    /// Starting the turn or reading its events failed.
    Failure(String),
    /// The turn ended without a usable final event.
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Success,
    Escalated,
    Failure,
    Empty,
}

impl TurnOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success(_) => OutcomeKind::Success,
            Self::Escalated(_) => OutcomeKind::Escalated,
            Self::Failure(_) => OutcomeKind::Failure,
            Self::Empty => OutcomeKind::Empty,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Render the outcome as the plain string stored and returned to clients.
    pub fn into_text(self) -> String {
        match self {
            Self::Success(text) => text,
            other => other.to_string(),
        }
    }
}

impl fmt::Display for TurnOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(text) => f.write_str(text),
            Self::Escalated(msg) => write!(f, "Agent escalated: {msg}"),
            Self::Failure(cause) => write!(f, "Error: {cause}"),
            Self::Empty => f.write_str(NO_FINAL_RESPONSE),
        }
    }
}
