// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Normalisation of agent answers.
//!
//! The agents are told to answer with bare JSON, yet replies regularly come
//! wrapped in a Markdown code fence or with a sentence around the object.
//! [`extract_json`] recovers the object in those cases.

use std::sync::LazyLock;

use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```(?:json\s*)?(.*?)```").expect("fence pattern is valid")
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    pub title: String,
    pub url: String,
}

/// Preparation guidance for a scheduled event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventGuidance {
    pub event_title: String,
    pub category: String,
    pub long_term_preparation: Vec<String>,
    pub reminder_before_event: Vec<String>,
    pub references: Vec<Reference>,
}

/// Lessons drawn from a post-event note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reflection {
    pub category: String,
    pub summary: String,
    pub advice: Vec<String>,
    pub references: Vec<Reference>,
}

/// Pull a JSON object out of free-form agent text.
///
/// Tries, in order: the contents of the first code fence (or the whole
/// text), then the slice from the first `{` to the last `}`.
pub fn extract_json(text: &str) -> Option<Value> {
    let body = FENCE
        .captures(text)
        .and_then(|c| c.get(1))
        .map_or(text, |m| m.as_str())
        .trim();

    if let Ok(v) = serde_json::from_str::<Value>(body) {
        return Some(v);
    }

    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&body[start..=end]).ok()
}

/// Decode agent text into a typed view, `None` when it holds no matching object.
pub fn parse<T: DeserializeOwned>(text: &str) -> Option<T> {
    extract_json(text).filter(Value::is_object).and_then(|v| serde_json::from_value(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_json_parses() {
        let v = extract_json(r#"{"category":"work"}"#).unwrap();
        assert_eq!(v["category"], "work");
    }

    #[test]
    fn fenced_json_parses() {
        let text = "```json\n{\"category\": \"academic\", \"summary\": \"late\"}\n```";
        let r: Reflection = parse(text).unwrap();
        assert_eq!(r.category, "academic");
        assert_eq!(r.summary, "late");
        assert!(r.advice.is_empty());
    }

    #[test]
    fn plain_fence_without_language_tag() {
        let v = extract_json("```\n{\"a\": 1}\n```").unwrap();
        assert_eq!(v["a"], 1);
    }

    #[test]
    fn object_embedded_in_chatter_is_sliced_out() {
        let text = "Here is your plan: {\"event_title\": \"Law exam\", \"references\": [{\"title\": \"t\", \"url\": \"u\"}]} Good luck!";
        let g: EventGuidance = parse(text).unwrap();
        assert_eq!(g.event_title, "Law exam");
        assert_eq!(g.references, vec![Reference { title: "t".into(), url: "u".into() }]);
    }

    #[test]
    fn non_json_yields_none() {
        assert!(extract_json("Agent did not produce a final response.").is_none());
        assert!(extract_json("} backwards {").is_none());
    }

    #[test]
    fn json_array_is_not_a_typed_view() {
        assert!(parse::<Reflection>("[1, 2]").is_none());
    }
}
