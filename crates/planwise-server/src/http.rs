// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Route handlers.
//!
//! | Method | Path      | Body                  | Response                                  |
//! |--------|-----------|-----------------------|-------------------------------------------|
//! | POST   | `/events` | `{title, datetime}`   | `{event_id, analysis, status, guidance?}` |
//! | GET    | `/events` |                       | `{event_id: EventRecord}`                 |
//! | POST   | `/notes`  | `{event_id, note}`    | analysis string                           |
//! | GET    | `/notes`  |                       | `{event_id: analysis}`                    |
//! | GET    | `/health` |                       | `ok`                                      |
//!
//! Agent failures never change the HTTP status; clients branch on `status`.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use planwise_core::{
    analysis::{self, EventGuidance},
    OutcomeKind, ProfileKind,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::ApiError,
    state::{AppState, EventRecord},
};

#[derive(Debug, Deserialize)]
pub struct EventInput {
    pub title: String,
    pub datetime: String,
}

#[derive(Debug, Deserialize)]
pub struct NoteInput {
    pub event_id: String,
    pub note: String,
}

#[derive(Debug, Serialize)]
pub struct EventCreated {
    pub event_id: String,
    pub analysis: String,
    pub status: OutcomeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<EventGuidance>,
}

/// The text sent to the event agent: the date prefixes the title when known.
fn event_query(title: &str, datetime: &str) -> String {
    let datetime = datetime.trim();
    if datetime.is_empty() {
        title.to_string()
    } else {
        format!("{datetime}: {title}")
    }
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(input): Json<EventInput>,
) -> Result<Json<EventCreated>, ApiError> {
    let query = event_query(&input.title, &input.datetime);
    let outcome = state.ask(ProfileKind::EventUnderstanding, &query).await?;

    let status = outcome.kind();
    let analysis = outcome.into_text();
    let guidance = match status {
        OutcomeKind::Success => analysis::parse::<EventGuidance>(&analysis),
        _ => None,
    };

    let event_id = Uuid::new_v4().to_string();
    state
        .events
        .insert(
            event_id.clone(),
            EventRecord {
                title: input.title,
                datetime: input.datetime,
                analysis: analysis.clone(),
                status,
                guidance: guidance.clone(),
            },
        )
        .await;
    info!(event_id = %event_id, ?status, "event analysed");

    Ok(Json(EventCreated { event_id, analysis, status, guidance }))
}

pub async fn list_events(State(state): State<AppState>) -> Json<BTreeMap<String, EventRecord>> {
    Json(state.events.snapshot().await)
}

pub async fn add_note(
    State(state): State<AppState>,
    Json(input): Json<NoteInput>,
) -> Result<Json<String>, ApiError> {
    let outcome = state.ask(ProfileKind::Reflection, &input.note).await?;
    let status = outcome.kind();
    let reflection = outcome.into_text();

    state.notes.insert(input.event_id.clone(), reflection.clone()).await;
    info!(event_id = %input.event_id, ?status, "note reflected");

    Ok(Json(reflection))
}

pub async fn list_notes(State(state): State<AppState>) -> Json<BTreeMap<String, String>> {
    Json(state.notes.snapshot().await)
}

pub async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_prefixes_title() {
        assert_eq!(event_query("Law exam at 9 AM", "15 Feb 2024"), "15 Feb 2024: Law exam at 9 AM");
    }

    #[test]
    fn blank_datetime_sends_title_only() {
        assert_eq!(event_query("Dentist", "  "), "Dentist");
    }
}
