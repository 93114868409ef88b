// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::time::Duration;

use futures::StreamExt;
use planwise_config::AgentConfig;
use tracing::{debug, error, info, warn};

use crate::{
    events::{Content, TurnEvent},
    factory::BuiltSession,
    outcome::{TurnOutcome, NO_SPECIFIC_MESSAGE},
    runner::AgentRuntime,
};

/// Sends a single query into a session and reduces the resulting event
/// sequence to one [`TurnOutcome`].
///
/// Events are consumed strictly in order and consumption stops at the first
/// final event.  Errors never escape: they become [`TurnOutcome::Failure`].
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    turn_timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new(turn_timeout: Option<Duration>) -> Self {
        Self { turn_timeout }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(config.turn_timeout())
    }

    pub async fn dispatch(
        &self,
        query: &str,
        runtime: &dyn AgentRuntime,
        user_id: &str,
        session_id: &str,
    ) -> TurnOutcome {
        info!(user_id, session_id, "dispatching query");
        let turn = async {
            consume(query, runtime, user_id, session_id)
                .await
                .unwrap_or_else(|e| TurnOutcome::Failure(format!("{e:#}")))
        };

        let outcome = match self.turn_timeout {
            Some(limit) => tokio::time::timeout(limit, turn).await.unwrap_or_else(|_| {
                TurnOutcome::Failure(format!("turn timed out after {}s", limit.as_secs_f32()))
            }),
            None => turn.await,
        };

        match &outcome {
            TurnOutcome::Success(text) => info!(chars = text.len(), "final response received"),
            TurnOutcome::Escalated(msg) => warn!(message = %msg, "agent escalated"),
            TurnOutcome::Failure(cause) => error!(error = %cause, "turn failed"),
            TurnOutcome::Empty => warn!("agent did not produce a final response"),
        }
        outcome
    }

    /// Dispatch into a session freshly built by the factory.
    pub async fn dispatch_session(&self, query: &str, session: &BuiltSession) -> TurnOutcome {
        self.dispatch(query, &session.runner, &session.user_id, &session.session_id).await
    }
}

async fn consume(
    query: &str,
    runtime: &dyn AgentRuntime,
    user_id: &str,
    session_id: &str,
) -> anyhow::Result<TurnOutcome> {
    let mut events = runtime.run(user_id, session_id, Content::user(query)).await?;
    let mut count = 0usize;

    while let Some(event) = events.next().await {
        let event = event?;
        count += 1;
        debug!(count, author = %event.author, is_final = event.is_final_response(), "turn event");
        if event.is_final_response() {
            return Ok(conclude(&event));
        }
    }

    if count == 0 {
        warn!("no events received from agent");
    }
    Ok(TurnOutcome::Empty)
}

fn conclude(event: &TurnEvent) -> TurnOutcome {
    if let Some(text) = event.content.as_ref().and_then(Content::first_text) {
        TurnOutcome::Success(text.to_string())
    } else if event.escalates() {
        TurnOutcome::Escalated(
            event.error_message.clone().unwrap_or_else(|| NO_SPECIFIC_MESSAGE.to_string()),
        )
    } else {
        TurnOutcome::Empty
    }
}
