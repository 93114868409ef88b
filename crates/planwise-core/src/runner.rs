// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::{pin::Pin, sync::Arc};

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use planwise_model::{CompletionRequest, Message, ModelProvider, ResponseEvent};
use tracing::{debug, warn};

use crate::{
    events::{Content, Part, TurnEvent},
    profile::AgentProfile,
    session::{InMemorySessionService, SessionKey},
};

pub type EventStream = Pin<Box<dyn Stream<Item = anyhow::Result<TurnEvent>> + Send>>;

/// Executes one turn of an agent inside an existing session.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    async fn run(&self, user_id: &str, session_id: &str, message: Content)
        -> anyhow::Result<EventStream>;
}

/// Runs an [`AgentProfile`] against a model provider, recording the turn in
/// its session registry.
pub struct Runner {
    profile: AgentProfile,
    app_name: String,
    sessions: Arc<InMemorySessionService>,
    model: Arc<dyn ModelProvider>,
}

impl Runner {
    pub fn new(
        profile: AgentProfile,
        app_name: impl Into<String>,
        sessions: Arc<InMemorySessionService>,
        model: Arc<dyn ModelProvider>,
    ) -> Self {
        Self { profile, app_name: app_name.into(), sessions, model }
    }

    pub fn sessions(&self) -> &Arc<InMemorySessionService> {
        &self.sessions
    }
}

#[async_trait]
impl AgentRuntime for Runner {
    async fn run(
        &self,
        user_id: &str,
        session_id: &str,
        message: Content,
    ) -> anyhow::Result<EventStream> {
        let key = SessionKey::new(&self.app_name, user_id, session_id);
        let history = self.sessions.get(&key).await?.messages;

        let query: String = message.parts.iter().filter_map(|p| p.text.as_deref()).collect();
        self.sessions.append(&key, Message::user(query.clone())).await?;

        let mut messages = Vec::with_capacity(history.len() + 2);
        if !self.profile.instruction.is_empty() {
            messages.push(Message::system(self.profile.instruction.clone()));
        }
        messages.extend(history);
        messages.push(Message::user(query));

        let req = CompletionRequest {
            messages,
            capabilities: self.profile.capabilities.clone(),
            model: Some(self.profile.model.clone()),
            stream: true,
        };

        debug!(agent = %self.profile.name, provider = self.model.name(), session = %key, "starting turn");
        let mut upstream = self.model.complete(req).await?;

        let author = self.profile.name.clone();
        let sessions = Arc::clone(&self.sessions);
        let stream = async_stream::stream! {
            let mut answer = String::new();
            let mut produced = false;
            let mut escalation: Option<String> = None;
            let mut failed = false;

            while let Some(item) = upstream.next().await {
                match item {
                    Err(e) => {
                        failed = true;
                        yield Err(e);
                        break;
                    }
                    Ok(ResponseEvent::TextDelta(t)) => {
                        if t.is_empty() {
                            continue;
                        }
                        answer.push_str(&t);
                        produced = true;
                        yield Ok(TurnEvent::partial(&author, vec![Part::text(t)]));
                    }
                    Ok(ResponseEvent::ThinkingDelta(t)) => {
                        produced = true;
                        yield Ok(TurnEvent::partial(&author, vec![Part { text: Some(t), thought: true }]));
                    }
                    Ok(ResponseEvent::Usage { input_tokens, output_tokens }) => {
                        debug!(input_tokens, output_tokens, "token usage");
                    }
                    Ok(ResponseEvent::Done) => break,
                    Ok(ResponseEvent::Error(msg)) => {
                        warn!(agent = %author, error = %msg, "model ended the turn with an error");
                        escalation = Some(msg);
                        break;
                    }
                }
            }

            if !failed {
                if let Some(msg) = escalation {
                    yield Ok(TurnEvent::escalation(&author, Some(msg)));
                } else if produced {
                    let parts = if answer.is_empty() { Vec::new() } else { vec![Part::text(answer.clone())] };
                    if !answer.is_empty() {
                        if let Err(e) = sessions.append(&key, Message::assistant(answer)).await {
                            yield Err(e.into());
                        }
                    }
                    yield Ok(TurnEvent::reply(&author, parts));
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
