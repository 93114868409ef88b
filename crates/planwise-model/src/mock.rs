// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::anyhow;
use async_trait::async_trait;
use futures::stream;

use crate::{provider::ResponseStream, CompletionRequest, ResponseEvent};

/// Deterministic mock provider for tests.  Echoes the last user message
/// back as the assistant response.
#[derive(Default)]
pub struct MockProvider;

#[async_trait]
impl crate::ModelProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }
    fn model_name(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<ResponseStream> {
        let reply = req
            .messages
            .iter()
            .rev()
            .find(|m| matches!(m.role, crate::Role::User))
            .and_then(|m| m.as_text())
            .unwrap_or("[no input]")
            .to_string();

        let events: Vec<anyhow::Result<ResponseEvent>> = vec![
            Ok(ResponseEvent::TextDelta(format!("MOCK: {reply}"))),
            Ok(ResponseEvent::Usage { input_tokens: 10, output_tokens: 10 }),
            Ok(ResponseEvent::Done),
        ];
        Ok(Box::pin(stream::iter(events)))
    }
}

/// One scripted reply: either a list of stream items or a refusal to start.
#[derive(Debug, Clone)]
pub enum Script {
    Events(Vec<Result<ResponseEvent, String>>),
    Reject(String),
}

/// A pre-scripted mock provider.  Each call to `complete` pops the next
/// script from the front of the queue, so tests can specify exact event
/// sequences (including mid-stream transport errors) without network access.
pub struct ScriptedMockProvider {
    scripts: Mutex<VecDeque<Script>>,
    /// The last `CompletionRequest` seen by this provider.
    pub last_request: Arc<Mutex<Option<CompletionRequest>>>,
}

impl ScriptedMockProvider {
    /// Build a provider from a list of response scripts, one per call.
    pub fn new(scripts: Vec<Vec<ResponseEvent>>) -> Self {
        Self::from_scripts(
            scripts
                .into_iter()
                .map(|s| Script::Events(s.into_iter().map(Ok).collect()))
                .collect(),
        )
    }

    pub fn from_scripts(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Convenience: provider that returns a single text reply.
    pub fn always_text(reply: impl Into<String>) -> Self {
        Self::new(vec![vec![
            ResponseEvent::TextDelta(reply.into()),
            ResponseEvent::Usage { input_tokens: 5, output_tokens: 5 },
            ResponseEvent::Done,
        ]])
    }

    /// Convenience: provider whose first call fails before streaming.
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self::from_scripts(vec![Script::Reject(message.into())])
    }

    /// The request recorded by the most recent `complete` call.
    pub fn take_last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

#[async_trait]
impl crate::ModelProvider for ScriptedMockProvider {
    fn name(&self) -> &str {
        "scripted-mock"
    }
    fn model_name(&self) -> &str {
        "scripted-mock-model"
    }

    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<ResponseStream> {
        *self.last_request.lock().unwrap_or_else(PoisonError::into_inner) = Some(req);
        let script = self
            .scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| {
                Script::Events(vec![
                    Ok(ResponseEvent::TextDelta("[no more scripts]".into())),
                    Ok(ResponseEvent::Done),
                ])
            });
        match script {
            Script::Reject(msg) => Err(anyhow!(msg)),
            Script::Events(items) => {
                let wrapped: Vec<anyhow::Result<ResponseEvent>> =
                    items.into_iter().map(|r| r.map_err(|e| anyhow!(e))).collect();
                Ok(Box::pin(stream::iter(wrapped)))
            }
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;
    use crate::{Message, ModelProvider};

    fn req() -> CompletionRequest {
        CompletionRequest { messages: vec![Message::user("hi")], stream: true, ..Default::default() }
    }

    #[tokio::test]
    async fn mock_echoes_last_user_message() {
        let mut stream = MockProvider.complete(req()).await.unwrap();
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first, ResponseEvent::TextDelta("MOCK: hi".into()));
    }

    #[tokio::test]
    async fn mock_ends_with_done() {
        let events: Vec<_> = MockProvider.complete(req()).await.unwrap().collect().await;
        assert!(matches!(events.last(), Some(Ok(ResponseEvent::Done))));
    }

    #[tokio::test]
    async fn scripted_records_request_and_replays_script() {
        let p = ScriptedMockProvider::always_text("hello world");
        let mut stream = p.complete(req()).await.unwrap();
        let ev = stream.next().await.unwrap().unwrap();
        assert_eq!(ev, ResponseEvent::TextDelta("hello world".into()));
        let seen = p.take_last_request().unwrap();
        assert_eq!(seen.messages[0].content, "hi");
    }

    #[tokio::test]
    async fn scripted_transport_error_is_yielded_in_order() {
        let p = ScriptedMockProvider::from_scripts(vec![Script::Events(vec![
            Ok(ResponseEvent::TextDelta("a".into())),
            Err("connection reset".into()),
        ])]);
        let items: Vec<_> = p.complete(req()).await.unwrap().collect().await;
        assert!(items[0].is_ok());
        assert_eq!(items[1].as_ref().unwrap_err().to_string(), "connection reset");
    }

    #[tokio::test]
    async fn rejecting_fails_to_start() {
        let p = ScriptedMockProvider::rejecting("quota exceeded");
        assert!(p.complete(req()).await.is_err());
    }

    #[tokio::test]
    async fn scripted_fallback_when_scripts_exhausted() {
        let p = ScriptedMockProvider::new(vec![]);
        let mut stream = p.complete(req()).await.unwrap();
        let ev = stream.next().await.unwrap().unwrap();
        assert!(matches!(ev, ResponseEvent::TextDelta(t) if t.contains("no more scripts")));
    }
}
