// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use planwise_model::Message;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid agent name {0:?}: must be an identifier and not \"user\"")]
    InvalidAgentName(String),

    #[error("session already exists: {0}")]
    SessionExists(SessionKey),

    #[error("session not found: {0}")]
    SessionNotFound(SessionKey),
}

/// Identifies a session within an application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub app_name: String,
    pub user_id: String,
    pub session_id: String,
}

impl SessionKey {
    pub fn new(app_name: &str, user_id: &str, session_id: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
        }
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.app_name, self.user_id, self.session_id)
    }
}

/// Conversational state of one session.
#[derive(Debug, Clone)]
pub struct Session {
    pub key: SessionKey,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<Message>,
}

/// Session registry held entirely in memory.
///
/// Each factory build creates its own registry, so nothing outlives the
/// request that created it.
#[derive(Debug, Default)]
pub struct InMemorySessionService {
    sessions: Mutex<HashMap<SessionKey, Session>>,
}

impl InMemorySessionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<SessionKey, SessionError> {
        let key = SessionKey::new(app_name, user_id, session_id);
        let mut sessions = self.sessions.lock().await;
        if sessions.contains_key(&key) {
            return Err(SessionError::SessionExists(key));
        }
        debug!(session = %key, "session created");
        sessions.insert(
            key.clone(),
            Session { key: key.clone(), created_at: Utc::now(), messages: Vec::new() },
        );
        Ok(key)
    }

    pub async fn get(&self, key: &SessionKey) -> Result<Session, SessionError> {
        self.sessions
            .lock()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| SessionError::SessionNotFound(key.clone()))
    }

    pub async fn append(&self, key: &SessionKey, message: Message) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(key)
            .ok_or_else(|| SessionError::SessionNotFound(key.clone()))?;
        session.messages.push(message);
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Agent names must be plain identifiers; `user` is reserved for the
/// author of incoming messages.
pub(crate) fn validate_agent_name(name: &str) -> Result<(), SessionError> {
    let mut chars = name.chars();
    let starts_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if starts_ok && rest_ok && name != "user" {
        Ok(())
    } else {
        Err(SessionError::InvalidAgentName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_session_is_rejected() {
        let svc = InMemorySessionService::new();
        svc.create_session("app", "u", "s").await.unwrap();
        let err = svc.create_session("app", "u", "s").await.unwrap_err();
        assert!(matches!(err, SessionError::SessionExists(_)));
        assert_eq!(svc.len().await, 1);
    }

    #[tokio::test]
    async fn append_to_unknown_session_fails() {
        let svc = InMemorySessionService::new();
        let key = SessionKey::new("app", "u", "missing");
        let err = svc.append(&key, Message::user("hi")).await.unwrap_err();
        assert_eq!(err, SessionError::SessionNotFound(key));
    }

    #[tokio::test]
    async fn append_records_history_in_order() {
        let svc = InMemorySessionService::new();
        let key = svc.create_session("app", "u", "s").await.unwrap();
        svc.append(&key, Message::user("q")).await.unwrap();
        svc.append(&key, Message::assistant("a")).await.unwrap();
        let session = svc.get(&key).await.unwrap();
        assert_eq!(session.messages, vec![Message::user("q"), Message::assistant("a")]);
    }

    #[test]
    fn agent_names() {
        assert!(validate_agent_name("EventUnderstandingAgent").is_ok());
        assert!(validate_agent_name("_agent_2").is_ok());
        assert!(validate_agent_name("").is_err());
        assert!(validate_agent_name("2fast").is_err());
        assert!(validate_agent_name("has space").is_err());
        assert!(validate_agent_name("user").is_err());
    }
}
