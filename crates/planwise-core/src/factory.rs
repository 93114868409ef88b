// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use planwise_config::Config;
use planwise_model::ModelProvider;
use tracing::info;
use uuid::Uuid;

use crate::{
    profile::AgentProfile,
    runner::Runner,
    session::{validate_agent_name, InMemorySessionService, SessionError},
};

/// A session ready to take exactly one query.
///
/// Dropping it discards the session together with its private registry.
pub struct BuiltSession {
    pub runner: Runner,
    pub user_id: String,
    pub session_id: String,
}

/// Builds an isolated session per request.
///
/// The model provider is shared and immutable; credentials were bound to it
/// when it was constructed.
#[derive(Clone)]
pub struct SessionFactory {
    app_name: String,
    model: Arc<dyn ModelProvider>,
}

impl SessionFactory {
    pub fn new(app_name: impl Into<String>, model: Arc<dyn ModelProvider>) -> Self {
        Self { app_name: app_name.into(), model }
    }

    /// Resolve the provider (and its credentials) once from configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let model = planwise_model::from_config(&config.model)?;
        Ok(Self::new(config.agent.app_name.clone(), Arc::from(model)))
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Default model id of the shared provider.
    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    pub async fn build(&self, profile: AgentProfile) -> Result<BuiltSession, SessionError> {
        validate_agent_name(&profile.name)?;

        let sessions = Arc::new(InMemorySessionService::new());
        let user_id = format!("user_{}", Uuid::new_v4());
        let session_id = Uuid::new_v4().to_string();
        sessions.create_session(&self.app_name, &user_id, &session_id).await?;

        info!(
            app = %self.app_name,
            agent = %profile.name,
            user_id = %user_id,
            session_id = %session_id,
            "session created"
        );

        let runner = Runner::new(profile, self.app_name.clone(), sessions, Arc::clone(&self.model));
        Ok(BuiltSession { runner, user_id, session_id })
    }
}
