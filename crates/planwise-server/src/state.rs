// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use planwise_config::Config;
use planwise_core::{
    analysis::EventGuidance, Dispatcher, OutcomeKind, ProfileKind, SessionFactory, TurnOutcome,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, store::BoundedStore};

/// A scheduled event and the agent's analysis of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub title: String,
    pub datetime: String,
    pub analysis: String,
    pub status: OutcomeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidance: Option<EventGuidance>,
}

#[derive(Clone)]
pub struct AppState {
    pub factory: SessionFactory,
    pub dispatcher: Dispatcher,
    pub events: Arc<BoundedStore<EventRecord>>,
    pub notes: Arc<BoundedStore<String>>,
}

impl AppState {
    pub fn new(factory: SessionFactory, dispatcher: Dispatcher, store_capacity: usize) -> Self {
        Self {
            factory,
            dispatcher,
            events: Arc::new(BoundedStore::new("events", store_capacity)),
            notes: Arc::new(BoundedStore::new("notes", store_capacity)),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            SessionFactory::from_config(config)?,
            Dispatcher::from_config(&config.agent),
            config.server.store_capacity,
        ))
    }

    /// Build a throwaway session for `kind` and run one query in it.
    pub async fn ask(&self, kind: ProfileKind, query: &str) -> Result<TurnOutcome, ApiError> {
        let session = self.factory.build(kind.profile(self.factory.model_name())).await?;
        Ok(self.dispatcher.dispatch_session(query, &session).await)
    }
}
