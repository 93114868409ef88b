// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Provider identifier: "google" | "mock"
    pub provider: String,
    /// Model name forwarded to the provider API
    pub name: String,
    /// Environment variable that holds the API key.
    ///
    /// The variable is only ever read.  When neither this nor `api_key` is
    /// set, the Google driver falls back to `GEMINI_API_KEY` and then
    /// `GOOGLE_API_KEY`.
    pub api_key_env: Option<String>,
    /// Explicit API key; prefer api_key_env in config files to avoid secrets
    /// in version-controlled files
    pub api_key: Option<String>,
    /// Base URL override for proxies and test servers.
    pub base_url: Option<String>,
    /// Maximum tokens to request in a single completion
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0–2.0)
    pub temperature: Option<f32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "google".into(),
            name: "gemini-2.5-flash-lite".into(),
            api_key_env: None,
            api_key: None,
            base_url: None,
            max_tokens: Some(8192),
            temperature: Some(0.2),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Application name that scopes every agent session.
    pub app_name: String,
    /// Upper bound on a single turn, in seconds.  0 disables the limit.
    pub turn_timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            app_name: "schedule_manager_app".into(),
            turn_timeout_secs: 120,
        }
    }
}

impl AgentConfig {
    pub fn turn_timeout(&self) -> Option<std::time::Duration> {
        (self.turn_timeout_secs > 0).then(|| std::time::Duration::from_secs(self.turn_timeout_secs))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the HTTP facade listens on.
    pub bind: String,
    /// Browser origins allowed by CORS.  Credentials are always allowed for
    /// these origins, so a wildcard is never accepted here.
    pub cors_origins: Vec<String>,
    /// Maximum number of analyses kept per store before the least recently
    /// used one is evicted.
    pub store_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".into(),
            cors_origins: vec![
                "http://localhost:3000".into(),
                "http://127.0.0.1:3000".into(),
            ],
            store_capacity: 1024,
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
