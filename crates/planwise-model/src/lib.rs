mod types;
mod provider;
mod google;
mod mock;

pub use types::*;
pub use provider::{ModelProvider, ResponseStream};
pub use google::GoogleProvider;
pub use mock::{MockProvider, Script, ScriptedMockProvider};

use anyhow::bail;
use planwise_config::ModelConfig;

/// Environment variables consulted, in order, when the config names no key.
const GOOGLE_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Construct a boxed [`ModelProvider`] from configuration.
///
/// Provider selection:
/// - `"google"` → [`GoogleProvider`]
/// - `"mock"` → [`MockProvider`] (echo-back)
pub fn from_config(cfg: &ModelConfig) -> anyhow::Result<Box<dyn ModelProvider>> {
    match cfg.provider.as_str() {
        "google" | "gemini" => Ok(Box::new(GoogleProvider::new(
            cfg.name.clone(),
            resolve_api_key(cfg, GOOGLE_KEY_VARS),
            cfg.base_url.clone(),
            cfg.max_tokens,
            cfg.temperature,
        ))),
        "mock" => Ok(Box::new(MockProvider)),
        other => bail!("unknown model provider: {other}"),
    }
}

/// Resolve the API key without touching process-wide state: an explicit
/// key wins, then the configured variable, then the provider's well-known
/// variables.
fn resolve_api_key(cfg: &ModelConfig, fallbacks: &[&str]) -> Option<String> {
    if let Some(k) = &cfg.api_key {
        return Some(k.clone());
    }
    if let Some(env) = &cfg.api_key_env {
        return std::env::var(env).ok();
    }
    fallbacks.iter().find_map(|v| std::env::var(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_key_wins() {
        let cfg = ModelConfig {
            api_key: Some("k-1".into()),
            api_key_env: Some("PLANWISE_TEST_UNSET_VAR".into()),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&cfg, GOOGLE_KEY_VARS).as_deref(), Some("k-1"));
    }

    #[test]
    fn named_env_var_that_is_unset_yields_none() {
        let cfg = ModelConfig {
            api_key_env: Some("PLANWISE_TEST_DEFINITELY_UNSET_9F3A".into()),
            ..Default::default()
        };
        assert!(resolve_api_key(&cfg, &[]).is_none());
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let cfg = ModelConfig { provider: "nope".into(), ..Default::default() };
        let err = from_config(&cfg).err().unwrap();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn google_provider_uses_configured_model() {
        let cfg = ModelConfig { api_key: Some("k".into()), ..Default::default() };
        let p = from_config(&cfg).unwrap();
        assert_eq!(p.name(), "google");
        assert_eq!(p.model_name(), "gemini-2.5-flash-lite");
    }
}
