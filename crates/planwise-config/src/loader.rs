use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::Config;

/// Ordered list of config file locations searched from lowest to highest priority.
/// Later files override earlier ones.
fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("/etc/planwise/config.toml"));

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config/planwise/config.toml"));
    }
    if let Some(cfg) = dirs::config_dir() {
        paths.push(cfg.join("planwise/config.toml"));
    }

    paths.push(PathBuf::from(".planwise/config.toml"));
    paths.push(PathBuf::from("planwise.toml"));

    paths
}

/// Load configuration by merging all discovered TOML files.
/// The `extra` argument may provide an explicit path (e.g. `--config` CLI flag).
pub fn load(extra: Option<&Path>) -> anyhow::Result<Config> {
    let mut merged = toml::Value::Table(toml::map::Map::new());

    let explicit = extra.map(Path::to_path_buf);
    for path in config_search_paths().into_iter().filter(|p| p.is_file()).chain(explicit) {
        debug!(path = %path.display(), "loading config layer");
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let layer: toml::Value = toml::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        merge_toml(&mut merged, layer);
    }

    merged.try_into().context("invalid configuration")
}

/// Parse a single TOML document on top of the defaults.
pub fn load_from_str(text: &str) -> anyhow::Result<Config> {
    toml::from_str(text).context("parsing configuration")
}

/// Deep-merge `src` into `dst`; src wins on scalar conflicts.
fn merge_toml(dst: &mut toml::Value, src: toml::Value) {
    match (dst, src) {
        (toml::Value::Table(d), toml::Value::Table(s)) => {
            for (k, v) in s {
                match d.get_mut(&k) {
                    Some(existing) => merge_toml(existing, v),
                    None => {
                        d.insert(k, v);
                    }
                }
            }
        }
        (dst, src) => *dst = src,
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
