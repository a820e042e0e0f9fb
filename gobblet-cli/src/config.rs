//! Game and logging settings from `Gobblet.toml` and `GOBBLET_*` variables.

use std::fs;
use std::path::Path;

use anyhow::Context;
use gobblet_engine::EngineConfig;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives, e.g. `gobblet_engine=debug`.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Read `path` if it exists, then apply `GOBBLET_*` overrides.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Self::from_toml(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        config.merge_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Values that fail to parse are ignored.
    fn merge_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("GOBBLET_STARTING_COLOR") {
            if let Ok(color) = val.parse() {
                self.engine.starting_color = color;
            }
        }
        if let Some(val) = var("GOBBLET_LOG") {
            if !val.trim().is_empty() {
                self.log.filter = val;
            }
        }
    }
}
