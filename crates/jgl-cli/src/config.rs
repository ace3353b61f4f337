//! Layered settings: defaults, then an optional TOML file, then environment.
//! Command-line flags are applied last by each command.

use std::path::Path;

use anyhow::{Context, Result};
use jgl_core::analytics::{LeidenParams, DEFAULT_PROJECTION};
use jgl_graph::{GraphConfig, IngestOptions};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub graph: GraphConfig,
    pub ingest: IngestOptions,
    pub analytics: AnalyticsSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    pub projection: String,
    #[serde(flatten)]
    pub leiden: LeidenParams,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            projection: DEFAULT_PROJECTION.to_string(),
            leiden: LeidenParams::default(),
        }
    }
}

impl Settings {
    /// Load settings from an optional TOML file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                Self::from_toml(&text)
                    .with_context(|| format!("Invalid config file {}", path.display()))?
            }
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Override connection and projection settings from environment variables.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(uri) = var("NEO4J_URI") {
            self.graph.uri = uri;
        }
        if let Some(user) = var("NEO4J_USER") {
            self.graph.user = user;
        }
        if let Some(password) = var("NEO4J_PASSWORD") {
            self.graph.password = password;
        }
        if let Some(database) = var("NEO4J_DATABASE") {
            self.graph.database = database;
        }
        if let Some(projection) = var("JGL_PROJECTION") {
            self.analytics.projection = projection;
        }
    }
}
