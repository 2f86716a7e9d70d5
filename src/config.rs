//! CLI configuration
//!
//! Settings are layered: built-in defaults, then an optional JSON file, then
//! the `PRISM_UNPIVOT_LOG` environment variable, then command-line flags.

use crate::common::error::{PrismError, PrismResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Environment variable overriding the log filter
pub const LOG_ENV_VAR: &str = "PRISM_UNPIVOT_LOG";

/// How plans are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented operator tree
    #[default]
    Tree,
    /// Plan serialized as pretty-printed JSON
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Tree => f.write_str("tree"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// Configuration for the `prism-unpivot` binary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Plan output format
    pub format: OutputFormat,
    /// `tracing` filter directive, e.g. `warn` or `prism_unpivot=debug`
    pub log_filter: String,
    /// Keep REPL history in the home directory
    pub history: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            format: OutputFormat::Tree,
            log_filter: "warn".to_string(),
            history: true,
        }
    }
}

impl CliConfig {
    /// Load a configuration file; missing keys fall back to defaults
    pub fn load(path: impl AsRef<Path>) -> PrismResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: CliConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Apply `PRISM_UNPIVOT_LOG` from the process environment
    pub fn with_env(self) -> Self {
        self.with_log_override(std::env::var(LOG_ENV_VAR).ok())
    }

    /// Replace the log filter when `filter` is set and non-blank
    pub fn with_log_override(mut self, filter: Option<String>) -> Self {
        if let Some(filter) = filter.filter(|f| !f.trim().is_empty()) {
            self.log_filter = filter;
        }
        self
    }

    pub fn validate(&self) -> PrismResult<()> {
        if self.log_filter.trim().is_empty() {
            return Err(PrismError::Config("log_filter must not be empty".to_string()));
        }
        Ok(())
    }
}
