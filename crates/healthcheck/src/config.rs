//! Health check configuration
//!
//! Loaded from a mounted YAML file. `provider` and `extension` are required; everything else
//! has a default.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::checker::log_label_for;
use crate::context::CheckContext;
use crate::logging::LoggingConfig;

/// Main health check configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckConfig {
    /// Provider the checks run for (e.g. "aws")
    pub provider: String,

    /// Extension the checks belong to (e.g. "controlplane")
    pub extension: String,

    /// Upper bound for a single StatefulSet fetch
    #[serde(default = "default_fetch_timeout_seconds")]
    pub fetch_timeout_seconds: u64,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_fetch_timeout_seconds() -> u64 {
    30
}

impl HealthCheckConfig {
    /// Configuration for `provider`/`extension` with default timeout and logging
    pub fn new(provider: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            extension: extension.into(),
            fetch_timeout_seconds: default_fetch_timeout_seconds(),
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from a mounted YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {e}", path.display()))?;

        Self::from_yaml(&config_str)
    }

    pub fn from_yaml(config_str: &str) -> Result<Self, anyhow::Error> {
        let config: HealthCheckConfig = serde_yaml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse config YAML: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.provider.trim().is_empty() {
            return Err(anyhow::anyhow!("provider must not be empty"));
        }
        if self.extension.trim().is_empty() {
            return Err(anyhow::anyhow!("extension must not be empty"));
        }
        if self.fetch_timeout_seconds == 0 {
            return Err(anyhow::anyhow!(
                "fetchTimeoutSeconds must be greater than zero"
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }

    /// Label used to attribute check diagnostics
    #[must_use]
    pub fn log_label(&self) -> String {
        log_label_for(&self.provider, &self.extension)
    }

    /// Context bounded by the configured fetch timeout, cancelled together with `parent`
    #[must_use]
    pub fn context(&self, parent: &CheckContext) -> CheckContext {
        parent.child_with_timeout(self.fetch_timeout())
    }
}
