// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Environment variable consulted when no token is configured.
pub const TOKEN_ENV: &str = "CONTROLLER_TOKEN";

/// Poll interval used when none (or zero) is configured.
pub const DEFAULT_UPDATE_FREQUENCY_SECONDS: u64 = 30;

/// Controller connection settings, as stored in a JSON config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub update_frequency_seconds: u64,
}

impl ControllerConfig {
    /// Fill unset fields: the token from `CONTROLLER_TOKEN`, the interval
    /// from the default. Fails if no token can be found.
    pub fn apply_defaults(&mut self) -> Result<(), SyncError> {
        self.apply_defaults_with(std::env::var(TOKEN_ENV).ok())
    }

    /// [`Self::apply_defaults`] with the environment token supplied by the
    /// caller.
    pub fn apply_defaults_with(&mut self, env_token: Option<String>) -> Result<(), SyncError> {
        if self.token.is_empty() {
            match env_token.filter(|t| !t.is_empty()) {
                Some(token) => self.token = token,
                None => {
                    return Err(SyncError::Configuration(format!(
                        "no token in config, nor {TOKEN_ENV} envar"
                    )))
                }
            }
        }
        if self.update_frequency_seconds == 0 {
            self.update_frequency_seconds = DEFAULT_UPDATE_FREQUENCY_SECONDS;
        }
        Ok(())
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_frequency_seconds)
    }

    /// Load from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, SyncError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SyncError::Configuration(format!("reading {}: {e}", path.display()))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            SyncError::Configuration(format!("parsing {}: {e}", path.display()))
        })
    }
}

/// Command-line and environment configuration for the agentsync binary.
#[derive(Debug, Clone, clap::Args)]
pub struct SyncArgs {
    /// JSON file with `url`, `token`, and `updateFrequencySeconds`.
    #[arg(long, env = "AGENTSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Controller base URL. Overrides the config file.
    #[arg(long, env = "CONTROLLER_URL")]
    pub controller_url: Option<String>,

    /// Bearer token for the controller API. Overrides the config file.
    #[arg(long, env = "CONTROLLER_TOKEN", hide_env_values = true)]
    pub controller_token: Option<String>,

    /// Seconds between polls (0 = default of 30). Overrides the config file.
    #[arg(long, env = "CONTROLLER_UPDATE_FREQUENCY_SECONDS")]
    pub update_frequency_seconds: Option<u64>,

    /// Endpoint types to discover, comma separated.
    #[arg(long, value_delimiter = ',', required = true, env = "CONTROLLER_SERVICE_TYPES")]
    pub service_types: Vec<String>,

    /// Host to bind the health endpoint on.
    #[arg(long, default_value = "127.0.0.1", env = "AGENTSYNC_HOST")]
    pub host: String,

    /// Port for the health endpoint.
    #[arg(long, default_value_t = 9810, env = "AGENTSYNC_PORT")]
    pub port: u16,
}

impl SyncArgs {
    /// Merge the config file (if any) with CLI/env overrides and apply
    /// defaults.
    pub fn controller_config(&self) -> Result<ControllerConfig, SyncError> {
        let mut config = match self.config {
            Some(ref path) => ControllerConfig::from_file(path)?,
            None => ControllerConfig::default(),
        };
        if let Some(ref url) = self.controller_url {
            config.url = url.clone();
        }
        if let Some(ref token) = self.controller_token {
            config.token = token.clone();
        }
        if let Some(secs) = self.update_frequency_seconds {
            config.update_frequency_seconds = secs;
        }
        config.apply_defaults()?;
        if config.url.is_empty() {
            return Err(SyncError::Configuration("controller url is not set".to_owned()));
        }
        Ok(config)
    }

    /// Service types with surrounding whitespace and empty entries removed.
    pub fn service_types(&self) -> Vec<String> {
        self.service_types
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
