// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::wait::TAIL_SINCE_CREATE_DEFAULT_SECS;
use crate::duration::parse_duration;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit kubeconfig file, otherwise the kubeconfig is inferred
    pub kubeconfig: Option<PathBuf>,
    /// How far back to read logs when tailing a resource
    pub tail_since: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            kubeconfig: None,
            tail_since: Duration::from_secs(TAIL_SINCE_CREATE_DEFAULT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(path) = env::var("RIFF_KUBECONFIG") {
            if !path.is_empty() {
                config.kubeconfig = Some(PathBuf::from(path));
            }
        }

        if let Ok(since) = env::var("RIFF_TAIL_SINCE") {
            config.tail_since = parse_duration(&since)
                .with_context(|| format!("RIFF_TAIL_SINCE is not a valid duration: {}", since))?;
        }

        Ok(config)
    }

    /// Apply command line overrides on top of the environment
    pub fn with_kubeconfig(mut self, kubeconfig: Option<PathBuf>) -> Self {
        if kubeconfig.is_some() {
            self.kubeconfig = kubeconfig;
        }
        self
    }
}
