// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes client creation from the user's kubeconfig

use crate::config::Config;
use crate::error::{Result, RiffError};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use std::path::Path;
use tracing::{debug, instrument};

/// Create a client for the cluster the user points at, together with its default namespace
#[instrument(skip(config))]
pub async fn create_client(config: &Config) -> Result<(Client, String)> {
    let client_config = match config.kubeconfig.as_deref() {
        Some(path) => config_from_file(path).await?,
        None => KConfig::infer()
            .await
            .map_err(|e| RiffError::KubeconfigError(format!("Failed to infer config: {}", e)))?,
    };
    debug!(
        "Using cluster {} with default namespace {}",
        client_config.cluster_url, client_config.default_namespace
    );

    let namespace = client_config.default_namespace.clone();
    let client = Client::try_from(client_config)
        .map_err(|e| RiffError::KubeconfigError(format!("Failed to create client: {}", e)))?;
    Ok((client, namespace))
}

async fn config_from_file(path: &Path) -> Result<KConfig> {
    let contents = tokio::fs::read_to_string(path).await?;
    config_from_kubeconfig(&contents).await
}

/// Build a client configuration from kubeconfig YAML
async fn config_from_kubeconfig(kubeconfig: &str) -> Result<KConfig> {
    let parsed: Kubeconfig = serde_yaml::from_str(kubeconfig)
        .map_err(|e| RiffError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e)))?;

    KConfig::from_custom_kubeconfig(parsed, &KubeConfigOptions::default())
        .await
        .map_err(|e| RiffError::KubeconfigError(format!("Failed to create config: {}", e)))
}
