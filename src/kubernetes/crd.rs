// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Discovery of the riff custom resources installed in the cluster

use crate::constants::groups;
use crate::error::Result;
use kube::{discovery::Discovery, Client};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, instrument};

/// The riff API groups, and their resources, served by the API server
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServedResources {
    groups: BTreeSet<String>,
    resources: HashSet<(String, String)>,
}

impl ServedResources {
    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    /// `plural` is the resource name, e.g. `applications`
    pub fn has_resource(&self, group: &str, plural: &str) -> bool {
        self.resources
            .contains(&(group.to_string(), plural.to_string()))
    }

    pub fn insert(&mut self, group: &str, plural: &str) {
        self.groups.insert(group.to_string());
        self.resources
            .insert((group.to_string(), plural.to_string()));
    }
}

/// Discover which riff resources are installed.
#[instrument(skip(client))]
pub async fn discover_riff_resources(client: &Client) -> Result<ServedResources> {
    let discovery = Discovery::new(client.clone())
        .filter(&groups::ALL)
        .run()
        .await?;

    let mut served = ServedResources::default();
    for group in discovery.groups() {
        for (ar, _) in group.recommended_resources() {
            debug!("Found {}.{}/{}", ar.plural, ar.group, ar.version);
            served.insert(&ar.group, &ar.plural);
        }
    }

    Ok(served)
}
