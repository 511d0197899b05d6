// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Change notifications for a single resource type.

use crate::error::{Result, RiffError};
use crate::types::conditions::ConditionStatus;
use crate::types::RiffResource;
use futures::stream::BoxStream;
use futures::StreamExt;
use kube::{Api, Client, ResourceExt};
use kube_runtime::watcher;
use tracing::debug;

#[derive(Debug, Clone)]
pub enum ResourceEvent<K> {
    /// The object was listed, added or modified
    Applied(K),
    Deleted(K),
}

/// A source of change events for one resource type.
///
/// Every call to [`ListWatch::watch`] opens a new subscription which lives until the returned
/// stream is dropped.
pub trait ListWatch<K>: Send + Sync {
    fn watch(&self) -> BoxStream<'static, Result<ResourceEvent<K>>>;
}

/// The object a readiness wait is about.
pub trait WatchTarget {
    /// UID distinguishing this object from a recreated one with the same name
    fn identity(&self) -> Option<String>;

    /// Lower case kind and name of the object
    fn reference(&self) -> (String, String);

    fn readiness(&self) -> Readiness;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    /// The ready condition is False, with its message
    Failed(String),
    Pending,
}

impl<K: RiffResource> WatchTarget for K {
    fn identity(&self) -> Option<String> {
        self.uid()
    }

    fn reference(&self) -> (String, String) {
        (K::kind(&()).to_lowercase(), self.name_any())
    }

    fn readiness(&self) -> Readiness {
        match self.ready_condition() {
            Some(c) if c.status == ConditionStatus::True => Readiness::Ready,
            Some(c) if c.status == ConditionStatus::False => {
                Readiness::Failed(c.message.clone().unwrap_or_default())
            }
            _ => Readiness::Pending,
        }
    }
}

/// Watches objects through the Kubernetes API with the kube runtime watcher.
pub struct ApiListWatch<K: RiffResource> {
    api: Api<K>,
    config: watcher::Config,
}

impl<K: RiffResource> ApiListWatch<K> {
    pub fn namespaced(client: Client, namespace: &str) -> Self {
        ApiListWatch {
            api: Api::namespaced(client, namespace),
            config: watcher::Config::default(),
        }
    }

    /// Only receive events for objects with this name
    pub fn named(mut self, name: &str) -> Self {
        self.config = self.config.fields(&format!("metadata.name={}", name));
        self
    }
}

impl<K: RiffResource> ListWatch<K> for ApiListWatch<K> {
    fn watch(&self) -> BoxStream<'static, Result<ResourceEvent<K>>> {
        watcher(self.api.clone(), self.config.clone())
            .filter_map(|event| async move {
                match event {
                    Ok(watcher::Event::Apply(obj)) | Ok(watcher::Event::InitApply(obj)) => {
                        Some(Ok(ResourceEvent::Applied(obj)))
                    }
                    Ok(watcher::Event::Delete(obj)) => Some(Ok(ResourceEvent::Deleted(obj))),
                    Ok(watcher::Event::Init) | Ok(watcher::Event::InitDone) => None,
                    Err(e) => {
                        debug!("Watch failed: {}", e);
                        Some(Err(RiffError::WatchError(e.to_string())))
                    }
                }
            })
            .boxed()
    }
}
