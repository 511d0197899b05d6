// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Following the logs of every pod that belongs to a riff resource.

use crate::console::Console;
use crate::error::Result;
use futures::{AsyncBufReadExt, Future, StreamExt, TryStreamExt};
use k8s_openapi::api::core::v1::{ContainerStatus, Pod};
use kube::api::LogParams;
use kube::{Api, Client, ResourceExt};
use kube_runtime::{watcher, WatchStreamExt};
use std::collections::HashSet;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Which pods, and which of their containers, to follow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSelector {
    pub namespace: String,
    pub label_selector: String,
    /// Container names to follow, all containers when empty
    pub containers: Vec<String>,
}

impl LogSelector {
    /// Select the pods labelled `<label_key>=<name of resource>` in the resource's namespace
    pub fn labelled<K: ResourceExt>(resource: &K, label_key: &str, containers: &[&str]) -> Self {
        LogSelector {
            namespace: resource.namespace().unwrap_or_default(),
            label_selector: format!("{}={}", label_key, resource.name_any()),
            containers: containers.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn allows(&self, container: &str) -> bool {
        self.containers.is_empty() || self.containers.iter().any(|c| c == container)
    }
}

pub trait LogTailer: Clone + Send + Sync + 'static {
    /// Print log lines of the selected pods to `console` until `ctx` is cancelled.
    ///
    /// Lines written in the last `since` are included.
    fn tail(
        &self,
        ctx: CancellationToken,
        selector: LogSelector,
        since: Duration,
        console: Console,
    ) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Clone)]
pub struct PodLogTailer {
    client: Client,
}

impl PodLogTailer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl LogTailer for PodLogTailer {
    async fn tail(
        &self,
        ctx: CancellationToken,
        selector: LogSelector,
        since: Duration,
        console: Console,
    ) -> Result<()> {
        debug!("Tailing pods {} in {}", selector.label_selector, selector.namespace);
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), &selector.namespace);
        let config = watcher::Config::default().labels(&selector.label_selector);
        let mut pod_events = watcher(pods.clone(), config)
            .default_backoff()
            .applied_objects()
            .boxed();

        let mut followed = HashSet::new();
        let mut followers = JoinSet::new();

        loop {
            let pod = tokio::select! {
                biased;
                _ = ctx.cancelled() => break,
                next = pod_events.try_next() => match next {
                    Ok(Some(pod)) => pod,
                    Ok(None) => break,
                    Err(e) => {
                        debug!("Pod watch failed: {}", e);
                        continue;
                    }
                },
            };

            let pod_name = pod.name_any();
            // a restarted container is a new log source
            for RunningContainer { name: container, restarts } in running_containers(&pod, &selector) {
                if !followed.insert((pod_name.clone(), container.clone(), restarts)) {
                    continue;
                }
                debug!("Following {}[{}], restart {}", pod_name, container, restarts);
                followers.spawn(follow(
                    pods.clone(),
                    ctx.clone(),
                    LogSource {
                        namespace: selector.namespace.clone(),
                        pod: pod_name.clone(),
                        container,
                    },
                    since,
                    console.clone(),
                ));
            }
        }

        followers.shutdown().await;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningContainer {
    pub name: String,
    pub restarts: i32,
}

/// Containers of `pod` that are running now and pass the selector's filter.
///
/// Init containers are included, builds run their steps in them.
pub fn running_containers(pod: &Pod, selector: &LogSelector) -> Vec<RunningContainer> {
    let Some(status) = pod.status.as_ref() else {
        return Vec::new();
    };
    let running = |s: &&ContainerStatus| s.state.as_ref().is_some_and(|state| state.running.is_some());

    status
        .init_container_statuses
        .iter()
        .flatten()
        .chain(status.container_statuses.iter().flatten())
        .filter(running)
        .filter(|s| selector.allows(&s.name))
        .map(|s| RunningContainer {
            name: s.name.clone(),
            restarts: s.restart_count,
        })
        .collect()
}

struct LogSource {
    namespace: String,
    pod: String,
    container: String,
}

async fn follow(pods: Api<Pod>, ctx: CancellationToken, source: LogSource, since: Duration, console: Console) {
    let params = LogParams {
        container: Some(source.container.clone()),
        follow: true,
        since_seconds: Some(since.as_secs().max(1) as i64),
        ..LogParams::default()
    };

    let stream = async {
        let reader = pods.log_stream(&source.pod, &params).await?;
        let mut lines = Box::pin(reader).lines();
        while let Some(line) = lines.try_next().await? {
            console.print(&format!(
                "{}/{}[{}]: {}",
                source.namespace, source.pod, source.container, line
            ));
        }
        Ok::<_, crate::error::RiffError>(())
    };

    tokio::select! {
        _ = ctx.cancelled() => {}
        result = stream => {
            if let Err(e) = result {
                debug!("Log stream for {}[{}] ended: {}", source.pod, source.container, e);
            }
        }
    }
}
