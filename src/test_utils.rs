// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses, watch sources and log output.

use crate::console::Console;
use crate::error::{Result, RiffError};
use crate::kubernetes::logs::{LogSelector, LogTailer};
use crate::kubernetes::watch::{ListWatch, ResourceEvent};
use crate::types::build::{Application, ApplicationSpec, BuildStatus};
use crate::types::conditions::{Condition, ConditionStatus, Status, READY};
use futures::channel::mpsc::{unbounded, UnboundedSender};
use futures::stream::BoxStream;
use futures::StreamExt;
use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower::Service;

/// Requests carrying `watch=true` are looked up under this method
const WATCH: &str = "WATCH";

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    /// Add a response for watch requests, the body holds newline separated watch events
    pub fn on_watch(self, path: &str, status: u16, body: &str) -> Self {
        self.on(WATCH, path, status, body)
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();

        // Try exact match first
        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        // Try prefix match for paths like /api/v1/namespaces/foo
        for ((m, p), resp) in responses.iter() {
            if m == method && path.starts_with(p) {
                return Some(resp.clone());
            }
        }

        None
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let is_watch = req
            .uri()
            .query()
            .is_some_and(|q| q.split('&').any(|p| p == "watch=true"));
        let method = if is_watch {
            WATCH.to_string()
        } else {
            req.method().to_string()
        };
        let path = req.uri().path().to_string();

        let response = self.find_response(&method, &path);

        Box::pin(async move {
            let (status, body) = response.unwrap_or_else(|| {
                // Default 404 for unmatched requests
                (404, not_found_json("resource", &path))
            });
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock namespace JSON response
pub fn namespace_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid"
        }
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}

/// Create a failure Status response
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// An Application named `my-application` in `default`, optionally with a Ready condition of the
/// given status and message
pub fn application(uid: &str, ready: Option<(&str, &str)>) -> Application {
    let mut app = Application::new(
        "my-application",
        ApplicationSpec {
            image: "registry.example.com/my-application".to_string(),
            ..Default::default()
        },
    );
    app.metadata.namespace = Some("default".to_string());
    app.metadata.uid = Some(uid.to_string());
    app.metadata.resource_version = Some("1".to_string());
    app.status = ready.map(|(status, message)| BuildStatus {
        common: Status {
            observed_generation: Some(1),
            conditions: vec![Condition {
                message: (!message.is_empty()).then(|| message.to_string()),
                ..Condition::new(READY, ConditionStatus::from(status))
            }],
        },
        ..Default::default()
    });
    app
}

pub fn application_list_json(items: &[&Application]) -> String {
    serde_json::json!({
        "apiVersion": "build.projectriff.io/v1alpha1",
        "kind": "ApplicationList",
        "metadata": {"resourceVersion": "1"},
        "items": items,
    })
    .to_string()
}

/// A single watch event line
pub fn watch_event_json<K: Serialize>(event_type: &str, object: &K) -> String {
    let mut line = serde_json::json!({"type": event_type, "object": object}).to_string();
    line.push('\n');
    line
}

/// A pod in `default` with the given running and waiting containers
pub fn pod_json(name: &str, running: &[&str], waiting: &[&str]) -> String {
    let status = |container: &str, running: bool| {
        let state = if running {
            serde_json::json!({"running": {"startedAt": "2026-01-01T00:00:00Z"}})
        } else {
            serde_json::json!({"waiting": {"reason": "PodInitializing"}})
        };
        serde_json::json!({
            "name": container,
            "image": format!("example/{}", container),
            "imageID": "",
            "ready": running,
            "restartCount": 0,
            "state": state
        })
    };
    let containers: Vec<_> = running
        .iter()
        .chain(waiting)
        .map(|c| serde_json::json!({"name": c}))
        .collect();
    let statuses: Vec<_> = running
        .iter()
        .map(|c| status(c, true))
        .chain(waiting.iter().map(|c| status(c, false)))
        .collect();

    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {
            "name": name,
            "namespace": "default",
            "uid": format!("{}-uid", name),
            "resourceVersion": "1"
        },
        "spec": {"containers": containers},
        "status": {"phase": "Running", "containerStatuses": statuses}
    })
    .to_string()
}

pub fn access_review_json(allowed: bool, denied: bool, evaluation_error: Option<&str>) -> String {
    serde_json::json!({
        "apiVersion": "authorization.k8s.io/v1",
        "kind": "SelfSubjectAccessReview",
        "metadata": {},
        "spec": {},
        "status": {
            "allowed": allowed,
            "denied": denied,
            "evaluationError": evaluation_error
        }
    })
    .to_string()
}

/// Discovery response listing `groups`, each served at `v1alpha1`
pub fn api_group_list_json(groups: &[&str]) -> String {
    let groups: Vec<_> = groups
        .iter()
        .map(|name| {
            let version = serde_json::json!({
                "groupVersion": format!("{}/v1alpha1", name),
                "version": "v1alpha1"
            });
            serde_json::json!({
                "name": name,
                "versions": [version.clone()],
                "preferredVersion": version
            })
        })
        .collect();
    serde_json::json!({"kind": "APIGroupList", "apiVersion": "v1", "groups": groups}).to_string()
}

/// Discovery response for `<group>/v1alpha1` serving namespaced `(plural, kind)` resources
pub fn api_resource_list_json(group: &str, resources: &[(&str, &str)]) -> String {
    let resources: Vec<_> = resources
        .iter()
        .map(|(plural, kind)| {
            serde_json::json!({
                "name": plural,
                "singularName": kind.to_lowercase(),
                "namespaced": true,
                "kind": kind,
                "verbs": ["create", "delete", "get", "list", "patch", "update", "watch"]
            })
        })
        .collect();
    serde_json::json!({
        "kind": "APIResourceList",
        "apiVersion": "v1",
        "groupVersion": format!("{}/v1alpha1", group),
        "resources": resources
    })
    .to_string()
}

/// An in-memory writer that can be shared with a [`Console`]
#[derive(Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock().unwrap()).into_owned()
    }

    /// Wait until `needle` was written, panics after five seconds
    pub async fn wait_for(&self, needle: &str) {
        let waiting = async {
            while !self.contents().contains(needle) {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };
        tokio::time::timeout(Duration::from_secs(5), waiting)
            .await
            .unwrap_or_else(|_| panic!("{:?} never written, got {:?}", needle, self.contents()));
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A watch source whose events are pushed by the test.
pub struct FakeListWatch<K> {
    watchers: Arc<Mutex<Vec<UnboundedSender<Result<ResourceEvent<K>>>>>>,
}

impl<K> Clone for FakeListWatch<K> {
    fn clone(&self) -> Self {
        Self {
            watchers: self.watchers.clone(),
        }
    }
}

impl<K: Clone + Send + 'static> FakeListWatch<K> {
    pub fn new() -> Self {
        Self {
            watchers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Deliver an event to every open watch
    pub fn change(&self, event: ResourceEvent<K>) {
        for watcher in self.watchers.lock().unwrap().iter() {
            let _ = watcher.unbounded_send(Ok(event.clone()));
        }
    }

    /// Deliver a watch failure to every open watch
    pub fn fail(&self, message: &str) {
        for watcher in self.watchers.lock().unwrap().iter() {
            let _ = watcher.unbounded_send(Err(RiffError::WatchError(message.to_string())));
        }
    }

    /// End every open watch
    pub fn shutdown(&self) {
        self.watchers.lock().unwrap().clear();
    }

    /// Watches whose stream has not been dropped yet
    pub fn active_watchers(&self) -> usize {
        self.watchers
            .lock()
            .unwrap()
            .iter()
            .filter(|w| !w.is_closed())
            .count()
    }

    pub async fn wait_for_watchers(&self, count: usize) {
        while self.active_watchers() < count {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }
}

impl<K: Clone + Send + 'static> ListWatch<K> for FakeListWatch<K> {
    fn watch(&self) -> BoxStream<'static, Result<ResourceEvent<K>>> {
        let (tx, rx) = unbounded();
        self.watchers.lock().unwrap().push(tx);
        rx.boxed()
    }
}

#[derive(Clone, Debug)]
pub enum TailBehaviour {
    /// Print a line and return
    Return,
    /// Print a line and block until cancelled
    BlockUntilCancelled,
    /// Fail straight away with this message
    Fail(String),
}

/// A log tailer printing `...log output...` instead of reading pods
#[derive(Clone)]
pub struct FakeLogTailer {
    behaviour: TailBehaviour,
    calls: Arc<Mutex<Vec<(LogSelector, Duration)>>>,
}

impl FakeLogTailer {
    pub fn new(behaviour: TailBehaviour) -> Self {
        Self {
            behaviour,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<(LogSelector, Duration)> {
        self.calls.lock().unwrap().clone()
    }
}

impl LogTailer for FakeLogTailer {
    async fn tail(
        &self,
        ctx: CancellationToken,
        selector: LogSelector,
        since: Duration,
        console: Console,
    ) -> Result<()> {
        self.calls.lock().unwrap().push((selector, since));
        match &self.behaviour {
            TailBehaviour::Return => {
                console.print("...log output...");
                Ok(())
            }
            TailBehaviour::BlockUntilCancelled => {
                console.print("...log output...");
                ctx.cancelled().await;
                Err(RiffError::Cancelled)
            }
            TailBehaviour::Fail(message) => Err(RiffError::OperationError(message.clone())),
        }
    }
}
