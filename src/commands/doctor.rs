// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! `riff doctor`: checks that the current user can work with riff, and riff related,
//! resources in a namespace.
//!
//! This is not a health check of the cluster or of the riff installation.

use crate::commands::CommandContext;
use crate::console::Console;
use crate::constants::{groups, RIFF_SYSTEM_NAMESPACE};
use crate::error::Result;
use crate::kubernetes::access::{review_access, AccessDecision};
use crate::kubernetes::crd::{discover_riff_resources, ServedResources};
use crate::kubernetes::namespaces::namespace_exists;
use clap::Args;
use k8s_openapi::api::authorization::v1::ResourceAttributes;
use kube::Client;
use std::fmt;
use tracing::{debug, instrument};

const READ_VERBS: &[&str] = &["get", "list", "watch"];
const ALL_VERBS: &[&str] = &["get", "list", "create", "update", "delete", "patch", "watch"];

const CORE_GROUP: &str = "";

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Namespace to check, defaults to the kubeconfig context's namespace
    #[arg(short, long)]
    pub namespace: Option<String>,
}

pub async fn run(args: DoctorArgs, cx: &CommandContext) -> Result<()> {
    let namespace = cx.namespace(args.namespace.as_deref());
    doctor(&cx.client, &namespace, &cx.console).await
}

#[instrument(skip(client, console))]
pub async fn doctor(client: &Client, namespace: &str, console: &Console) -> Result<()> {
    check_namespaces(client, &[namespace, RIFF_SYSTEM_NAMESPACE], console).await?;

    let served = discover_riff_resources(client).await?;
    let mut checks = access_checks(namespace, &served);
    for check in checks.iter_mut() {
        check.resolve(client, &served).await?;
    }

    console.print("");
    let mut rows = vec![["RESOURCE", "NAMESPACE", "NAME", "READ", "WRITE"].map(String::from).to_vec()];
    rows.extend(checks.iter().map(AccessCheck::row));
    for line in tabulate(&rows) {
        console.print(&line);
    }
    Ok(())
}

async fn check_namespaces(client: &Client, namespaces: &[&str], console: &Console) -> Result<()> {
    let mut rows = vec![vec!["NAMESPACE".to_string(), "STATUS".to_string()]];
    for namespace in namespaces {
        let status = if namespace_exists(client, namespace).await? {
            "ok"
        } else {
            "missing"
        };
        rows.push(vec![namespace.to_string(), status.to_string()]);
    }
    for line in tabulate(&rows) {
        console.print(&line);
    }
    Ok(())
}

/// The checks for `namespace`, riff runtimes are only checked when their API group is served
pub fn access_checks(namespace: &str, served: &ServedResources) -> Vec<AccessCheck> {
    let mut checks = vec![
        AccessCheck::new(RIFF_SYSTEM_NAMESPACE, CORE_GROUP, "configmaps", READ_VERBS)
            .named("builders"),
        AccessCheck::new(namespace, CORE_GROUP, "configmaps", ALL_VERBS),
        AccessCheck::new(namespace, CORE_GROUP, "secrets", ALL_VERBS),
        AccessCheck::new(namespace, CORE_GROUP, "pods", READ_VERBS),
        AccessCheck::new(namespace, CORE_GROUP, "pods", READ_VERBS).subresource("log"),
        AccessCheck::new(namespace, groups::BUILD, "applications", ALL_VERBS),
        AccessCheck::new(namespace, groups::BUILD, "containers", ALL_VERBS),
        AccessCheck::new(namespace, groups::BUILD, "functions", ALL_VERBS),
    ];
    if served.has_group(groups::CORE) {
        checks.push(AccessCheck::new(namespace, groups::CORE, "deployers", ALL_VERBS));
    }
    if served.has_group(groups::STREAMING) {
        for resource in ["processors", "streams", "inmemorygateways", "kafkagateways", "pulsargateways"] {
            checks.push(AccessCheck::new(namespace, groups::STREAMING, resource, ALL_VERBS));
        }
    }
    if served.has_group(groups::KNATIVE) {
        for resource in ["adapters", "deployers"] {
            checks.push(AccessCheck::new(namespace, groups::KNATIVE, resource, ALL_VERBS));
        }
    }
    checks
}

/// Access of the current user to a kind of resource, aggregated over verbs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccessStatus {
    /// No verb was reviewed
    #[default]
    Undefined,
    Allowed,
    Denied,
    /// Some verbs are allowed, others denied
    Mixed,
    /// The resource is not installed
    Missing,
    /// A review had no opinion
    Unknown,
}

impl AccessStatus {
    pub fn combine(self, other: AccessStatus) -> AccessStatus {
        use AccessStatus::*;
        match (self, other) {
            (Undefined, other) => other,
            (Unknown, _) | (_, Unknown) => Unknown,
            (current, other) if current != other => Mixed,
            (Allowed, _) => Allowed,
            _ => Denied,
        }
    }
}

impl From<AccessDecision> for AccessStatus {
    fn from(decision: AccessDecision) -> Self {
        match decision {
            AccessDecision::Allowed => AccessStatus::Allowed,
            AccessDecision::Denied => AccessStatus::Denied,
            AccessDecision::NoOpinion => AccessStatus::Unknown,
        }
    }
}

impl fmt::Display for AccessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccessStatus::Allowed => "allowed",
            AccessStatus::Mixed => "mixed",
            AccessStatus::Denied => "denied",
            AccessStatus::Missing => "missing",
            AccessStatus::Unknown => "unknown",
            AccessStatus::Undefined => "n/a",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct AccessCheck {
    pub attributes: ResourceAttributes,
    verbs: &'static [&'static str],
    pub read: AccessStatus,
    pub write: AccessStatus,
}

impl AccessCheck {
    fn new(namespace: &str, group: &str, resource: &str, verbs: &'static [&'static str]) -> Self {
        AccessCheck {
            attributes: ResourceAttributes {
                namespace: Some(namespace.to_string()),
                group: Some(group.to_string()),
                resource: Some(resource.to_string()),
                ..Default::default()
            },
            verbs,
            read: AccessStatus::Undefined,
            write: AccessStatus::Undefined,
        }
    }

    fn named(mut self, name: &str) -> Self {
        self.attributes.name = Some(name.to_string());
        self
    }

    fn subresource(mut self, subresource: &str) -> Self {
        self.attributes.subresource = Some(subresource.to_string());
        self
    }

    fn group(&self) -> &str {
        self.attributes.group.as_deref().unwrap_or(CORE_GROUP)
    }

    fn resource(&self) -> &str {
        self.attributes.resource.as_deref().unwrap_or_default()
    }

    /// Review every verb, resources of an uninstalled API group are reported missing
    async fn resolve(&mut self, client: &Client, served: &ServedResources) -> Result<()> {
        if self.group().contains('.') && !served.has_resource(self.group(), self.resource()) {
            debug!("{} is not installed", self.display_resource());
            self.read = AccessStatus::Missing;
            self.write = AccessStatus::Missing;
            return Ok(());
        }

        for verb in self.verbs {
            let attributes = ResourceAttributes {
                verb: Some(verb.to_string()),
                ..self.attributes.clone()
            };
            let status = AccessStatus::from(review_access(client, attributes).await?);
            if READ_VERBS.contains(verb) {
                self.read = self.read.combine(status);
            } else {
                self.write = self.write.combine(status);
            }
        }
        Ok(())
    }

    /// `<resource>.<group>[/<subresource>]`, the group is left out for core resources
    fn display_resource(&self) -> String {
        let mut resource = self.resource().to_string();
        if self.group() != CORE_GROUP {
            resource = format!("{}.{}", resource, self.group());
        }
        if let Some(subresource) = self.attributes.subresource.as_deref() {
            resource = format!("{}/{}", resource, subresource);
        }
        resource
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.display_resource(),
            self.attributes.namespace.clone().unwrap_or_default(),
            self.attributes.name.clone().unwrap_or_else(|| "*".to_string()),
            self.read.to_string(),
            self.write.to_string(),
        ]
    }
}

/// Align `rows` in columns separated by at least three spaces, the last column is not padded
fn tabulate(rows: &[Vec<String>]) -> Vec<String> {
    const PADDING: usize = 3;

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .map(|row| {
            let mut line = String::new();
            for (i, cell) in row.iter().enumerate() {
                if i + 1 == row.len() {
                    line.push_str(cell);
                } else {
                    line.push_str(&format!("{:<width$}", cell, width = widths[i] + PADDING));
                }
            }
            line
        })
        .collect()
}
