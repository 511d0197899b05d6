// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod build;
pub mod conditions;
pub mod core_runtime;
pub mod knative;
pub mod streaming;

use crate::kubernetes::logs::LogSelector;
use conditions::{Condition, ConditionSet, Status};
use kube::core::NamespaceResourceScope;
use kube::Resource;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// A namespaced riff custom resource the CLI can wait on and tail.
pub trait RiffResource:
    Resource<DynamicType = (), Scope = NamespaceResourceScope>
    + Clone
    + Debug
    + DeserializeOwned
    + Serialize
    + Send
    + Sync
    + 'static
{
    /// Human readable kind, e.g. `kafka gateway`
    const DISPLAY_NAME: &'static str;
    /// Sub-command path that manages this kind, e.g. `streaming kafka-gateway`
    const COMMAND: &'static str;
    /// Whether `riff <command> tail` exists for this kind
    const HAS_TAIL_COMMAND: bool = false;

    fn condition_set() -> &'static ConditionSet;

    fn resource_status(&self) -> Option<&Status>;

    /// Pods whose logs show the progress of this resource, if any
    fn log_selector(&self) -> Option<LogSelector> {
        None
    }

    fn ready_condition(&self) -> Option<&Condition> {
        self.resource_status()?
            .get_condition(Self::condition_set().ready_condition_type())
    }

    fn is_ready(&self) -> bool {
        self.resource_status()
            .is_some_and(|status| Self::condition_set().is_happy(status))
    }
}
