// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! build.projectriff.io/v1alpha1: images built from source or referenced directly.

use crate::constants::labels;
use crate::kubernetes::logs::LogSelector;
use crate::types::conditions::{ConditionSet, Status};
use crate::types::RiffResource;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

pub static APPLICATION_CONDITIONS: ConditionSet =
    ConditionSet::living(&[("ImageResolved", true), ("KpackImageReady", true)]);

pub static FUNCTION_CONDITIONS: ConditionSet =
    ConditionSet::living(&[("ImageResolved", true), ("KpackImageReady", true)]);

pub static CONTAINER_CONDITIONS: ConditionSet = ConditionSet::living(&[("ImageResolved", true)]);

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_path: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
pub struct GitSource {
    pub url: String,
    pub revision: String,
}

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "build.projectriff.io", version = "v1alpha1", kind = "Application")]
#[kube(namespaced, category = "riff")]
#[kube(status = "BuildStatus")]
#[kube(printcolumn = r#"{"name":"Latest Image","type":"string","jsonPath":".status.latestImage"}"#)]
#[kube(printcolumn = r#"{"name":"Ready","type":"string","jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#)]
#[kube(printcolumn = r#"{"name":"Reason","type":"string","jsonPath":".status.conditions[?(@.type==\"Ready\")].reason"}"#)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSpec {
    /// Repository to push built images to
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
}

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "build.projectriff.io", version = "v1alpha1", kind = "Function")]
#[kube(namespaced, category = "riff")]
#[kube(status = "BuildStatus")]
#[kube(printcolumn = r#"{"name":"Latest Image","type":"string","jsonPath":".status.latestImage"}"#)]
#[kube(printcolumn = r#"{"name":"Ready","type":"string","jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#)]
#[kube(printcolumn = r#"{"name":"Reason","type":"string","jsonPath":".status.conditions[?(@.type==\"Ready\")].reason"}"#)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSpec {
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoker: Option<String>,
}

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "build.projectriff.io", version = "v1alpha1", kind = "Container")]
#[kube(namespaced, category = "riff")]
#[kube(status = "BuildStatus")]
#[kube(printcolumn = r#"{"name":"Latest Image","type":"string","jsonPath":".status.latestImage"}"#)]
#[kube(printcolumn = r#"{"name":"Ready","type":"string","jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#)]
pub struct ContainerSpec {
    /// Image to watch for new digests, tags are resolved by the controller
    pub image: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildStatus {
    #[serde(flatten)]
    pub common: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_image: Option<String>,
}

impl RiffResource for Application {
    const DISPLAY_NAME: &'static str = "application";
    const COMMAND: &'static str = "application";
    const HAS_TAIL_COMMAND: bool = true;

    fn condition_set() -> &'static ConditionSet {
        &APPLICATION_CONDITIONS
    }

    fn resource_status(&self) -> Option<&Status> {
        self.status.as_ref().map(|s| &s.common)
    }

    fn log_selector(&self) -> Option<LogSelector> {
        Some(LogSelector::labelled(self, labels::APPLICATION, &[]))
    }
}

impl RiffResource for Function {
    const DISPLAY_NAME: &'static str = "function";
    const COMMAND: &'static str = "function";
    const HAS_TAIL_COMMAND: bool = true;

    fn condition_set() -> &'static ConditionSet {
        &FUNCTION_CONDITIONS
    }

    fn resource_status(&self) -> Option<&Status> {
        self.status.as_ref().map(|s| &s.common)
    }

    fn log_selector(&self) -> Option<LogSelector> {
        Some(LogSelector::labelled(self, labels::FUNCTION, &[]))
    }
}

// containers resolve an image without running a build, so there is nothing to tail
impl RiffResource for Container {
    const DISPLAY_NAME: &'static str = "container";
    const COMMAND: &'static str = "container";
    const HAS_TAIL_COMMAND: bool = true;

    fn condition_set() -> &'static ConditionSet {
        &CONTAINER_CONDITIONS
    }

    fn resource_status(&self) -> Option<&Status> {
        self.status.as_ref().map(|s| &s.common)
    }
}
