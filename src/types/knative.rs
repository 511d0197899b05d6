// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::labels;
use crate::kubernetes::logs::LogSelector;
use crate::types::conditions::{Condition, ConditionSet, ConditionStatus, Status};
use crate::types::RiffResource;
use k8s_openapi::api::core::v1::PodTemplateSpec;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

pub static ADAPTER_CONDITIONS: ConditionSet =
    ConditionSet::living(&[("BuildReady", true), ("TargetFound", true)]);

pub static DEPLOYER_CONDITIONS: ConditionSet =
    ConditionSet::living(&[("ConfigurationReady", true), ("RouteReady", true)]);

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_ref: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdapterTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_ref: Option<String>,
}

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "knative.projectriff.io", version = "v1alpha1", kind = "Adapter")]
#[kube(namespaced, category = "riff")]
#[kube(status = "AdapterStatus")]
#[kube(printcolumn = r#"{"name":"Ready","type":"string","jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#)]
#[kube(printcolumn = r#"{"name":"Reason","type":"string","jsonPath":".status.conditions[?(@.type==\"Ready\")].reason"}"#)]
pub struct AdapterSpec {
    pub build: Build,
    pub target: AdapterTarget,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdapterStatus {
    #[serde(flatten)]
    pub common: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_image: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
pub struct Scale {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
}

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "knative.projectriff.io", version = "v1alpha1", kind = "Deployer")]
#[kube(namespaced, category = "riff")]
#[kube(status = "DeployerStatus")]
#[kube(printcolumn = r#"{"name":"URL","type":"string","jsonPath":".status.url"}"#)]
#[kube(printcolumn = r#"{"name":"Ready","type":"string","jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#)]
#[kube(printcolumn = r#"{"name":"Reason","type":"string","jsonPath":".status.conditions[?(@.type==\"Ready\")].reason"}"#)]
#[serde(rename_all = "camelCase")]
pub struct DeployerSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<Build>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_concurrency: Option<i64>,
    #[serde(default)]
    pub scale: Scale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PodTemplateSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress_policy: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeployerStatus {
    #[serde(flatten)]
    pub common: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl DeployerStatus {
    pub fn initialize_conditions(&mut self) {
        DEPLOYER_CONDITIONS
            .manage(&mut self.common)
            .initialize_conditions();
    }

    /// Mirror the Ready condition of the backing knative Configuration
    pub fn propagate_configuration_ready(&mut self, ready: Option<&Condition>) {
        self.propagate("ConfigurationReady", ready);
    }

    /// Mirror the Ready condition of the backing knative Route, along with its URL
    pub fn propagate_route_ready(&mut self, ready: Option<&Condition>, url: Option<String>) {
        self.url = url;
        self.propagate("RouteReady", ready);
    }

    pub fn mark_route_not_owned(&mut self, name: &str) {
        DEPLOYER_CONDITIONS.manage(&mut self.common).mark_false(
            "RouteReady",
            "NotOwned",
            &format!("There is an existing Route {:?} that the Deployer does not own.", name),
        );
    }

    fn propagate(&mut self, condition_type: &str, source: Option<&Condition>) {
        let Some(source) = source else {
            return;
        };
        let reason = source.reason.as_deref().unwrap_or_default();
        let message = source.message.as_deref().unwrap_or_default();
        let mut manager = DEPLOYER_CONDITIONS.manage(&mut self.common);
        match source.status {
            ConditionStatus::True => manager.mark_true(condition_type),
            ConditionStatus::False => manager.mark_false(condition_type, reason, message),
            ConditionStatus::Unknown => manager.mark_unknown(condition_type, reason, message),
        }
    }
}

impl RiffResource for Adapter {
    const DISPLAY_NAME: &'static str = "adapter";
    const COMMAND: &'static str = "knative adapter";

    fn condition_set() -> &'static ConditionSet {
        &ADAPTER_CONDITIONS
    }

    fn resource_status(&self) -> Option<&Status> {
        self.status.as_ref().map(|s| &s.common)
    }
}

impl RiffResource for Deployer {
    const DISPLAY_NAME: &'static str = "deployer";
    const COMMAND: &'static str = "knative deployer";
    const HAS_TAIL_COMMAND: bool = true;

    fn condition_set() -> &'static ConditionSet {
        &DEPLOYER_CONDITIONS
    }

    fn resource_status(&self) -> Option<&Status> {
        self.status.as_ref().map(|s| &s.common)
    }

    fn log_selector(&self) -> Option<LogSelector> {
        Some(LogSelector::labelled(
            self,
            labels::KNATIVE_DEPLOYER,
            &["user-container"],
        ))
    }
}
