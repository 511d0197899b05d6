// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! core.projectriff.io/v1alpha1: the Deployment backed deployer.

use crate::constants::labels;
use crate::kubernetes::logs::LogSelector;
use crate::types::conditions::{ConditionSet, Status};
use crate::types::RiffResource;
use k8s_openapi::api::apps::v1::DeploymentStatus;
use k8s_openapi::api::core::v1::PodTemplateSpec;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

pub static DEPLOYER_CONDITIONS: ConditionSet = ConditionSet::living(&[
    ("DeploymentReady", true),
    ("ServiceReady", true),
    ("IngressReady", true),
]);

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "core.projectriff.io", version = "v1alpha1", kind = "Deployer")]
#[kube(namespaced, category = "riff")]
#[kube(status = "DeployerStatus")]
#[kube(printcolumn = r#"{"name":"Ready","type":"string","jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#)]
#[kube(printcolumn = r#"{"name":"Reason","type":"string","jsonPath":".status.conditions[?(@.type==\"Ready\")].reason"}"#)]
#[serde(rename_all = "camelCase")]
pub struct DeployerSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<Build>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PodTemplateSpec>,
    /// `ClusterLocal` or `External`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress_policy: Option<String>,
}

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

    pub fn propagate_deployment_status(&mut self, status: &DeploymentStatus) {
        DEPLOYER_CONDITIONS
            .manage(&mut self.common)
            .propagate_deployment_status("DeploymentReady", status);
    }

    /// Services carry no meaningful status, existing is enough
    pub fn propagate_service_status(&mut self) {
        DEPLOYER_CONDITIONS
            .manage(&mut self.common)
            .mark_true("ServiceReady");
    }

    pub fn mark_service_not_owned(&mut self, name: &str) {
        DEPLOYER_CONDITIONS.manage(&mut self.common).mark_false(
            "ServiceReady",
            "NotOwned",
            &format!("There is an existing Service {:?} that the Deployer does not own.", name),
        );
    }

    pub fn propagate_ingress_status(&mut self) {
        DEPLOYER_CONDITIONS
            .manage(&mut self.common)
            .mark_true("IngressReady");
    }

    pub fn mark_ingress_not_required(&mut self) {
        DEPLOYER_CONDITIONS
            .manage(&mut self.common)
            .mark_true("IngressReady");
    }
}

impl RiffResource for Deployer {
    const DISPLAY_NAME: &'static str = "deployer";
    const COMMAND: &'static str = "core deployer";
    const HAS_TAIL_COMMAND: bool = true;

    fn condition_set() -> &'static ConditionSet {
        &DEPLOYER_CONDITIONS
    }

    fn resource_status(&self) -> Option<&Status> {
        self.status.as_ref().map(|s| &s.common)
    }

    fn log_selector(&self) -> Option<LogSelector> {
        Some(LogSelector::labelled(self, labels::CORE_DEPLOYER, &[]))
    }
}
