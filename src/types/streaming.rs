// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! streaming.projectriff.io/v1alpha1: streams, processors and the gateways backing them.

use crate::constants::labels;
use crate::kubernetes::logs::LogSelector;
use crate::types::conditions::{ConditionSet, Status};
use crate::types::RiffResource;
use k8s_openapi::api::apps::v1::DeploymentStatus;
use k8s_openapi::api::core::v1::PodTemplateSpec;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

pub static STREAM_CONDITIONS: ConditionSet = ConditionSet::living(&[("BindingReady", true)]);

pub static PROCESSOR_CONDITIONS: ConditionSet = ConditionSet::living(&[
    ("StreamsReady", true),
    ("DeploymentReady", true),
    ("ScaledObjectReady", true),
]);

pub static GATEWAY_CONDITIONS: ConditionSet = ConditionSet::living(&[("GatewayReady", true)]);

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
pub struct LocalObjectReference {
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
pub struct Addressable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "streaming.projectriff.io", version = "v1alpha1", kind = "Stream")]
#[kube(namespaced, category = "riff")]
#[kube(status = "StreamStatus")]
#[kube(printcolumn = r#"{"name":"Gateway","type":"string","jsonPath":".spec.gateway.name"}"#)]
#[kube(printcolumn = r#"{"name":"Ready","type":"string","jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#)]
#[serde(rename_all = "camelCase")]
pub struct StreamSpec {
    pub gateway: LocalObjectReference,
    pub content_type: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StreamStatus {
    #[serde(flatten)]
    pub common: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<BindingReference>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BindingReference {
    /// ConfigMap holding the binding metadata
    pub metadata_ref: LocalObjectReference,
    /// Secret holding the binding secret properties
    pub secret_ref: LocalObjectReference,
}

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "streaming.projectriff.io", version = "v1alpha1", kind = "Processor")]
#[kube(namespaced, category = "riff")]
#[kube(status = "ProcessorStatus")]
#[kube(printcolumn = r#"{"name":"Ready","type":"string","jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#)]
#[kube(printcolumn = r#"{"name":"Reason","type":"string","jsonPath":".status.conditions[?(@.type==\"Ready\")].reason"}"#)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorSpec {
    /// Resolves the image from a build resource, new images are rolled out automatically
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<Build>,
    pub inputs: Vec<InputStreamBinding>,
    #[serde(default)]
    pub outputs: Vec<OutputStreamBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PodTemplateSpec>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_ref: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InputStreamBinding {
    pub stream: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// `earliest` or `latest`, defaulted by the controller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_offset: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutputStreamBinding {
    pub stream: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorStatus {
    #[serde(flatten)]
    pub common: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_image: Option<String>,
}

impl ProcessorStatus {
    pub fn initialize_conditions(&mut self) {
        PROCESSOR_CONDITIONS
            .manage(&mut self.common)
            .initialize_conditions();
    }

    pub fn mark_streams_ready(&mut self) {
        PROCESSOR_CONDITIONS
            .manage(&mut self.common)
            .mark_true("StreamsReady");
    }

    pub fn mark_streams_not_ready(&mut self, message: &str) {
        PROCESSOR_CONDITIONS
            .manage(&mut self.common)
            .mark_false("StreamsReady", "StreamNotReady", message);
    }

    pub fn propagate_deployment_status(&mut self, status: &DeploymentStatus) {
        PROCESSOR_CONDITIONS
            .manage(&mut self.common)
            .propagate_deployment_status("DeploymentReady", status);
    }

    /// ScaledObjects do not report a meaningful status
    pub fn propagate_scaled_object_status(&mut self) {
        PROCESSOR_CONDITIONS
            .manage(&mut self.common)
            .mark_true("ScaledObjectReady");
    }
}

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "streaming.projectriff.io", version = "v1alpha1", kind = "KafkaGateway")]
#[kube(namespaced, category = "riff")]
#[kube(status = "GatewayStatus")]
#[kube(printcolumn = r#"{"name":"Ready","type":"string","jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#)]
#[serde(rename_all = "camelCase")]
pub struct KafkaGatewaySpec {
    pub bootstrap_servers: String,
}

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "streaming.projectriff.io", version = "v1alpha1", kind = "PulsarGateway")]
#[kube(namespaced, category = "riff")]
#[kube(status = "GatewayStatus")]
#[kube(printcolumn = r#"{"name":"Ready","type":"string","jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#)]
pub struct PulsarGatewaySpec {
    #[serde(rename = "serviceURL")]
    pub service_url: String,
}

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "streaming.projectriff.io", version = "v1alpha1", kind = "InMemoryGateway")]
#[kube(namespaced, category = "riff")]
#[kube(status = "GatewayStatus")]
#[kube(printcolumn = r#"{"name":"Ready","type":"string","jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#)]
pub struct InMemoryGatewaySpec {}

/// Status shared by all gateway kinds
#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GatewayStatus {
    #[serde(flatten)]
    pub common: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Addressable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_image: Option<String>,
}

impl RiffResource for Stream {
    const DISPLAY_NAME: &'static str = "stream";
    const COMMAND: &'static str = "streaming stream";

    fn condition_set() -> &'static ConditionSet {
        &STREAM_CONDITIONS
    }

    fn resource_status(&self) -> Option<&Status> {
        self.status.as_ref().map(|s| &s.common)
    }
}

impl RiffResource for Processor {
    const DISPLAY_NAME: &'static str = "processor";
    const COMMAND: &'static str = "processor";
    const HAS_TAIL_COMMAND: bool = true;

    fn condition_set() -> &'static ConditionSet {
        &PROCESSOR_CONDITIONS
    }

    fn resource_status(&self) -> Option<&Status> {
        self.status.as_ref().map(|s| &s.common)
    }

    fn log_selector(&self) -> Option<LogSelector> {
        Some(LogSelector::labelled(
            self,
            labels::PROCESSOR,
            &["function", "processor"],
        ))
    }
}

impl RiffResource for KafkaGateway {
    const DISPLAY_NAME: &'static str = "kafka gateway";
    const COMMAND: &'static str = "streaming kafka-gateway";

    fn condition_set() -> &'static ConditionSet {
        &GATEWAY_CONDITIONS
    }

    fn resource_status(&self) -> Option<&Status> {
        self.status.as_ref().map(|s| &s.common)
    }

    fn log_selector(&self) -> Option<LogSelector> {
        Some(LogSelector::labelled(self, labels::KAFKA_GATEWAY, &[]))
    }
}

impl RiffResource for PulsarGateway {
    const DISPLAY_NAME: &'static str = "pulsar gateway";
    const COMMAND: &'static str = "streaming pulsar-gateway";

    fn condition_set() -> &'static ConditionSet {
        &GATEWAY_CONDITIONS
    }

    fn resource_status(&self) -> Option<&Status> {
        self.status.as_ref().map(|s| &s.common)
    }

    fn log_selector(&self) -> Option<LogSelector> {
        Some(LogSelector::labelled(self, labels::PULSAR_GATEWAY, &[]))
    }
}

impl RiffResource for InMemoryGateway {
    const DISPLAY_NAME: &'static str = "inmemory gateway";
    const COMMAND: &'static str = "streaming inmemory-gateway";

    fn condition_set() -> &'static ConditionSet {
        &GATEWAY_CONDITIONS
    }

    fn resource_status(&self) -> Option<&Status> {
        self.status.as_ref().map(|s| &s.common)
    }

    fn log_selector(&self) -> Option<LogSelector> {
        Some(LogSelector::labelled(self, labels::INMEMORY_GATEWAY, &[]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::conditions::{ConditionStatus, READY};
    use kube::Resource;

    fn make_processor(status: Option<ProcessorStatus>) -> Processor {
        let mut processor = Processor::new(
            "my-processor",
            ProcessorSpec {
                build: Some(Build {
                    function_ref: Some("my-func".to_string()),
                    container_ref: None,
                }),
                inputs: vec![InputStreamBinding {
                    stream: "my-input-stream".to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            },
        );
        processor.metadata.namespace = Some("default".to_string());
        processor.status = status;
        processor
    }

    #[test]
    fn test_processor_becomes_ready_once_all_dependents_are_true() {
        let mut status = ProcessorStatus::default();
        status.initialize_conditions();
        status.mark_streams_ready();
        status.propagate_scaled_object_status();
        assert!(!make_processor(Some(status.clone())).is_ready());

        status.propagate_deployment_status(&DeploymentStatus {
            conditions: Some(vec![
                k8s_openapi::api::apps::v1::DeploymentCondition {
                    type_: "Available".to_string(),
                    status: "True".to_string(),
                    ..Default::default()
                },
                k8s_openapi::api::apps::v1::DeploymentCondition {
                    type_: "Progressing".to_string(),
                    status: "True".to_string(),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        });
        assert!(make_processor(Some(status)).is_ready());
    }

    #[test]
    fn test_processor_streams_not_ready_fails_ready() {
        let mut status = ProcessorStatus::default();
        status.initialize_conditions();
        status.mark_streams_not_ready("stream \"my-input-stream\" not found");

        let processor = make_processor(Some(status));
        let ready = processor.ready_condition().unwrap();
        assert_eq!(ready.status, ConditionStatus::False);
        assert_eq!(ready.message.as_deref(), Some("stream \"my-input-stream\" not found"));
    }

    #[test]
    fn test_processor_without_status_is_not_ready() {
        let processor = make_processor(None);
        assert!(!processor.is_ready());
        assert!(processor.ready_condition().is_none());
    }

    #[test]
    fn test_processor_log_selector() {
        let selector = make_processor(None).log_selector().unwrap();
        assert_eq!(selector.namespace, "default");
        assert_eq!(selector.label_selector, "streaming.projectriff.io/processor=my-processor");
        assert_eq!(selector.containers, vec!["function", "processor"]);
    }

    #[test]
    fn test_stream_has_no_logs() {
        let stream = Stream::new(
            "my-stream",
            StreamSpec {
                gateway: LocalObjectReference {
                    name: "my-gateway".to_string(),
                },
                content_type: "application/json".to_string(),
            },
        );
        assert!(stream.log_selector().is_none());
        assert_eq!(Stream::plural(&()), "streams");
    }

    #[test]
    fn test_gateway_status_deserializes_inline_conditions() {
        let gateway: KafkaGateway = serde_json::from_value(serde_json::json!({
            "apiVersion": "streaming.projectriff.io/v1alpha1",
            "kind": "KafkaGateway",
            "metadata": {"name": "my-gateway", "namespace": "default", "uid": "abc"},
            "spec": {"bootstrapServers": "kafka:9092"},
            "status": {
                "observedGeneration": 1,
                "conditions": [{"type": "Ready", "status": "True"}],
                "address": {"url": "http://my-gateway.default.svc.cluster.local"}
            }
        }))
        .unwrap();

        assert!(gateway.is_ready());
        assert_eq!(gateway.ready_condition().unwrap().condition_type, READY);
        assert_eq!(
            gateway.status.unwrap().address.unwrap().url.as_deref(),
            Some("http://my-gateway.default.svc.cluster.local")
        );
    }
}
