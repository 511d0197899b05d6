// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Name the CLI refers to itself by in guidance messages
pub const CLI_NAME: &str = "riff";

/// Namespace the riff system components are installed into
pub const RIFF_SYSTEM_NAMESPACE: &str = "riff-system";

/// API groups served by the riff CRDs
pub mod groups {
    pub const BUILD: &str = "build.projectriff.io";
    pub const CORE: &str = "core.projectriff.io";
    pub const KNATIVE: &str = "knative.projectriff.io";
    pub const STREAMING: &str = "streaming.projectriff.io";

    pub const ALL: [&str; 4] = [BUILD, CORE, KNATIVE, STREAMING];
}

/// Label keys the riff controllers put on the pods they create
pub mod labels {
    pub const APPLICATION: &str = "build.projectriff.io/application";
    pub const FUNCTION: &str = "build.projectriff.io/function";
    pub const CORE_DEPLOYER: &str = "core.projectriff.io/deployer";
    pub const KNATIVE_DEPLOYER: &str = "knative.projectriff.io/deployer";
    pub const PROCESSOR: &str = "streaming.projectriff.io/processor";
    pub const KAFKA_GATEWAY: &str = "streaming.projectriff.io/kafka-gateway";
    pub const PULSAR_GATEWAY: &str = "streaming.projectriff.io/pulsar-gateway";
    pub const INMEMORY_GATEWAY: &str = "streaming.projectriff.io/inmemory-gateway";
}

/// Defaults for waiting on resources
pub mod wait {
    /// How long `--tail` waits for a resource to become ready
    pub const DEFAULT_WAIT_TIMEOUT: &str = "10m";
    /// How far back to read logs when tailing a freshly created resource
    pub const TAIL_SINCE_CREATE_DEFAULT_SECS: u64 = 60;
}
