// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes plumbing: client creation, watching resources until ready, tailing pod logs and
//! the cluster checks behind `riff doctor`.

pub mod access;
pub mod client;
pub mod crd;
pub mod logs;
pub mod namespaces;
pub mod wait;
pub mod watch;

pub use client::create_client;
pub use logs::{LogSelector, LogTailer, PodLogTailer};
pub use wait::wait_until_ready;
pub use watch::{ApiListWatch, ListWatch, ResourceEvent, WatchTarget};
