// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The `riff` command line

pub mod doctor;
pub mod wait;

use crate::config::Config;
use crate::console::Console;
use crate::error::Result;
use clap::{Parser, Subcommand};
use kube::Client;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// riff - wait on riff resources and check a cluster is ready for them
#[derive(Parser, Debug)]
#[command(name = "riff")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Kubeconfig file to use, overrides RIFF_KUBECONFIG
    #[arg(long, global = true)]
    pub kubeconfig: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Wait for a resource to become ready, optionally tailing its logs
    Wait(wait::WaitArgs),
    /// Check the cluster and the current user's access to riff resources
    Doctor(doctor::DoctorArgs),
}

/// Everything a command needs to talk to the cluster and the user
#[derive(Clone)]
pub struct CommandContext {
    pub client: Client,
    /// Namespace of the current kubeconfig context
    pub default_namespace: String,
    pub config: Config,
    pub console: Console,
    /// Cancelled on Ctrl-C
    pub ctx: CancellationToken,
}

impl CommandContext {
    pub fn namespace(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_string)
            .unwrap_or_else(|| self.default_namespace.clone())
    }
}

impl Commands {
    pub async fn run(self, cx: &CommandContext) -> Result<()> {
        match self {
            Commands::Wait(args) => wait::run(args, cx).await,
            Commands::Doctor(args) => doctor::run(args, cx).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockService;

    #[test]
    fn test_parse_wait() {
        let cli = Cli::try_parse_from([
            "riff",
            "wait",
            "processor",
            "my-processor",
            "-n",
            "streams",
            "--wait-timeout",
            "5m",
            "--tail",
            "--tolerate-log-errors",
        ])
        .unwrap();

        let Commands::Wait(args) = cli.command else {
            panic!("expected wait command");
        };
        assert_eq!(args.kind, wait::ResourceKind::Processor);
        assert_eq!(args.name, "my-processor");
        assert_eq!(args.namespace.as_deref(), Some("streams"));
        assert_eq!(args.wait_timeout.as_str(), "5m");
        assert!(args.tail);
        assert!(args.tolerate_log_errors);
    }

    #[test]
    fn test_parse_tolerate_log_errors_requires_tail() {
        assert!(Cli::try_parse_from(["riff", "wait", "processor", "p", "--tolerate-log-errors"]).is_err());
    }

    #[test]
    fn test_parse_wait_defaults() {
        let cli = Cli::try_parse_from(["riff", "wait", "kafka-gateway", "franz"]).unwrap();
        let Commands::Wait(args) = cli.command else {
            panic!("expected wait command");
        };
        assert_eq!(args.kind, wait::ResourceKind::KafkaGateway);
        assert_eq!(args.wait_timeout.as_str(), "10m");
        assert!(args.namespace.is_none());
        assert!(!args.tail);
        assert!(!args.tolerate_log_errors);
    }

    #[test]
    fn test_parse_rejects_invalid_timeout() {
        assert!(Cli::try_parse_from(["riff", "wait", "stream", "in", "--wait-timeout", "soon"]).is_err());
    }

    #[test]
    fn test_parse_global_kubeconfig() {
        let cli = Cli::try_parse_from(["riff", "doctor", "--kubeconfig", "/tmp/kubeconfig"]).unwrap();
        assert_eq!(cli.kubeconfig, Some(PathBuf::from("/tmp/kubeconfig")));
        assert!(matches!(cli.command, Commands::Doctor(_)));
    }

    #[tokio::test]
    async fn test_namespace_defaults_to_context() {
        let cx = CommandContext {
            client: MockService::new().into_client(),
            default_namespace: "riff-dev".to_string(),
            config: Config::default(),
            console: Console::new(std::io::sink(), std::io::sink()),
            ctx: CancellationToken::new(),
        };
        assert_eq!(cx.namespace(None), "riff-dev");
        assert_eq!(cx.namespace(Some("other")), "other");
    }
}
