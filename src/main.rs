// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use riff::commands::{Cli, CommandContext};
use riff::config::Config;
use riff::console::Console;
use riff::kubernetes::create_client;

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr, the user facing output is written by the commands
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?.with_kubeconfig(cli.kubeconfig.clone());
    debug!("Configuration loaded: {:?}", config);

    let (client, default_namespace) = create_client(&config).await?;

    let ctx = CancellationToken::new();
    let interrupt = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            interrupt.cancel();
        }
    });

    let console = Console::stdio();
    let cx = CommandContext {
        client,
        default_namespace,
        config,
        console: console.clone(),
        ctx,
    };

    if let Err(e) = cli.command.run(&cx).await {
        // silenced errors were already explained to the user
        if !e.is_silent() {
            console.error(&format!("Error: {}", e));
        }
        std::process::exit(1);
    }
    Ok(())
}
