// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! `riff wait`: block until a resource reports ready, racing the readiness watch against the
//! wait timeout while optionally streaming the resource's logs.

use crate::commands::CommandContext;
use crate::console::Console;
use crate::constants::{wait::DEFAULT_WAIT_TIMEOUT, CLI_NAME};
use crate::duration::WaitTimeout;
use crate::error::Result;
use crate::kubernetes::{wait_until_ready, ApiListWatch, ListWatch, LogTailer, PodLogTailer};
use crate::race::{operation, Race};
use crate::types::build::{Application, Container, Function};
use crate::types::streaming::{InMemoryGateway, KafkaGateway, Processor, PulsarGateway, Stream};
use crate::types::{core_runtime, knative, RiffResource};
use clap::{Args, ValueEnum};
use kube::{Api, ResourceExt};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Application,
    Function,
    Container,
    CoreDeployer,
    KnativeAdapter,
    KnativeDeployer,
    Stream,
    Processor,
    KafkaGateway,
    PulsarGateway,
    #[value(name = "inmemory-gateway")]
    InMemoryGateway,
}

#[derive(Args, Debug)]
pub struct WaitArgs {
    /// Kind of the resource
    #[arg(value_enum)]
    pub kind: ResourceKind,

    /// Name of the resource
    pub name: String,

    /// Namespace of the resource, defaults to the kubeconfig context's namespace
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Duration to wait for the resource to become ready, e.g. 30s, 5m, 1h30m
    #[arg(long, default_value = DEFAULT_WAIT_TIMEOUT)]
    pub wait_timeout: WaitTimeout,

    /// Watch the resource's logs while waiting
    #[arg(long)]
    pub tail: bool,

    /// Keep waiting when streaming logs fails instead of giving up
    #[arg(long, requires = "tail")]
    pub tolerate_log_errors: bool,
}

#[derive(Debug, Clone)]
pub struct WaitOptions {
    pub namespace: String,
    pub timeout: WaitTimeout,
    /// How far back log output is included when tailing
    pub tail_since: Duration,
    pub tail: bool,
    /// Log tail failures are logged and the wait goes on
    pub tolerate_log_errors: bool,
}

pub async fn run(args: WaitArgs, cx: &CommandContext) -> Result<()> {
    let opts = WaitOptions {
        namespace: cx.namespace(args.namespace.as_deref()),
        timeout: args.wait_timeout.clone(),
        tail_since: cx.config.tail_since,
        tail: args.tail,
        tolerate_log_errors: args.tolerate_log_errors,
    };

    match args.kind {
        ResourceKind::Application => run_for::<Application>(&args.name, &opts, cx).await,
        ResourceKind::Function => run_for::<Function>(&args.name, &opts, cx).await,
        ResourceKind::Container => run_for::<Container>(&args.name, &opts, cx).await,
        ResourceKind::CoreDeployer => run_for::<core_runtime::Deployer>(&args.name, &opts, cx).await,
        ResourceKind::KnativeAdapter => run_for::<knative::Adapter>(&args.name, &opts, cx).await,
        ResourceKind::KnativeDeployer => run_for::<knative::Deployer>(&args.name, &opts, cx).await,
        ResourceKind::Stream => run_for::<Stream>(&args.name, &opts, cx).await,
        ResourceKind::Processor => run_for::<Processor>(&args.name, &opts, cx).await,
        ResourceKind::KafkaGateway => run_for::<KafkaGateway>(&args.name, &opts, cx).await,
        ResourceKind::PulsarGateway => run_for::<PulsarGateway>(&args.name, &opts, cx).await,
        ResourceKind::InMemoryGateway => run_for::<InMemoryGateway>(&args.name, &opts, cx).await,
    }
}

#[instrument(skip(opts, cx), fields(kind = K::DISPLAY_NAME, namespace = %opts.namespace))]
async fn run_for<K: RiffResource>(name: &str, opts: &WaitOptions, cx: &CommandContext) -> Result<()> {
    let api: Api<K> = Api::namespaced(cx.client.clone(), &opts.namespace);
    let resource = api.get(name).await?;
    debug!("Found {} {:?} with uid {:?}", K::DISPLAY_NAME, name, resource.uid());

    let lw = Arc::new(ApiListWatch::<K>::namespaced(cx.client.clone(), &opts.namespace).named(name));
    let tailer = PodLogTailer::new(cx.client.clone());
    wait_for_ready(&cx.ctx, &resource, lw, Some(tailer), opts, &cx.console).await
}

/// Wait for `resource` to become ready within `opts.timeout`, tailing its logs meanwhile when
/// requested and the kind has any.
///
/// A timeout is reported to the user along with how to follow up, the returned error is then
/// silenced.
pub async fn wait_for_ready<K, L, T>(
    ctx: &CancellationToken,
    resource: &K,
    lw: Arc<L>,
    tailer: Option<T>,
    opts: &WaitOptions,
    console: &Console,
) -> Result<()>
where
    K: RiffResource,
    L: ListWatch<K> + 'static,
    T: LogTailer,
{
    let name = resource.name_any();
    console.info(&format!(
        "Waiting for {} {:?} to become ready...",
        K::DISPLAY_NAME,
        name
    ));

    let target = resource.clone();
    let mut race = Race::new(
        opts.timeout.duration(),
        operation(move |ctx| async move { wait_until_ready(&ctx, lw.as_ref(), &target).await }),
    )
    .tolerate_ancillary_errors(opts.tolerate_log_errors);

    let selector = resource.log_selector().filter(|_| opts.tail);
    if let (Some(tailer), Some(selector)) = (tailer, selector) {
        let since = opts.tail_since;
        let console = console.clone();
        race = race.ancillary(operation(move |ctx| async move {
            tailer.tail(ctx, selector, since, console).await
        }));
    }

    match race.run(ctx).await {
        Ok(()) => {
            console.success(&format!("{} {:?} is ready", K::kind(&()), name));
            Ok(())
        }
        Err(e) if e.is_deadline_exceeded() => {
            console.error(&format!(
                "Timeout after {:?} waiting for {:?} to become ready",
                opts.timeout.as_str(),
                name
            ));
            console.info(&format!(
                "To view status run: {} {} list --namespace {}",
                CLI_NAME,
                K::COMMAND,
                opts.namespace
            ));
            if opts.tail && K::HAS_TAIL_COMMAND {
                console.info(&format!(
                    "To continue watching logs run: {} {} tail {} --namespace {}",
                    CLI_NAME,
                    K::COMMAND,
                    name,
                    opts.namespace
                ));
            }
            Err(e.silence())
        }
        Err(e) => Err(e),
    }
}
