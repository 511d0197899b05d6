// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Racing a primary operation, plus operations run for their side effects, against a deadline.
//!
//! Every operation is spawned onto its own task and receives a child of the caller's
//! [`CancellationToken`]. The first decisive result wins:
//!
//! * the primary operation returning `Ok` ends the race successfully,
//! * any operation returning an error other than [`RiffError::Cancelled`] ends it with that error,
//! * the deadline elapsing ends it with [`RiffError::DeadlineExceeded`].
//!
//! An ancillary operation returning `Ok` is not decisive. When the race ends the child token is
//! cancelled so losing operations stop; the race does not wait for them to finish.

use crate::error::{Result, RiffError};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// An operation taking part in a race
pub type Operation = Box<dyn FnOnce(CancellationToken) -> BoxFuture<'static, Result<()>> + Send>;

/// Box a closure into an [`Operation`]
pub fn operation<F, Fut>(f: F) -> Operation
where
    F: FnOnce(CancellationToken) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<()>> + Send + 'static,
{
    Box::new(move |ctx| f(ctx).boxed())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Primary,
    Ancillary(usize),
}

pub struct Race {
    timeout: Duration,
    primary: Operation,
    ancillary: Vec<Operation>,
    tolerate_ancillary_errors: bool,
}

impl Race {
    pub fn new(timeout: Duration, primary: Operation) -> Self {
        Race {
            timeout,
            primary,
            ancillary: Vec::new(),
            tolerate_ancillary_errors: false,
        }
    }

    /// Run `op` alongside the primary operation for its side effects
    pub fn ancillary(mut self, op: Operation) -> Self {
        self.ancillary.push(op);
        self
    }

    /// Log ancillary failures and keep waiting for the primary instead of failing the race
    pub fn tolerate_ancillary_errors(mut self, tolerate: bool) -> Self {
        self.tolerate_ancillary_errors = tolerate;
        self
    }

    pub async fn run(self, parent: &CancellationToken) -> Result<()> {
        let ctx = parent.child_token();
        // losing operations are told to stop however the race ends
        let _guard = ctx.clone().drop_guard();

        let operations = std::iter::once((Role::Primary, self.primary)).chain(
            self.ancillary
                .into_iter()
                .enumerate()
                .map(|(i, op)| (Role::Ancillary(i), op)),
        );

        let (tx, mut rx) = mpsc::unbounded_channel();
        for (role, op) in operations {
            let tx = tx.clone();
            let future = op(ctx.clone());
            tokio::spawn(async move {
                let result = match AssertUnwindSafe(future).catch_unwind().await {
                    Ok(result) => result,
                    Err(panic) => Err(RiffError::OperationError(panic_message(panic))),
                };
                // the race may already be decided
                let _ = tx.send((role, result));
            });
        }
        drop(tx);

        let deadline = tokio::time::sleep(self.timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                biased;
                _ = parent.cancelled() => return Err(RiffError::Cancelled),
                completed = rx.recv() => match completed {
                    Some((Role::Primary, Ok(()))) => return Ok(()),
                    Some((Role::Ancillary(i), Ok(()))) => {
                        debug!("Ancillary operation {} finished", i);
                    }
                    Some((role, Err(RiffError::Cancelled))) => {
                        debug!("Operation {:?} was cancelled", role);
                    }
                    Some((Role::Ancillary(i), Err(e))) if self.tolerate_ancillary_errors => {
                        warn!("Ancillary operation {} failed: {}", i, e);
                    }
                    Some((_, Err(e))) => return Err(e),
                    // every operation finished without a decisive result
                    None => {
                        deadline.as_mut().await;
                        return Err(RiffError::DeadlineExceeded);
                    }
                },
                _ = &mut deadline => return Err(RiffError::DeadlineExceeded),
            }
        }
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "operation panicked".to_string()
    }
}
