// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{Result, RiffError};
use crate::kubernetes::watch::{ListWatch, Readiness, ResourceEvent, WatchTarget};
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// Block until `target` reports ready, fails, or is deleted.
///
/// Only events for the object with the same UID as `target` are considered, a recreated
/// object with the same name is ignored. Returns [`RiffError::Cancelled`] once `ctx` is
/// cancelled. The watch subscription is released on every return path.
#[instrument(skip_all, fields(kind = %target.reference().0, name = %target.reference().1))]
pub async fn wait_until_ready<K, L>(ctx: &CancellationToken, lw: &L, target: &K) -> Result<()>
where
    K: WatchTarget,
    L: ListWatch<K> + ?Sized,
{
    let uid = target.identity();
    let (kind, name) = target.reference();
    let mut events = lw.watch();

    loop {
        let event = tokio::select! {
            biased;
            _ = ctx.cancelled() => return Err(RiffError::Cancelled),
            event = events.next() => event,
        };

        let (obj, deleted) = match event {
            None => return Err(RiffError::WatchError("watch closed".to_string())),
            Some(Err(e @ RiffError::WatchError(_))) => return Err(e),
            Some(Err(e)) => return Err(RiffError::WatchError(e.to_string())),
            Some(Ok(ResourceEvent::Applied(obj))) => (obj, false),
            Some(Ok(ResourceEvent::Deleted(obj))) => (obj, true),
        };

        if uid.is_some() && obj.identity() != uid {
            debug!("Ignoring event for {:?}", obj.identity());
            continue;
        }
        if deleted {
            return Err(RiffError::Deleted { kind, name });
        }
        match obj.readiness() {
            Readiness::Ready => return Ok(()),
            Readiness::Failed(message) => return Err(RiffError::NotReady(message)),
            Readiness::Pending => debug!("{} {:?} not ready yet", kind, name),
        }
    }
}
