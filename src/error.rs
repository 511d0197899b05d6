// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiffError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to parse kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("error waiting for ready: {0}")]
    WatchError(String),

    #[error("failed to become ready: {0}")]
    NotReady(String),

    #[error("{kind} {name:?} deleted")]
    Deleted { kind: String, name: String },

    #[error("context deadline exceeded")]
    DeadlineExceeded,

    #[error("context canceled")]
    Cancelled,

    #[error("{0}")]
    OperationError(String),

    #[error("invalid duration {0:?}")]
    InvalidDuration(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The error was already reported to the user and must not be printed again
    #[error("{0}")]
    Silenced(Box<RiffError>),
}

impl RiffError {
    /// Mark this error as already reported to the user
    pub fn silence(self) -> Self {
        match self {
            RiffError::Silenced(_) => self,
            other => RiffError::Silenced(Box::new(other)),
        }
    }

    pub fn is_silent(&self) -> bool {
        matches!(self, RiffError::Silenced(_))
    }

    /// Returns the underlying error, looking through silencing
    pub fn inner(&self) -> &RiffError {
        match self {
            RiffError::Silenced(inner) => inner.inner(),
            other => other,
        }
    }

    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self.inner(), RiffError::DeadlineExceeded)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.inner(), RiffError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, RiffError>;
