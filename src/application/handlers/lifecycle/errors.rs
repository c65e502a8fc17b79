//! Forwarding failure type shared by both lifecycle handlers.

use std::error::Error as StdError;

use thiserror::Error;

use crate::domain::foundation::RequestId;
use crate::domain::lifecycle::LifecycleAction;
use crate::ports::{DispatchError, MetadataWriteError};

/// What went wrong during one invocation.
#[derive(Debug, Error)]
pub enum ForwardFailure {
    /// Timeout, network failure or non-2xx from the backend.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The host rejected a metadata write.
    #[error(transparent)]
    MetadataWrite(#[from] MetadataWriteError),
}

/// A failed forwarding attempt, with everything the failure log needs.
#[derive(Debug, Error)]
#[error("Failed to notify backend about {action}: {failure}")]
pub struct ForwardError {
    pub action: LifecycleAction,
    pub user_email: Option<String>,
    /// Resolved webhook destination.
    pub destination: String,
    pub request_id: RequestId,
    /// Metadata targets written before the failure surfaced.
    pub metadata_written: Vec<&'static str>,
    #[source]
    pub failure: ForwardFailure,
}

impl ForwardError {
    pub fn is_dispatch_failure(&self) -> bool {
        matches!(self.failure, ForwardFailure::Dispatch(_))
    }

    pub fn is_metadata_failure(&self) -> bool {
        matches!(self.failure, ForwardFailure::MetadataWrite(_))
    }

    /// Diagnostic trace: the failure and each underlying cause, outermost
    /// first.
    pub fn trace(&self) -> String {
        let mut causes = Vec::new();
        let mut current = Some(&self.failure as &(dyn StdError + 'static));
        while let Some(err) = current {
            causes.push(err.to_string());
            current = err.source();
        }
        causes.join("\n  caused by: ")
    }
}
