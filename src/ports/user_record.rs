//! UserRecordApi port - Capability to mutate the host's user record.
//!
//! The identity provider owns the user store. The relay only ever writes to
//! it, and only through this interface.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Port for writing metadata onto the user record.
///
/// Writes are fire-and-forget from the relay's point of view; an `Ok` means
/// the host accepted the write, nothing more.
#[async_trait]
pub trait UserRecordApi: Send + Sync {
    /// Replace the app-metadata group `group` with `patch`.
    async fn set_app_metadata(&self, group: &str, patch: Value) -> Result<(), MetadataWriteError>;

    /// Set a single user-metadata key.
    async fn set_user_metadata(&self, key: &str, value: Value) -> Result<(), MetadataWriteError>;
}

/// The host rejected a metadata write.
#[derive(Debug, Clone, Error)]
#[error("failed to write metadata '{target}': {message}")]
pub struct MetadataWriteError {
    /// Group or key being written.
    pub target: String,
    pub message: String,
}

impl MetadataWriteError {
    pub fn new(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            message: message.into(),
        }
    }
}
