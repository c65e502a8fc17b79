//! Applies metadata patches to the host's user record.

use crate::domain::lifecycle::UserMetadataPatch;
use crate::ports::{MetadataWriteError, UserRecordApi};

/// Writes patches in order and remembers which ones the host accepted.
pub(crate) struct MetadataWriter<'a> {
    api: &'a dyn UserRecordApi,
    written: Vec<&'static str>,
}

impl<'a> MetadataWriter<'a> {
    pub fn new(api: &'a dyn UserRecordApi) -> Self {
        Self {
            api,
            written: Vec::new(),
        }
    }

    pub async fn apply(&mut self, patch: UserMetadataPatch) -> Result<(), MetadataWriteError> {
        let target = patch.target();
        match patch {
            UserMetadataPatch::AppMetadata { group, patch } => {
                self.api.set_app_metadata(group, patch).await?
            }
            UserMetadataPatch::UserMetadata { key, value } => {
                self.api.set_user_metadata(key, value).await?
            }
        }
        tracing::debug!(target_key = target, "Metadata written");
        self.written.push(target);
        Ok(())
    }

    /// Targets written so far.
    pub fn written(&self) -> Vec<&'static str> {
        self.written.clone()
    }
}
