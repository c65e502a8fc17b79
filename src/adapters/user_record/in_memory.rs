//! In-memory user record.
//!
//! Stands in for the identity provider's user store: keeps app and user
//! metadata in maps, logs every write, and can be told to reject writes.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::lifecycle::UserMetadataPatch;
use crate::ports::{MetadataWriteError, UserRecordApi};

/// User record held in memory.
#[derive(Clone, Default)]
pub struct InMemoryUserRecord {
    inner: Arc<Mutex<RecordState>>,
}

#[derive(Default)]
struct RecordState {
    app_metadata: Map<String, Value>,
    user_metadata: Map<String, Value>,
    writes: Vec<UserMetadataPatch>,
    failing_targets: HashSet<String>,
    fail_all: bool,
}

impl InMemoryUserRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds app metadata, as if written by an earlier invocation.
    pub fn with_app_metadata(self, group: impl Into<String>, value: Value) -> Self {
        self.lock().app_metadata.insert(group.into(), value);
        self
    }

    /// Rejects every write.
    pub fn failing() -> Self {
        let record = Self::new();
        record.lock().fail_all = true;
        record
    }

    /// Rejects writes to one group or key.
    pub fn fail_writes_to(&self, target: impl Into<String>) {
        self.lock().failing_targets.insert(target.into());
    }

    pub fn app_metadata(&self) -> Map<String, Value> {
        self.lock().app_metadata.clone()
    }

    pub fn app_metadata_group(&self, group: &str) -> Option<Value> {
        self.lock().app_metadata.get(group).cloned()
    }

    pub fn user_metadata(&self, key: &str) -> Option<Value> {
        self.lock().user_metadata.get(key).cloned()
    }

    /// Successful writes, oldest first.
    pub fn writes(&self) -> Vec<UserMetadataPatch> {
        self.lock().writes.clone()
    }

    /// Write counts per target.
    pub fn write_counts(&self) -> HashMap<&'static str, usize> {
        let mut counts = HashMap::new();
        for write in self.lock().writes.iter() {
            *counts.entry(write.target()).or_insert(0) += 1;
        }
        counts
    }

    fn lock(&self) -> MutexGuard<'_, RecordState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_writable(state: &RecordState, target: &str) -> Result<(), MetadataWriteError> {
        if state.fail_all || state.failing_targets.contains(target) {
            return Err(MetadataWriteError::new(target, "user record rejected the write"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRecordApi for InMemoryUserRecord {
    async fn set_app_metadata(&self, group: &str, patch: Value) -> Result<(), MetadataWriteError> {
        let mut state = self.lock();
        Self::check_writable(&state, group)?;
        state.app_metadata.insert(group.to_string(), patch.clone());
        state.writes.push(UserMetadataPatch::AppMetadata {
            group: known_target(group),
            patch,
        });
        Ok(())
    }

    async fn set_user_metadata(&self, key: &str, value: Value) -> Result<(), MetadataWriteError> {
        let mut state = self.lock();
        Self::check_writable(&state, key)?;
        state.user_metadata.insert(key.to_string(), value.clone());
        state.writes.push(UserMetadataPatch::UserMetadata {
            key: known_target(key),
            value,
        });
        Ok(())
    }
}

/// Maps a written target onto the relay's static names.
fn known_target(target: &str) -> &'static str {
    use crate::domain::lifecycle::{LOGIN_INFO_GROUP, USER_INFO_GROUP, WELCOME_EMAIL_SENT_KEY};

    [LOGIN_INFO_GROUP, USER_INFO_GROUP, WELCOME_EMAIL_SENT_KEY]
        .into_iter()
        .find(|known| *known == target)
        .unwrap_or("other")
}
