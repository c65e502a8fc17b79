//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Correlation identifier sent as `X-Request-ID` on every outbound call.
///
/// Taken from the provider's transaction id when one is available, otherwise
/// generated locally so that no dispatch ever goes out without one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Uses the upstream transaction id as given, or generates `<prefix>-<uuid>`
    /// when it is missing or blank.
    pub fn from_transaction_or_generate(transaction_id: Option<&str>, prefix: &str) -> Self {
        match transaction_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => Self(id.to_string()),
            None => Self::generate(prefix),
        }
    }

    /// Generates a fresh, unique identifier with the given prefix.
    pub fn generate(prefix: &str) -> Self {
        Self(format!("{}-{}", prefix, Uuid::new_v4()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id was generated locally with the given prefix.
    pub fn is_generated_with(&self, prefix: &str) -> bool {
        self.0
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('-'))
            .is_some_and(|rest| Uuid::parse_str(rest).is_ok())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
