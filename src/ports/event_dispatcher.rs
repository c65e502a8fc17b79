//! EventDispatcher port - Interface for delivering payloads to the backend.
//!
//! The handlers build a `DispatchRequest` and hand it to whichever dispatcher
//! they were constructed with: the reqwest adapter in production, a mock in
//! tests.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::domain::foundation::RequestId;
use crate::domain::lifecycle::LifecycleAction;

/// Hard upper bound on a single webhook delivery.
pub const DISPATCH_TIMEOUT: Duration = Duration::from_millis(5000);

/// Port for the single outbound delivery of a lifecycle payload.
///
/// Implementations must:
/// - make exactly one attempt (no retries)
/// - give up after `DISPATCH_TIMEOUT`
/// - treat any 2xx as success and everything else as `DispatchError`
#[async_trait]
pub trait EventDispatcher: Send + Sync {
    async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchReceipt, DispatchError>;
}

/// Everything needed to deliver one payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRequest {
    /// Resolved destination URL.
    pub destination: String,
    pub action: LifecycleAction,
    pub request_id: RequestId,
    /// Static client identifier sent as `User-Agent`.
    pub user_agent: String,
    /// JSON body.
    pub body: Value,
}

impl DispatchRequest {
    /// Headers sent with the POST, in send order.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Content-Type", "application/json".to_string()),
            ("User-Agent", self.user_agent.clone()),
            ("X-Auth0-Action", self.action.action_header().to_string()),
            ("X-Request-ID", self.request_id.to_string()),
        ]
    }
}

/// Successful delivery. The body is kept for logging only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReceipt {
    pub status: u16,
    pub body: String,
}

/// Reasons a delivery attempt failed.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No response within the timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// Could not reach the destination.
    #[error("network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Destination answered with a non-2xx status.
    #[error("backend responded with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Destination is not a usable URL.
    #[error("invalid destination '{0}'")]
    InvalidDestination(String),

    /// HTTP client could not be constructed.
    #[error("http client unavailable: {0}")]
    Client(String),
}

impl DispatchError {
    pub fn timeout(timeout: Duration) -> Self {
        Self::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Network error keeping the underlying cause for the diagnostic trace.
    pub fn network_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            body: body.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
