//! Mock dispatcher for testing.
//!
//! Provides a configurable `EventDispatcher` for unit and integration tests.
//! Supports:
//! - Pre-configured responses
//! - Failure injection (timeout, network, rejected status)
//! - Call tracking

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{
    DispatchError, DispatchReceipt, DispatchRequest, EventDispatcher, DISPATCH_TIMEOUT,
};

/// Mock event dispatcher for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockEventDispatcher::timing_out();
/// let handler = PostLoginHandler::new(Arc::new(mock.clone()), config);
///
/// handler.handle(&event, &api).await.unwrap_err();
/// assert_eq!(mock.call_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockEventDispatcher {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    mode: ResponseMode,
    calls: Vec<DispatchRequest>,
}

/// What the mock answers with.
#[derive(Debug, Clone)]
enum ResponseMode {
    Respond { status: u16, body: String },
    Timeout,
    Unreachable,
}

impl Default for ResponseMode {
    fn default() -> Self {
        ResponseMode::Respond {
            status: 200,
            body: r#"{"status":"ok"}"#.to_string(),
        }
    }
}

impl MockEventDispatcher {
    /// Creates a mock that answers every dispatch with 200.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock answering with the given status and body.
    pub fn responding(status: u16, body: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.set_response(status, body);
        mock
    }

    /// Creates a mock whose dispatches always time out.
    pub fn timing_out() -> Self {
        let mock = Self::new();
        mock.lock().mode = ResponseMode::Timeout;
        mock
    }

    /// Creates a mock whose destination is never reachable.
    pub fn unreachable() -> Self {
        let mock = Self::new();
        mock.lock().mode = ResponseMode::Unreachable;
        mock
    }

    pub fn set_response(&self, status: u16, body: impl Into<String>) {
        self.lock().mode = ResponseMode::Respond {
            status,
            body: body.into(),
        };
    }

    /// Requests received so far, oldest first.
    pub fn calls(&self) -> Vec<DispatchRequest> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    pub fn last_call(&self) -> Option<DispatchRequest> {
        self.lock().calls.last().cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl EventDispatcher for MockEventDispatcher {
    async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchReceipt, DispatchError> {
        let mode = {
            let mut state = self.lock();
            state.calls.push(request.clone());
            state.mode.clone()
        };

        match mode {
            ResponseMode::Respond { status, body } if (200..300).contains(&status) => {
                Ok(DispatchReceipt { status, body })
            }
            ResponseMode::Respond { status, body } => Err(DispatchError::rejected(status, body)),
            ResponseMode::Timeout => Err(DispatchError::timeout(DISPATCH_TIMEOUT)),
            ResponseMode::Unreachable => Err(DispatchError::network(format!(
                "Connection failed: {}",
                request.destination
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::RequestId;
    use crate::domain::lifecycle::LifecycleAction;
    use serde_json::json;

    fn request() -> DispatchRequest {
        DispatchRequest {
            destination: "http://localhost:8080/webhook/auth0/user-signup".into(),
            action: LifecycleAction::PostUserRegistration,
            request_id: RequestId::generate("signup"),
            user_agent: "Auth0-Action/1.0".into(),
            body: json!({}),
        }
    }

    #[tokio::test]
    async fn default_mock_succeeds_and_records_call() {
        let mock = MockEventDispatcher::new();
        let receipt = mock.dispatch(&request()).await.unwrap();

        assert_eq!(receipt.status, 200);
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.last_call().unwrap().action, LifecycleAction::PostUserRegistration);
    }

    #[tokio::test]
    async fn non_2xx_is_rejected() {
        let mock = MockEventDispatcher::responding(500, "boom");
        let err = mock.dispatch(&request()).await.unwrap_err();

        assert!(matches!(err, DispatchError::Rejected { status: 500, .. }));
    }

    #[tokio::test]
    async fn timing_out_mock_reports_timeout() {
        let mock = MockEventDispatcher::timing_out();
        assert!(mock.dispatch(&request()).await.unwrap_err().is_timeout());
    }

    #[tokio::test]
    async fn clones_share_call_log() {
        let mock = MockEventDispatcher::unreachable();
        let clone = mock.clone();
        let _ = clone.dispatch(&request()).await;

        assert_eq!(mock.call_count(), 1);
    }
}
