//! Per-invocation values resolved before anything is sent.

use crate::config::DispatchConfig;
use crate::domain::foundation::RequestId;
use crate::domain::lifecycle::{LifecycleAction, LifecycleEvent, OutboundPayload};
use crate::ports::DispatchRequest;

use super::errors::{ForwardError, ForwardFailure};

/// Destination, correlation id and identity of one invocation.
#[derive(Debug, Clone)]
pub(crate) struct InvocationContext {
    pub action: LifecycleAction,
    pub user_email: Option<String>,
    pub destination: String,
    pub request_id: RequestId,
}

impl InvocationContext {
    pub fn resolve(action: LifecycleAction, event: &LifecycleEvent, config: &DispatchConfig) -> Self {
        Self {
            action,
            user_email: event.user.email.clone(),
            destination: config.resolve_destination(action, &event.secrets),
            request_id: RequestId::from_transaction_or_generate(
                event.transaction_id(),
                action.request_id_prefix(),
            ),
        }
    }

    pub fn dispatch_request(&self, payload: &OutboundPayload, user_agent: &str) -> DispatchRequest {
        DispatchRequest {
            destination: self.destination.clone(),
            action: self.action,
            request_id: self.request_id.clone(),
            user_agent: user_agent.to_string(),
            body: payload.to_json(),
        }
    }

    /// Email for log fields; absent emails log as an empty string.
    pub fn email_for_log(&self) -> &str {
        self.user_email.as_deref().unwrap_or_default()
    }

    pub fn fail(
        &self,
        failure: impl Into<ForwardFailure>,
        metadata_written: Vec<&'static str>,
    ) -> ForwardError {
        ForwardError {
            action: self.action,
            user_email: self.user_email.clone(),
            destination: self.destination.clone(),
            request_id: self.request_id.clone(),
            metadata_written,
            failure: failure.into(),
        }
    }
}
