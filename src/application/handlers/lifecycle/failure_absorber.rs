//! Keeps relay failures out of the identity flow.
//!
//! A login or signup must never fail because the backend is down, so every
//! `ForwardError` ends here: it is logged with full context and turned into an
//! `InvocationOutcome::Absorbed`.

use crate::domain::foundation::RequestId;

use super::errors::ForwardError;

/// What happened to one trigger invocation.
#[derive(Debug)]
pub enum InvocationOutcome {
    /// Backend accepted the event and all bookkeeping was written.
    Forwarded { request_id: RequestId },
    /// Something failed; it was logged and swallowed.
    Absorbed { error: ForwardError },
}

impl InvocationOutcome {
    pub fn is_forwarded(&self) -> bool {
        matches!(self, Self::Forwarded { .. })
    }

    pub fn request_id(&self) -> &RequestId {
        match self {
            Self::Forwarded { request_id } => request_id,
            Self::Absorbed { error } => &error.request_id,
        }
    }

    pub fn error(&self) -> Option<&ForwardError> {
        match self {
            Self::Forwarded { .. } => None,
            Self::Absorbed { error } => Some(error),
        }
    }
}

/// Logs the failure and returns it as an absorbed outcome.
pub(crate) fn absorb(error: ForwardError) -> InvocationOutcome {
    tracing::error!(
        error = %error.failure,
        user_email = error.user_email.as_deref().unwrap_or_default(),
        webhook_url = %error.destination,
        request_id = %error.request_id,
        metadata_written = ?error.metadata_written,
        trace = %error.trace(),
        "{}",
        error
    );
    InvocationOutcome::Absorbed { error }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryUserRecord, MockEventDispatcher};
    use crate::application::LifecycleRelay;
    use crate::config::AppConfig;
    use crate::domain::lifecycle::{
        EventUser, LifecycleAction, LifecycleEvent, WELCOME_EMAIL_SENT_KEY,
    };
    use crate::ports::DispatchError;
    use std::io;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tracing_subscriber::fmt::MakeWriter;

    /// Shared buffer the fmt subscriber writes log lines into.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }

        fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
            tracing_subscriber::fmt()
                .with_writer(self.clone())
                .with_ansi(false)
                .finish()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn forward_error() -> ForwardError {
        ForwardError {
            action: LifecycleAction::PostLogin,
            user_email: Some("a@x.com".into()),
            destination: "http://localhost:8080/webhook/auth0/user-login".into(),
            request_id: RequestId::generate("login"),
            metadata_written: Vec::new(),
            failure: DispatchError::timeout(Duration::from_millis(5000)).into(),
        }
    }

    #[test]
    fn absorbed_outcome_keeps_error_context() {
        let error = forward_error();
        let request_id = error.request_id.clone();

        let outcome = absorb(error);

        assert!(!outcome.is_forwarded());
        assert_eq!(outcome.request_id(), &request_id);
        assert!(outcome.error().unwrap().is_dispatch_failure());
    }

    #[test]
    fn forwarded_outcome_has_no_error() {
        let outcome = InvocationOutcome::Forwarded {
            request_id: RequestId::generate("signup"),
        };

        assert!(outcome.is_forwarded());
        assert!(outcome.error().is_none());
    }

    #[test]
    fn absorb_logs_error_with_invocation_context() {
        let logs = CapturedLogs::default();

        tracing::subscriber::with_default(logs.subscriber(), || absorb(forward_error()));

        let output = logs.contents();
        assert!(output.contains("ERROR"), "{}", output);
        assert!(output.contains("Failed to notify backend about post-login"), "{}", output);
        assert!(output.contains("request timed out after 5000ms"), "{}", output);
        assert!(output.contains("user_email=\"a@x.com\""), "{}", output);
        assert!(
            output.contains("webhook_url=http://localhost:8080/webhook/auth0/user-login"),
            "{}",
            output
        );
        assert!(output.contains("request_id=login-"), "{}", output);
        assert!(output.contains("trace="), "{}", output);
    }

    #[tokio::test]
    async fn unreachable_registration_is_logged_and_absorbed() {
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber());
        let relay = LifecycleRelay::new(
            Arc::new(MockEventDispatcher::unreachable()),
            Arc::new(AppConfig::default()),
        );
        let event = LifecycleEvent {
            user: EventUser {
                email: Some("new@x.com".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let record = InMemoryUserRecord::new();

        let outcome = relay.on_execute_post_user_registration(&event, &record).await;

        assert!(!outcome.is_forwarded());
        assert!(record.user_metadata(WELCOME_EMAIL_SENT_KEY).is_some());
        let output = logs.contents();
        assert!(
            output.contains("Failed to notify backend about post-user-registration"),
            "{}",
            output
        );
        assert!(output.contains("network error: Connection failed"), "{}", output);
        assert!(output.contains("user_email=\"new@x.com\""), "{}", output);
        assert!(
            output.contains("webhook_url=http://localhost:8080/webhook/auth0/user-signup"),
            "{}",
            output
        );
        assert!(output.contains("trace="), "{}", output);
    }
}
