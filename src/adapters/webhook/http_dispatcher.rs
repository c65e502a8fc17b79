//! HTTP dispatcher - Implementation of EventDispatcher over reqwest.
//!
//! One POST per dispatch, bounded by a client-wide timeout that covers the
//! whole exchange including reading the response body. Redirects are
//! followed up to `MAX_REDIRECTS` hops; the final response decides success.
//!
//! # Configuration
//!
//! ```ignore
//! let dispatcher = HttpEventDispatcher::new()?;
//! let receipt = dispatcher.dispatch(&request).await?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use std::time::Duration;

use crate::ports::{
    DispatchError, DispatchReceipt, DispatchRequest, EventDispatcher, DISPATCH_TIMEOUT,
};

/// Redirect hops followed before the dispatch fails.
const MAX_REDIRECTS: usize = 5;

/// Webhook dispatcher backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpEventDispatcher {
    client: Client,
    timeout: Duration,
}

impl HttpEventDispatcher {
    /// Creates a dispatcher with the standard 5 second timeout.
    pub fn new() -> Result<Self, DispatchError> {
        Self::with_timeout(DISPATCH_TIMEOUT)
    }

    /// Creates a dispatcher with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| DispatchError::Client(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn map_transport_error(&self, e: reqwest::Error) -> DispatchError {
        if e.is_timeout() {
            DispatchError::timeout(self.timeout)
        } else if e.is_connect() {
            DispatchError::network_with_source(format!("Connection failed: {}", e), e)
        } else {
            DispatchError::network_with_source(e.to_string(), e)
        }
    }

    async fn read_response(&self, response: Response) -> Result<DispatchReceipt, DispatchError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if status.is_success() {
            Ok(DispatchReceipt {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(DispatchError::rejected(status.as_u16(), body))
        }
    }
}

#[async_trait]
impl EventDispatcher for HttpEventDispatcher {
    async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchReceipt, DispatchError> {
        let url = Url::parse(&request.destination)
            .map_err(|_| DispatchError::InvalidDestination(request.destination.clone()))?;

        let mut builder = self.client.post(url).body(request.body.to_string());
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }

        tracing::debug!(
            destination = %request.destination,
            request_id = %request.request_id,
            action = %request.action,
            "Dispatching lifecycle event"
        );

        let response = builder
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        self.read_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::RequestId;
    use crate::domain::lifecycle::LifecycleAction;
    use serde_json::json;

    fn request_to(destination: &str) -> DispatchRequest {
        DispatchRequest {
            destination: destination.to_string(),
            action: LifecycleAction::PostLogin,
            request_id: RequestId::generate("login"),
            user_agent: "Auth0-Action/1.0".to_string(),
            body: json!({ "event_type": "user_login" }),
        }
    }

    #[test]
    fn default_timeout_is_five_seconds() {
        let dispatcher = HttpEventDispatcher::new().unwrap();
        assert_eq!(dispatcher.timeout(), Duration::from_millis(5000));
    }

    #[tokio::test]
    async fn invalid_destination_fails_without_sending() {
        let dispatcher = HttpEventDispatcher::new().unwrap();
        let err = dispatcher.dispatch(&request_to("not a url")).await.unwrap_err();

        assert!(matches!(err, DispatchError::InvalidDestination(ref d) if d == "not a url"));
    }

    #[tokio::test]
    async fn unreachable_destination_is_network_error() {
        // Nothing listens on the discard port locally.
        let dispatcher = HttpEventDispatcher::with_timeout(Duration::from_millis(500)).unwrap();
        let err = dispatcher
            .dispatch(&request_to("http://127.0.0.1:9/webhook"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Network { .. } | DispatchError::Timeout { .. }
        ));
    }
}
