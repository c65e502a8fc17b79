//! LifecycleRelay - Entry points the identity host calls.

use std::sync::Arc;

use crate::adapters::HttpEventDispatcher;
use crate::config::AppConfig;
use crate::domain::lifecycle::LifecycleEvent;
use crate::ports::{DispatchError, EventDispatcher, UserRecordApi};

use super::failure_absorber::{absorb, InvocationOutcome};
use super::post_login::PostLoginHandler;
use super::post_user_registration::PostUserRegistrationHandler;

/// Both trigger handlers behind one dispatcher and one configuration.
///
/// The `on_execute_*` methods never return an error: every failure is logged
/// and absorbed so the login or signup always proceeds.
pub struct LifecycleRelay {
    post_login: PostLoginHandler,
    post_user_registration: PostUserRegistrationHandler,
}

impl LifecycleRelay {
    pub fn new(dispatcher: Arc<dyn EventDispatcher>, config: Arc<AppConfig>) -> Self {
        Self {
            post_login: PostLoginHandler::new(dispatcher.clone(), config.clone()),
            post_user_registration: PostUserRegistrationHandler::new(dispatcher, config),
        }
    }

    /// Relay over HTTP with the standard dispatch timeout.
    pub fn from_config(config: AppConfig) -> Result<Self, DispatchError> {
        let dispatcher = HttpEventDispatcher::new()?;
        Ok(Self::new(Arc::new(dispatcher), Arc::new(config)))
    }

    pub async fn on_execute_post_login(
        &self,
        event: &LifecycleEvent,
        api: &dyn UserRecordApi,
    ) -> InvocationOutcome {
        match self.post_login.handle(event, api).await {
            Ok(result) => InvocationOutcome::Forwarded {
                request_id: result.request_id,
            },
            Err(e) => absorb(e),
        }
    }

    pub async fn on_execute_post_user_registration(
        &self,
        event: &LifecycleEvent,
        api: &dyn UserRecordApi,
    ) -> InvocationOutcome {
        match self.post_user_registration.handle(event, api).await {
            Ok(result) => InvocationOutcome::Forwarded {
                request_id: result.request_id,
            },
            Err(e) => absorb(e),
        }
    }
}
