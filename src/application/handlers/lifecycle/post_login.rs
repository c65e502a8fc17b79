//! PostLoginHandler - Forwards completed logins to the backend.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::foundation::{RequestId, Timestamp};
use crate::domain::lifecycle::{
    LifecycleAction, LifecycleEvent, LoginInfo, OutboundPayload, UserMetadataPatch,
};
use crate::ports::{DispatchReceipt, EventDispatcher, UserRecordApi};

use super::context::InvocationContext;
use super::errors::ForwardError;
use super::metadata_writer::MetadataWriter;

/// Result of a forwarded login.
#[derive(Debug, Clone)]
pub struct PostLoginResult {
    pub request_id: RequestId,
    pub destination: String,
    pub receipt: DispatchReceipt,
    pub login_info: LoginInfo,
}

/// Handler for the post-login trigger.
///
/// Dispatches the login payload and, only once the backend has accepted it,
/// records `login_info` on the user.
pub struct PostLoginHandler {
    dispatcher: Arc<dyn EventDispatcher>,
    config: Arc<AppConfig>,
}

impl PostLoginHandler {
    pub fn new(dispatcher: Arc<dyn EventDispatcher>, config: Arc<AppConfig>) -> Self {
        Self { dispatcher, config }
    }

    pub async fn handle(
        &self,
        event: &LifecycleEvent,
        api: &dyn UserRecordApi,
    ) -> Result<PostLoginResult, ForwardError> {
        let action = LifecycleAction::PostLogin;
        let ctx = InvocationContext::resolve(action, event, &self.config.dispatch);

        tracing::info!(
            user_email = ctx.email_for_log(),
            request_id = %ctx.request_id,
            "{} action triggered",
            action.display_name()
        );

        // 1. Build and deliver the payload
        let payload = OutboundPayload::for_login(event, Timestamp::now());
        let request = ctx.dispatch_request(&payload, &self.config.dispatch.user_agent);

        let receipt = self
            .dispatcher
            .dispatch(&request)
            .await
            .map_err(|e| ctx.fail(e, Vec::new()))?;

        tracing::info!(
            status = receipt.status,
            response = %receipt.body,
            request_id = %ctx.request_id,
            "Successfully notified backend"
        );

        // 2. Record the login, gated on the successful dispatch above
        let login_info = LoginInfo::record(event, Timestamp::now());
        let mut writer = MetadataWriter::new(api);
        writer
            .apply(UserMetadataPatch::login_info(&login_info))
            .await
            .map_err(|e| ctx.fail(e, writer.written()))?;

        tracing::info!(
            user_email = ctx.email_for_log(),
            login_count = login_info.login_count,
            "Updated user metadata"
        );

        Ok(PostLoginResult {
            request_id: ctx.request_id,
            destination: ctx.destination,
            receipt,
            login_info,
        })
    }
}
