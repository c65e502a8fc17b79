//! PostUserRegistrationHandler - Forwards new signups to the backend.

use std::sync::Arc;

use crate::config::{AppConfig, MetadataGating};
use crate::domain::foundation::{RequestId, Timestamp};
use crate::domain::lifecycle::{
    LifecycleAction, LifecycleEvent, OutboundPayload, UserInfo, UserMetadataPatch,
};
use crate::ports::{DispatchReceipt, EventDispatcher, UserRecordApi};

use super::context::InvocationContext;
use super::errors::ForwardError;
use super::metadata_writer::MetadataWriter;

/// Result of a forwarded registration.
#[derive(Debug, Clone)]
pub struct PostUserRegistrationResult {
    pub request_id: RequestId,
    pub destination: String,
    pub receipt: DispatchReceipt,
    pub user_info: UserInfo,
}

/// Handler for the post-user-registration trigger.
///
/// Writes, in order:
/// 1. `user_info` app metadata, only after a successful dispatch
/// 2. `welcome_email_sent = false`, gated per `MetadataConfig::welcome_flag_gating`
///
/// Under `Unconditional` gating a failed dispatch still gets the welcome flag
/// written; the dispatch error is then returned after the write.
pub struct PostUserRegistrationHandler {
    dispatcher: Arc<dyn EventDispatcher>,
    config: Arc<AppConfig>,
}

impl PostUserRegistrationHandler {
    pub fn new(dispatcher: Arc<dyn EventDispatcher>, config: Arc<AppConfig>) -> Self {
        Self { dispatcher, config }
    }

    pub async fn handle(
        &self,
        event: &LifecycleEvent,
        api: &dyn UserRecordApi,
    ) -> Result<PostUserRegistrationResult, ForwardError> {
        let action = LifecycleAction::PostUserRegistration;
        let ctx = InvocationContext::resolve(action, event, &self.config.dispatch);

        tracing::info!(
            user_email = ctx.email_for_log(),
            request_id = %ctx.request_id,
            "{} action triggered",
            action.display_name()
        );

        // 1. Build and deliver the payload
        let payload = OutboundPayload::for_signup(event, Timestamp::now());
        let request = ctx.dispatch_request(&payload, &self.config.dispatch.user_agent);

        let dispatched = match self.dispatcher.dispatch(&request).await {
            Ok(receipt) => {
                tracing::info!(
                    status = receipt.status,
                    response = %receipt.body,
                    request_id = %ctx.request_id,
                    "Successfully notified backend about signup"
                );
                Ok(receipt)
            }
            Err(e) => match self.config.metadata.welcome_flag_gating {
                MetadataGating::RequireDispatchSuccess => return Err(ctx.fail(e, Vec::new())),
                MetadataGating::Unconditional => Err(e),
            },
        };

        // 2. Initial bookkeeping, only for events the backend accepted
        let user_info = UserInfo::record(event, Timestamp::now(), self.config.metadata.initial_tickets);
        let mut writer = MetadataWriter::new(api);

        if dispatched.is_ok() {
            writer
                .apply(UserMetadataPatch::user_info(&user_info))
                .await
                .map_err(|e| ctx.fail(e, writer.written()))?;
        }

        // 3. Welcome flag for the downstream email sender
        let flag_write = writer.apply(UserMetadataPatch::welcome_email_pending()).await;

        match (dispatched, flag_write) {
            (Ok(receipt), Ok(())) => {
                tracing::info!(
                    user_email = ctx.email_for_log(),
                    "Set initial metadata for new user"
                );
                Ok(PostUserRegistrationResult {
                    request_id: ctx.request_id,
                    destination: ctx.destination,
                    receipt,
                    user_info,
                })
            }
            (Ok(_), Err(write_err)) => Err(ctx.fail(write_err, writer.written())),
            (Err(dispatch_err), flag_write) => {
                if let Err(write_err) = flag_write {
                    tracing::warn!(
                        user_email = ctx.email_for_log(),
                        error = %write_err,
                        "Welcome flag not written after failed dispatch"
                    );
                }
                Err(ctx.fail(dispatch_err, writer.written()))
            }
        }
    }
}
