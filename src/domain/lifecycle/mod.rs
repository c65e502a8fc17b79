//! Lifecycle module - what the relay forwards and what it writes back.
//!
//! - `LifecycleAction` - the two triggers and their fixed constants
//! - `LifecycleEvent` - typed event context from the identity provider
//! - `OutboundPayload` - normalized webhook body
//! - `UserMetadataPatch` - bookkeeping written onto the user record

mod action;
mod event;
mod metadata;
mod payload;

pub use action::LifecycleAction;
pub use event::{
    EventConnection, EventRequest, EventTransaction, EventUser, LifecycleEvent, Secrets,
    BACKEND_WEBHOOK_URL,
};
pub use metadata::{
    LoginInfo, UserInfo, UserMetadataPatch, LOGIN_INFO_GROUP, USER_INFO_GROUP,
    WELCOME_EMAIL_SENT_KEY,
};
pub use payload::{
    OutboundPayload, PayloadConnection, PayloadRequest, PayloadTransaction, PayloadUser,
};
