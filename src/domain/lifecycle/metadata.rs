//! Bookkeeping written back onto the user record after a dispatch.

use serde::Serialize;
use serde_json::Value;

use super::event::LifecycleEvent;
use crate::domain::foundation::Timestamp;

/// App-metadata group written by the login handler.
pub const LOGIN_INFO_GROUP: &str = "login_info";

/// App-metadata group written by the registration handler.
pub const USER_INFO_GROUP: &str = "user_info";

/// User-metadata flag consumed by the welcome email sender.
pub const WELCOME_EMAIL_SENT_KEY: &str = "welcome_email_sent";

/// Login bookkeeping stored under `login_info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginInfo {
    pub last_login_at: Timestamp,
    pub last_login_ip: Option<String>,
    pub last_login_connection: Option<String>,
    pub login_count: u64,
}

impl LoginInfo {
    /// Records this login, incrementing the count stored by earlier logins.
    pub fn record(event: &LifecycleEvent, now: Timestamp) -> Self {
        Self {
            last_login_at: now,
            last_login_ip: event.request.ip.clone(),
            last_login_connection: event.connection.name.clone(),
            login_count: event.user.prior_login_count().saturating_add(1),
        }
    }
}

/// Signup bookkeeping stored under `user_info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserInfo {
    pub signup_at: Timestamp,
    pub signup_ip: Option<String>,
    pub signup_connection: Option<String>,
    pub initial_tickets: u32,
    pub onboarding_completed: bool,
}

impl UserInfo {
    pub fn record(event: &LifecycleEvent, now: Timestamp, initial_tickets: u32) -> Self {
        Self {
            signup_at: now,
            signup_ip: event.request.ip.clone(),
            signup_connection: event.connection.name.clone(),
            initial_tickets,
            onboarding_completed: false,
        }
    }
}

/// A single write against the host's user record.
#[derive(Debug, Clone, PartialEq)]
pub enum UserMetadataPatch {
    /// Replace one app-metadata group.
    AppMetadata { group: &'static str, patch: Value },
    /// Set one user-metadata key.
    UserMetadata { key: &'static str, value: Value },
}

impl UserMetadataPatch {
    pub fn login_info(info: &LoginInfo) -> Self {
        Self::AppMetadata {
            group: LOGIN_INFO_GROUP,
            patch: to_value(info),
        }
    }

    pub fn user_info(info: &UserInfo) -> Self {
        Self::AppMetadata {
            group: USER_INFO_GROUP,
            patch: to_value(info),
        }
    }

    /// `welcome_email_sent = false`, left for the email sender to flip.
    pub fn welcome_email_pending() -> Self {
        Self::UserMetadata {
            key: WELCOME_EMAIL_SENT_KEY,
            value: Value::Bool(false),
        }
    }

    /// Group or key this patch targets.
    pub fn target(&self) -> &'static str {
        match self {
            Self::AppMetadata { group, .. } => *group,
            Self::UserMetadata { key, .. } => *key,
        }
    }
}

// Plain structs of strings, numbers and bools always serialize.
fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
