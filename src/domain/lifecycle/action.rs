//! The two lifecycle triggers the relay forwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle trigger handled by the relay.
///
/// Each variant fixes the constants that distinguish one handler from the
/// other: the payload tag, the action header, the local fallback path and the
/// prefix for generated request ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    PostLogin,
    PostUserRegistration,
}

impl LifecycleAction {
    /// Value of the payload's `event_type` field.
    pub fn event_type(&self) -> &'static str {
        match self {
            LifecycleAction::PostLogin => "user_login",
            LifecycleAction::PostUserRegistration => "user_signup",
        }
    }

    /// Value of the `X-Auth0-Action` header.
    pub fn action_header(&self) -> &'static str {
        match self {
            LifecycleAction::PostLogin => "post-login",
            LifecycleAction::PostUserRegistration => "post-user-registration",
        }
    }

    /// Path of the backend endpoint used when no destination secret is set.
    pub fn fallback_path(&self) -> &'static str {
        match self {
            LifecycleAction::PostLogin => "/webhook/auth0/user-login",
            LifecycleAction::PostUserRegistration => "/webhook/auth0/user-signup",
        }
    }

    /// Prefix for request ids generated when the transaction id is missing.
    pub fn request_id_prefix(&self) -> &'static str {
        match self {
            LifecycleAction::PostLogin => "login",
            LifecycleAction::PostUserRegistration => "signup",
        }
    }

    /// Human-readable name used in log lines.
    pub fn display_name(&self) -> &'static str {
        match self {
            LifecycleAction::PostLogin => "Post-Login",
            LifecycleAction::PostUserRegistration => "Post-User Registration",
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action_header())
    }
}
