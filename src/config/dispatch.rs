//! Webhook dispatch configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::lifecycle::{LifecycleAction, Secrets};

/// Webhook dispatch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Base URL of the local development backend, used when the event carries
    /// no `BACKEND_WEBHOOK_URL` secret
    #[serde(default = "default_fallback_base_url")]
    pub fallback_base_url: String,

    /// Static client identifier sent as `User-Agent`
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl DispatchConfig {
    /// Local fallback URL for the given action
    pub fn fallback_url(&self, action: LifecycleAction) -> String {
        format!(
            "{}{}",
            self.fallback_base_url.trim_end_matches('/'),
            action.fallback_path()
        )
    }

    /// Destination for one invocation: the secret if set, else the fallback
    pub fn resolve_destination(&self, action: LifecycleAction, secrets: &Secrets) -> String {
        secrets
            .backend_webhook_url()
            .map(str::to_string)
            .unwrap_or_else(|| self.fallback_url(action))
    }

    /// Validate dispatch configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.fallback_base_url.is_empty() {
            return Err(ValidationError::MissingRequired("FALLBACK_BASE_URL"));
        }
        if !self.fallback_base_url.starts_with("http://")
            && !self.fallback_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidFallbackUrl);
        }
        if self.user_agent.trim().is_empty() {
            return Err(ValidationError::MissingRequired("USER_AGENT"));
        }
        Ok(())
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            fallback_base_url: default_fallback_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_fallback_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_user_agent() -> String {
    "Auth0-Action/1.0".to_string()
}
