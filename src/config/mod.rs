//! Relay configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `EVENT_RELAY` prefix and nested values use double underscores as separators.
//!
//! Per-invocation secrets (`BACKEND_WEBHOOK_URL`) are not configuration; they
//! arrive with each event.
//!
//! # Example
//!
//! ```no_run
//! use identity_event_relay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod dispatch;
mod error;
mod logging;
mod metadata;

pub use dispatch::DispatchConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use metadata::{MetadataConfig, MetadataGating};

use serde::Deserialize;

/// Root relay configuration
///
/// Every value has a default, so an empty environment yields a working
/// local-development setup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Webhook destination fallback and client identity
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Metadata write-back settings
    #[serde(default)]
    pub metadata: MetadataConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `EVENT_RELAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `EVENT_RELAY__DISPATCH__FALLBACK_BASE_URL=...` -> `dispatch.fallback_base_url`
    /// - `EVENT_RELAY__METADATA__INITIAL_TICKETS=5` -> `metadata.initial_tickets = 5`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("EVENT_RELAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.dispatch.validate()?;
        self.metadata.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Load and validate in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lifecycle::LifecycleAction;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("EVENT_RELAY__DISPATCH__FALLBACK_BASE_URL");
        env::remove_var("EVENT_RELAY__DISPATCH__USER_AGENT");
        env::remove_var("EVENT_RELAY__METADATA__INITIAL_TICKETS");
        env::remove_var("EVENT_RELAY__METADATA__WELCOME_FLAG_GATING");
        env::remove_var("EVENT_RELAY__LOGGING__FORMAT");
    }

    #[test]
    fn test_load_with_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.dispatch.user_agent, "Auth0-Action/1.0");
        assert_eq!(config.metadata.initial_tickets, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("EVENT_RELAY__DISPATCH__FALLBACK_BASE_URL", "http://backend:9000");
        env::set_var("EVENT_RELAY__METADATA__INITIAL_TICKETS", "5");
        env::set_var("EVENT_RELAY__METADATA__WELCOME_FLAG_GATING", "require_dispatch_success");
        env::set_var("EVENT_RELAY__LOGGING__FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.dispatch.fallback_url(LifecycleAction::PostUserRegistration),
            "http://backend:9000/webhook/auth0/user-signup"
        );
        assert_eq!(config.metadata.initial_tickets, 5);
        assert_eq!(
            config.metadata.welcome_flag_gating,
            MetadataGating::RequireDispatchSuccess
        );
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_validated_rejects_bad_fallback() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("EVENT_RELAY__DISPATCH__FALLBACK_BASE_URL", "localhost:8080");
        let result = AppConfig::load_validated();
        clear_env();

        assert!(matches!(
            result,
            Err(ConfigError::ValidationFailed(ValidationError::InvalidFallbackUrl))
        ));
    }
}
