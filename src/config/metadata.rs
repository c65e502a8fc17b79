//! User metadata write-back configuration

use serde::Deserialize;

use super::error::ValidationError;

/// User metadata write-back configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataConfig {
    /// Tickets granted to every new user
    #[serde(default = "default_initial_tickets")]
    pub initial_tickets: u32,

    /// When the registration handler writes `welcome_email_sent`
    #[serde(default)]
    pub welcome_flag_gating: MetadataGating,
}

/// Whether a metadata write depends on the dispatch outcome
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MetadataGating {
    /// Written whenever no earlier metadata write failed
    #[default]
    Unconditional,
    /// Written only after the backend accepted the event
    RequireDispatchSuccess,
}

impl MetadataConfig {
    /// Validate metadata configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.initial_tickets > 1000 {
            return Err(ValidationError::InitialTicketsTooLarge);
        }
        Ok(())
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            initial_tickets: default_initial_tickets(),
            welcome_flag_gating: MetadataGating::default(),
        }
    }
}

fn default_initial_tickets() -> u32 {
    3
}
