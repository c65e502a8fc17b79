//! Typed view of the event context the identity provider hands to a handler.
//!
//! Every nested structure is optional on the wire. Missing or `null` values
//! deserialize to empty defaults so that building a payload never fails on
//! sparse events (registration events usually carry no transaction at all).

use std::collections::HashMap;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Secret holding the backend webhook destination.
pub const BACKEND_WEBHOOK_URL: &str = "BACKEND_WEBHOOK_URL";

/// Event context for one lifecycle invocation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LifecycleEvent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: EventUser,

    #[serde(default, deserialize_with = "null_as_default")]
    pub connection: EventConnection,

    #[serde(default, deserialize_with = "null_as_default")]
    pub request: EventRequest,

    /// Absent for most registration events.
    #[serde(default)]
    pub transaction: Option<EventTransaction>,

    #[serde(default)]
    pub secrets: Secrets,
}

impl LifecycleEvent {
    /// Transaction id, if the provider supplied one.
    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction.as_ref().and_then(|t| t.id.as_deref())
    }
}

/// Identity attributes of the user the event is about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventUser {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub email_verified: Option<bool>,
    pub picture: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub family_name: Option<String>,
    pub given_name: Option<String>,
    pub locale: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub app_metadata: Map<String, Value>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub user_metadata: Map<String, Value>,
}

impl EventUser {
    /// Display name: `name`, falling back to `nickname` when empty or absent.
    ///
    /// Whitespace-only names are kept as given.
    pub fn display_name(&self) -> Option<&str> {
        let present = |v: &&str| !v.is_empty();
        self.name
            .as_deref()
            .filter(present)
            .or_else(|| self.nickname.as_deref().filter(present))
    }

    /// Number of logins recorded by earlier invocations, 0 if none.
    ///
    /// Reads `login_info.login_count` (where the login handler writes it) and
    /// falls back to a top-level `login_count`.
    pub fn prior_login_count(&self) -> u64 {
        self.app_metadata
            .get("login_info")
            .and_then(|info| info.get("login_count"))
            .or_else(|| self.app_metadata.get("login_count"))
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }
}

/// Connection the user authenticated through.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventConnection {
    pub name: Option<String>,
    pub strategy: Option<String>,
}

/// Inbound HTTP request that triggered the lifecycle event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventRequest {
    pub ip: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: HashMap<String, String>,

    pub query: Option<Value>,
    pub body: Option<Value>,
}

impl EventRequest {
    /// The `user-agent` header, matched case-insensitively.
    pub fn user_agent(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("user-agent"))
            .map(|(_, value)| value.as_str())
    }
}

/// Authorization transaction the event belongs to.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventTransaction {
    pub id: Option<String>,
    pub protocol: Option<String>,
    pub requested_scopes: Option<Vec<String>>,
}

/// Configuration secrets delivered with the event.
///
/// Values never appear in `Debug` output.
#[derive(Clone, Default)]
pub struct Secrets {
    values: HashMap<String, SecretString>,
}

impl Secrets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a secret, replacing any previous value under the same key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .insert(key.into(), SecretString::new(value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&SecretString> {
        self.values.get(key)
    }

    /// Configured webhook destination, ignoring blank values.
    pub fn backend_webhook_url(&self) -> Option<&str> {
        self.get(BACKEND_WEBHOOK_URL)
            .map(|url| url.expose_secret().as_str())
            .and_then(|url| non_empty(Some(url)))
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("Secrets").field("keys", &keys).finish()
    }
}

impl<'de> Deserialize<'de> for Secrets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<HashMap<String, String>>::deserialize(deserializer)?.unwrap_or_default();
        let values = raw
            .into_iter()
            .map(|(key, value)| (key, SecretString::new(value)))
            .collect();
        Ok(Self { values })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
