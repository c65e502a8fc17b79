//! Outbound payload assembly.
//!
//! Building is pure: the caller supplies the clock value, and everything else
//! is copied from the event. Absent upstream values are omitted from the JSON.

use serde::Serialize;
use serde_json::Value;

use super::action::LifecycleAction;
use super::event::LifecycleEvent;
use crate::domain::foundation::Timestamp;

/// Normalized record POSTed to the backend webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundPayload {
    pub user: PayloadUser,
    pub connection: PayloadConnection,
    pub request: PayloadRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<PayloadTransaction>,
    pub timestamp: Timestamp,
    pub event_type: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PayloadUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PayloadConnection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PayloadRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PayloadTransaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_scopes: Option<Vec<String>>,
}

impl OutboundPayload {
    /// Builds the payload for the given action.
    pub fn build(action: LifecycleAction, event: &LifecycleEvent, now: Timestamp) -> Self {
        match action {
            LifecycleAction::PostLogin => Self::for_login(event, now),
            LifecycleAction::PostUserRegistration => Self::for_signup(event, now),
        }
    }

    /// Login payload: core user fields plus `updated_at` and the transaction.
    pub fn for_login(event: &LifecycleEvent, now: Timestamp) -> Self {
        let user = &event.user;
        let transaction = event.transaction.as_ref();

        Self {
            user: PayloadUser {
                updated_at: user.updated_at.clone(),
                ..core_user(event)
            },
            connection: connection(event),
            request: request(event),
            transaction: Some(PayloadTransaction {
                transaction_id: transaction.and_then(|t| t.id.clone()),
                protocol: transaction.and_then(|t| t.protocol.clone()),
                requested_scopes: transaction.and_then(|t| t.requested_scopes.clone()),
            }),
            timestamp: now,
            event_type: LifecycleAction::PostLogin.event_type(),
        }
    }

    /// Signup payload: core user fields plus profile names and locale, no
    /// transaction.
    pub fn for_signup(event: &LifecycleEvent, now: Timestamp) -> Self {
        let user = &event.user;

        Self {
            user: PayloadUser {
                family_name: user.family_name.clone(),
                given_name: user.given_name.clone(),
                locale: user.locale.clone(),
                ..core_user(event)
            },
            connection: connection(event),
            request: request(event),
            transaction: None,
            timestamp: now,
            event_type: LifecycleAction::PostUserRegistration.event_type(),
        }
    }

    /// JSON body for the outbound request.
    pub fn to_json(&self) -> Value {
        // Only strings, bools and JSON values inside; serialization cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn core_user(event: &LifecycleEvent) -> PayloadUser {
    let user = &event.user;
    PayloadUser {
        user_id: user.user_id.clone(),
        email: user.email.clone(),
        name: user.display_name().map(str::to_string),
        email_verified: user.email_verified,
        picture: user.picture.clone(),
        created_at: user.created_at.clone(),
        ..Default::default()
    }
}

fn connection(event: &LifecycleEvent) -> PayloadConnection {
    PayloadConnection {
        name: event.connection.name.clone(),
        strategy: event.connection.strategy.clone(),
    }
}

fn request(event: &LifecycleEvent) -> PayloadRequest {
    let request = &event.request;
    PayloadRequest {
        ip: request.ip.clone(),
        user_agent: request.user_agent().map(str::to_string),
        query: request.query.clone(),
        body: request.body.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lifecycle::event::{
        EventConnection, EventRequest, EventTransaction, EventUser,
    };
    use chrono::{DateTime, Utc};
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn fixed_now() -> Timestamp {
        Timestamp::from_datetime(
            DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    fn full_event() -> LifecycleEvent {
        LifecycleEvent {
            user: EventUser {
                user_id: Some("auth0|123".into()),
                email: Some("a@x.com".into()),
                name: Some("Alice".into()),
                email_verified: Some(true),
                picture: Some("https://cdn.example.com/a.png".into()),
                created_at: Some("2024-01-01T00:00:00.000Z".into()),
                updated_at: Some("2024-02-01T00:00:00.000Z".into()),
                family_name: Some("Liddell".into()),
                given_name: Some("Alice".into()),
                locale: Some("en".into()),
                ..Default::default()
            },
            connection: EventConnection {
                name: Some("google-oauth2".into()),
                strategy: Some("google-oauth2".into()),
            },
            request: EventRequest {
                ip: Some("203.0.113.9".into()),
                headers: HashMap::from([("user-agent".into(), "Mozilla/5.0".into())]),
                query: Some(json!({ "prompt": "login" })),
                body: None,
            },
            transaction: Some(EventTransaction {
                id: Some("txn_42".into()),
                protocol: Some("oidc-basic-profile".into()),
                requested_scopes: Some(vec!["openid".into(), "email".into()]),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn login_payload_matches_wire_shape() {
        let payload = OutboundPayload::for_login(&full_event(), fixed_now());
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            json,
            json!({
                "user": {
                    "user_id": "auth0|123",
                    "email": "a@x.com",
                    "name": "Alice",
                    "email_verified": true,
                    "picture": "https://cdn.example.com/a.png",
                    "created_at": "2024-01-01T00:00:00.000Z",
                    "updated_at": "2024-02-01T00:00:00.000Z"
                },
                "connection": { "name": "google-oauth2", "strategy": "google-oauth2" },
                "request": {
                    "ip": "203.0.113.9",
                    "user_agent": "Mozilla/5.0",
                    "query": { "prompt": "login" }
                },
                "transaction": {
                    "transaction_id": "txn_42",
                    "protocol": "oidc-basic-profile",
                    "requested_scopes": ["openid", "email"]
                },
                "timestamp": "2024-03-01T12:00:00.000Z",
                "event_type": "user_login"
            })
        );
    }

    #[test]
    fn signup_payload_has_profile_fields_and_no_transaction() {
        let payload = OutboundPayload::for_signup(&full_event(), fixed_now());
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["event_type"], "user_signup");
        assert_eq!(json["user"]["family_name"], "Liddell");
        assert_eq!(json["user"]["given_name"], "Alice");
        assert_eq!(json["user"]["locale"], "en");
        assert!(json["user"].get("updated_at").is_none());
        assert!(json.get("transaction").is_none());
    }

    #[test]
    fn name_falls_back_to_nickname() {
        let event = LifecycleEvent {
            user: EventUser {
                nickname: Some("bob".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let payload = OutboundPayload::for_signup(&event, fixed_now());
        assert_eq!(payload.user.name.as_deref(), Some("bob"));
    }

    #[test]
    fn empty_event_builds_without_fabricating_fields() {
        let payload = OutboundPayload::for_login(&LifecycleEvent::default(), fixed_now());
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["user"], json!({}));
        assert_eq!(json["connection"], json!({}));
        assert_eq!(json["request"], json!({}));
        assert_eq!(json["transaction"], json!({}));
        assert_eq!(json["timestamp"], "2024-03-01T12:00:00.000Z");
    }

    #[test]
    fn build_dispatches_on_action() {
        let event = full_event();
        assert_eq!(
            OutboundPayload::build(LifecycleAction::PostLogin, &event, fixed_now()),
            OutboundPayload::for_login(&event, fixed_now())
        );
        assert_eq!(
            OutboundPayload::build(LifecycleAction::PostUserRegistration, &event, fixed_now())
                .event_type,
            "user_signup"
        );
    }

    fn action_strategy() -> impl Strategy<Value = LifecycleAction> {
        prop_oneof![
            Just(LifecycleAction::PostLogin),
            Just(LifecycleAction::PostUserRegistration),
        ]
    }

    proptest! {
        #[test]
        fn payload_is_tagged_and_timestamped(
            action in action_strategy(),
            email in proptest::option::of("[a-z]{1,8}@[a-z]{1,8}\\.com"),
            name in proptest::option::of("[A-Za-z ]{1,16}"),
            ip in proptest::option::of("[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}"),
            with_transaction in any::<bool>(),
        ) {
            let event = LifecycleEvent {
                user: EventUser { email: email.clone(), name, ..Default::default() },
                request: EventRequest { ip: ip.clone(), ..Default::default() },
                transaction: with_transaction.then(|| EventTransaction {
                    id: Some("txn".into()),
                    ..Default::default()
                }),
                ..Default::default()
            };

            let payload = OutboundPayload::build(action, &event, Timestamp::now());
            let json = serde_json::to_value(&payload).unwrap();

            prop_assert_eq!(json["event_type"].as_str(), Some(action.event_type()));
            let ts = json["timestamp"].as_str().unwrap();
            prop_assert!(DateTime::parse_from_rfc3339(ts).is_ok());
            prop_assert!(ts.ends_with('Z'));
            prop_assert_eq!(payload.user.email, email);
            prop_assert_eq!(payload.request.ip, ip);
        }
    }
}
