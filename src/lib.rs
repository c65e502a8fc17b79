//! Identity Event Relay - Forwards identity-provider lifecycle events
//!
//! This crate relays post-login and post-user-registration triggers to a
//! backend webhook and records login/signup bookkeeping on the user. Relay
//! failures are logged and absorbed so authentication is never blocked.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
