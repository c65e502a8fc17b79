//! Application handlers.
//!
//! Trigger handlers that orchestrate domain operations over the ports.

pub mod lifecycle;

pub use lifecycle::{
    ForwardError, ForwardFailure, InvocationOutcome, LifecycleRelay, PostLoginHandler,
    PostLoginResult, PostUserRegistrationHandler, PostUserRegistrationResult,
};
