//! Application layer - Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    ForwardError, ForwardFailure, InvocationOutcome, LifecycleRelay, PostLoginHandler,
    PostLoginResult, PostUserRegistrationHandler, PostUserRegistrationResult,
};
