//! Foundation module - Shared domain primitives.
//!
//! Contains the value objects that every lifecycle handler relies on.

mod ids;
mod timestamp;

pub use ids::RequestId;
pub use timestamp::Timestamp;
