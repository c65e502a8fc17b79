//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the handlers to external systems:
//! - `webhook` - outbound delivery (reqwest, mock)
//! - `user_record` - user metadata store (in-memory)

pub mod user_record;
pub mod webhook;

pub use user_record::InMemoryUserRecord;
pub use webhook::{HttpEventDispatcher, MockEventDispatcher};
