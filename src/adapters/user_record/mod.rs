//! User record adapters.
//!
//! - `InMemoryUserRecord` - map-backed `UserRecordApi` with write log and
//!   failure injection, used by tests and local runs.

mod in_memory;

pub use in_memory::InMemoryUserRecord;
