//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the lifecycle handlers and the outside world. Adapters implement these
//! ports.
//!
//! - `EventDispatcher` - single outbound delivery of a payload
//! - `UserRecordApi` - metadata writes against the host's user record

mod event_dispatcher;
mod user_record;

pub use event_dispatcher::{
    DispatchError, DispatchReceipt, DispatchRequest, EventDispatcher, DISPATCH_TIMEOUT,
};
pub use user_record::{MetadataWriteError, UserRecordApi};
