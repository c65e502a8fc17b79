//! Webhook delivery adapters.
//!
//! Implements the `EventDispatcher` port:
//! - `HttpEventDispatcher` - reqwest POST with a hard timeout
//! - `MockEventDispatcher` - scripted responses and call log for tests

mod http_dispatcher;
mod mock_dispatcher;

pub use http_dispatcher::HttpEventDispatcher;
pub use mock_dispatcher::MockEventDispatcher;
