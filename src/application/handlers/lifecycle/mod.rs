//! Lifecycle handlers - Forward identity-provider triggers to the backend.
//!
//! - `PostLoginHandler` - login payload, then `login_info` bookkeeping
//! - `PostUserRegistrationHandler` - signup payload, `user_info` and the welcome flag
//! - `LifecycleRelay` - host-facing entry points that absorb every failure

mod context;
mod errors;
mod failure_absorber;
mod metadata_writer;
mod post_login;
mod post_user_registration;
mod relay;

pub use errors::{ForwardError, ForwardFailure};
pub use failure_absorber::InvocationOutcome;
pub use post_login::{PostLoginHandler, PostLoginResult};
pub use post_user_registration::{PostUserRegistrationHandler, PostUserRegistrationResult};
pub use relay::LifecycleRelay;
