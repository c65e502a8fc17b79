//! Domain layer - event shapes and pure transformations.
//!
//! Nothing in here performs I/O; the application layer wires these types to
//! the ports.

pub mod foundation;
pub mod lifecycle;
