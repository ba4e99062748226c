//! Services orchestrating repositories into the session operations.

pub mod session;
pub mod stats;
