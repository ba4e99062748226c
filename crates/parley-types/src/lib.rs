//! Shared domain types for Parley.
//!
//! Sessions, daily statistics counters, the request/response payloads of the
//! five session operations, configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod stats;
