//! HTTP request handlers for the REST API.

pub mod session;
pub mod stats;
