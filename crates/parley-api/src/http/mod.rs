//! HTTP/REST API layer for Parley.
//!
//! Axum-based REST API at `/api/v1/` exposing the five session operations,
//! with envelope response format and CORS support.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
