//! Infrastructure layer for Parley.
//!
//! Contains implementations of the repository traits defined in `parley-core`
//! (SQLite document store) and configuration loading.

pub mod config;
pub mod sqlite;
