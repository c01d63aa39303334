//! Shared types and error definitions for sitepages.
//!
//! Kept in a separate crate so the settings core and the web layer agree on
//! the shape of the settings record and on a single error type.

pub mod error;
pub mod prelude;
pub mod types;

// vim: ts=4
