//! sitepages is a small server-rendered site shell.
//!
//! # Features
//!
//! - Legal document pages (terms, privacy) whose text is configured in the
//!   site settings, with built-in fallbacks
//! - Favourites page, also served under the account area
//! - Site settings read through a TTL cache with single-flight fetching
//! - Handlebars templates, overridable from a directory
//! - `datetime-local` form control, usable from templates

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub use sitepages_core as core;
pub use sitepages_types::error;
pub use sitepages_types::types;

pub mod app;
pub mod form;
pub mod pages;
pub mod prelude;
pub mod routes;
pub mod templates;

pub use crate::app::{App, AppBuilder, AppBuilderOpts, AppState};

// vim: ts=4
