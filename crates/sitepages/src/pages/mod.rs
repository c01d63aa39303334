//! Page handlers

pub mod account;
pub mod api;
pub mod favourites;
pub mod legal;

pub use legal::LegalDocumentRenderer;

// vim: ts=4
