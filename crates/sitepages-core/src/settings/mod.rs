//! Site settings subsystem
//!
//! # Architecture
//!
//! - **Clock** (`clock.rs`): time source, swappable in tests
//! - **Cache** (`cache.rs`): TTL cache with single-flight fetching
//! - **Fetcher** (`fetcher.rs`): settings sources (HTTP, file, static)
//! - **Accessor** (`accessor.rs`): the site settings read path used by pages

pub mod accessor;
pub mod cache;
pub mod clock;
pub mod fetcher;

// vim: ts=4
