//! Settings infrastructure for sitepages.
//!
//! Holds the TTL cache with single-flight fetching, the clock abstraction it
//! runs on, the settings sources, and the `SettingsAccessor` that the page
//! layer reads the site settings through.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod prelude;
pub mod settings;

pub use settings::accessor::{SITE_SETTINGS_KEY, SettingsAccessor};
pub use settings::cache::{CacheOptions, CacheStats, RevalidateMode, SettingsCache};
pub use settings::clock::{Clock, ManualClock, SystemClock};
pub use settings::fetcher::{
	FileSettingsFetcher, HttpSettingsFetcher, MAX_SETTINGS_BODY_SIZE, SettingsFetcher,
	StaticSettingsFetcher,
};

// vim: ts=4
