//! Site settings read path
//!
//! `SettingsAccessor` binds a settings source to a `SettingsCache` under one
//! constant key. Every page reads site settings through it, so concurrent
//! renders share one fetch and repeated renders within the TTL share one value.

use futures::FutureExt;
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::cache::{CacheOptions, CacheStats, SettingsCache};
use super::clock::Clock;
use super::fetcher::SettingsFetcher;
use crate::prelude::*;

/// Cache key of the site settings record
pub const SITE_SETTINGS_KEY: &str = "site-settings";

pub struct SettingsAccessor {
	fetcher: Arc<dyn SettingsFetcher>,
	cache: SettingsCache<SiteSettings>,
}

impl SettingsAccessor {
	pub fn new(fetcher: Arc<dyn SettingsFetcher>, opts: CacheOptions) -> Self {
		Self { fetcher, cache: SettingsCache::new(opts) }
	}

	pub fn with_clock(
		fetcher: Arc<dyn SettingsFetcher>,
		opts: CacheOptions,
		clock: Arc<dyn Clock>,
	) -> Self {
		Self { fetcher, cache: SettingsCache::with_clock(opts, clock) }
	}

	fn fetch_fn(&self) -> impl FnOnce() -> BoxedFetch + use<> {
		let fetcher = Arc::clone(&self.fetcher);
		move || async move { fetcher.fetch().await }.boxed()
	}

	/// Current site settings, fetched on first use and revalidated after the TTL
	pub async fn get_site_settings(&self) -> ClResult<Arc<SiteSettings>> {
		self.cache.get_or_fetch(SITE_SETTINGS_KEY, self.fetch_fn()).await
	}

	/// Same as [`get_site_settings`](Self::get_site_settings), but returns
	/// `Error::Cancelled` as soon as `cancel` fires
	pub async fn get_site_settings_cancellable(
		&self,
		cancel: &CancellationToken,
	) -> ClResult<Arc<SiteSettings>> {
		self.cache.get_or_fetch_cancellable(SITE_SETTINGS_KEY, self.fetch_fn(), cancel).await
	}

	/// Last successfully fetched settings, however old
	pub fn cached(&self) -> Option<Arc<SiteSettings>> {
		self.cache.peek(SITE_SETTINGS_KEY)
	}

	/// Forget the cached record; the next read fetches again
	pub fn invalidate(&self) {
		info!("Site settings invalidated");
		self.cache.invalidate(SITE_SETTINGS_KEY);
	}

	pub fn stats(&self) -> CacheStats {
		self.cache.stats()
	}

	pub fn source(&self) -> String {
		self.fetcher.source()
	}
}

type BoxedFetch = BoxFuture<'static, ClResult<SiteSettings>>;


// vim: ts=4
