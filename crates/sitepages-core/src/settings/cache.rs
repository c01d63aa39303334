//! TTL cache with single-flight fetching
//!
//! Each key holds at most one cached value and at most one fetch in flight.
//! Callers that miss while a fetch is running await the same shared result
//! instead of starting their own. The fetch runs as its own task, so a caller
//! that stops waiting does not cancel it, and the task writes the cache itself
//! once the value arrives.
//!
//! Failed fetches are never cached: the previous value (if any) stays in place
//! and the next read starts a new fetch.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use super::clock::{Clock, SystemClock};
use crate::prelude::*;

/// Freshness window of a cached value
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// The key space is a handful of constants
const DEFAULT_CAPACITY: usize = 16;

/// What a read does once the cached value is older than the TTL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevalidateMode {
	/// Return the stale value at once and refresh it in the background
	#[default]
	StaleWhileRevalidate,
	/// Wait for the refetch, like an empty cache
	Blocking,
}

impl std::str::FromStr for RevalidateMode {
	type Err = Error;

	fn from_str(s: &str) -> ClResult<Self> {
		match s.trim().to_ascii_lowercase().as_str() {
			"swr" | "stale-while-revalidate" => Ok(Self::StaleWhileRevalidate),
			"blocking" | "block" => Ok(Self::Blocking),
			other => Err(Error::ConfigError(format!("Unknown revalidate mode: {}", other))),
		}
	}
}

#[derive(Debug, Clone)]
pub struct CacheOptions {
	pub ttl: Duration,
	pub mode: RevalidateMode,
	pub capacity: usize,
}

impl Default for CacheOptions {
	fn default() -> Self {
		Self { ttl: DEFAULT_TTL, mode: RevalidateMode::default(), capacity: DEFAULT_CAPACITY }
	}
}

/// Snapshot of the cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
	/// Reads answered from a fresh value
	pub hits: u64,
	/// Reads answered from an expired value (stale-while-revalidate only)
	pub stale_hits: u64,
	/// Reads that had to wait for a fetch
	pub misses: u64,
	/// Fetches started
	pub fetches: u64,
	/// Fetches that failed
	pub failures: u64,
}

#[derive(Debug, Default)]
struct Counters {
	hits: AtomicU64,
	stale_hits: AtomicU64,
	misses: AtomicU64,
	fetches: AtomicU64,
	failures: AtomicU64,
}

type FetchFuture<V> = Shared<BoxFuture<'static, ClResult<Arc<V>>>>;

struct Entry<V> {
	value: Arc<V>,
	fetched_at: Instant,
}

struct Slot<V> {
	entry: Option<Entry<V>>,
	in_flight: Option<FetchFuture<V>>,
}

impl<V> Default for Slot<V> {
	fn default() -> Self {
		Self { entry: None, in_flight: None }
	}
}

type Slots<V> = Arc<Mutex<LruCache<String, Slot<V>>>>;

enum Lookup<V> {
	Ready(Arc<V>),
	Wait(FetchFuture<V>),
}

pub struct SettingsCache<V> {
	slots: Slots<V>,
	clock: Arc<dyn Clock>,
	opts: CacheOptions,
	counters: Arc<Counters>,
}

impl<V: Send + Sync + 'static> SettingsCache<V> {
	pub fn new(opts: CacheOptions) -> Self {
		Self::with_clock(opts, Arc::new(SystemClock))
	}

	pub fn with_clock(opts: CacheOptions, clock: Arc<dyn Clock>) -> Self {
		let capacity = NonZeroUsize::new(opts.capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
		Self {
			slots: Arc::new(Mutex::new(LruCache::new(capacity))),
			clock,
			opts,
			counters: Arc::new(Counters::default()),
		}
	}

	/// Read `key`, calling `fetch` only if no usable value is cached and no
	/// fetch is already running
	///
	/// `fetch` is invoked with the cache lock held, so it must only build the
	/// future, not do any work itself.
	pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> ClResult<Arc<V>>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = ClResult<V>> + Send + 'static,
	{
		match self.lookup(key, fetch) {
			Lookup::Ready(value) => Ok(value),
			Lookup::Wait(waiter) => waiter.await,
		}
	}

	/// Like [`get_or_fetch`](Self::get_or_fetch), but gives up with
	/// `Error::Cancelled` once `cancel` fires
	///
	/// The fetch itself keeps running and still fills the cache.
	pub async fn get_or_fetch_cancellable<F, Fut>(
		&self,
		key: &str,
		fetch: F,
		cancel: &CancellationToken,
	) -> ClResult<Arc<V>>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = ClResult<V>> + Send + 'static,
	{
		if cancel.is_cancelled() {
			return Err(Error::Cancelled);
		}
		let waiter = match self.lookup(key, fetch) {
			Lookup::Ready(value) => return Ok(value),
			Lookup::Wait(waiter) => waiter,
		};
		tokio::select! {
			biased;
			() = cancel.cancelled() => {
				debug!("Read of '{}' cancelled while fetch in flight", key);
				Err(Error::Cancelled)
			}
			result = waiter => result,
		}
	}

	/// Cached value regardless of age, without fetching
	pub fn peek(&self, key: &str) -> Option<Arc<V>> {
		let mut slots = self.slots.lock();
		slots.get(key).and_then(|slot| slot.entry.as_ref()).map(|entry| Arc::clone(&entry.value))
	}

	/// Drop the cached value for `key`; a running fetch is left alone
	pub fn invalidate(&self, key: &str) {
		let mut slots = self.slots.lock();
		if let Some(slot) = slots.get_mut(key) {
			slot.entry = None;
		}
	}

	pub fn stats(&self) -> CacheStats {
		CacheStats {
			hits: self.counters.hits.load(Ordering::Relaxed),
			stale_hits: self.counters.stale_hits.load(Ordering::Relaxed),
			misses: self.counters.misses.load(Ordering::Relaxed),
			fetches: self.counters.fetches.load(Ordering::Relaxed),
			failures: self.counters.failures.load(Ordering::Relaxed),
		}
	}

	fn lookup<F, Fut>(&self, key: &str, fetch: F) -> Lookup<V>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = ClResult<V>> + Send + 'static,
	{
		let now = self.clock.now();
		let mut slots = self.slots.lock();
		let slot = slots.get_or_insert_mut(key.to_string(), Slot::default);

		if let Some(entry) = &slot.entry {
			if now.saturating_duration_since(entry.fetched_at) < self.opts.ttl {
				self.counters.hits.fetch_add(1, Ordering::Relaxed);
				debug!("Cache hit: {}", key);
				return Lookup::Ready(Arc::clone(&entry.value));
			}
			if self.opts.mode == RevalidateMode::StaleWhileRevalidate {
				self.counters.stale_hits.fetch_add(1, Ordering::Relaxed);
				let value = Arc::clone(&entry.value);
				if slot.in_flight.is_none() {
					debug!("Cache entry '{}' is stale, revalidating in background", key);
					slot.in_flight = Some(self.start_fetch(key, fetch));
				}
				return Lookup::Ready(value);
			}
		}

		self.counters.misses.fetch_add(1, Ordering::Relaxed);
		if let Some(waiter) = &slot.in_flight {
			debug!("Joining in-flight fetch for '{}'", key);
			return Lookup::Wait(waiter.clone());
		}
		let waiter = self.start_fetch(key, fetch);
		slot.in_flight = Some(waiter.clone());
		Lookup::Wait(waiter)
	}

	/// Spawn the fetch task; the caller stores the returned future in the slot
	/// before releasing the lock
	fn start_fetch<F, Fut>(&self, key: &str, fetch: F) -> FetchFuture<V>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = ClResult<V>> + Send + 'static,
	{
		self.counters.fetches.fetch_add(1, Ordering::Relaxed);
		info!("Fetching '{}'", key);

		let fut = fetch();
		let slots = Arc::clone(&self.slots);
		let clock = Arc::clone(&self.clock);
		let counters = Arc::clone(&self.counters);
		let key = key.to_string();

		let task = tokio::spawn(async move {
			let result = match AssertUnwindSafe(fut).catch_unwind().await {
				Ok(result) => result.map(Arc::new),
				Err(_) => Err(Error::Internal(format!("Fetch for '{}' panicked", key))),
			};

			{
				let mut slots = slots.lock();
				let slot = slots.get_or_insert_mut(key.clone(), Slot::default);
				slot.in_flight = None;
				if let Ok(value) = &result {
					slot.entry = Some(Entry { value: Arc::clone(value), fetched_at: clock.now() });
				}
			}

			match &result {
				Ok(_) => debug!("Cached fresh value for '{}'", key),
				Err(e) => {
					counters.failures.fetch_add(1, Ordering::Relaxed);
					warn!("Fetch for '{}' failed: {}", key, e);
				}
			}
			result
		});

		task.map(|joined| {
			joined.unwrap_or_else(|e| Err(Error::Internal(format!("Fetch task aborted: {}", e))))
		})
		.boxed()
		.shared()
	}
}


// vim: ts=4
