//! Time source for cache freshness checks

use parking_lot::Mutex;
use std::time::{Duration, Instant};

pub trait Clock: Send + Sync {
	fn now(&self) -> Instant;
}

/// Monotonic wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> Instant {
		Instant::now()
	}
}

/// Clock that only moves when told to
///
/// Lets tests step over a TTL without sleeping.
#[derive(Debug)]
pub struct ManualClock {
	start: Instant,
	offset: Mutex<Duration>,
}

impl ManualClock {
	pub fn new() -> Self {
		Self { start: Instant::now(), offset: Mutex::new(Duration::ZERO) }
	}

	pub fn advance(&self, by: Duration) {
		let mut offset = self.offset.lock();
		*offset += by;
	}
}

impl Default for ManualClock {
	fn default() -> Self {
		Self::new()
	}
}

impl Clock for ManualClock {
	fn now(&self) -> Instant {
		self.start + *self.offset.lock()
	}
}


// vim: ts=4
