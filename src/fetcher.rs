//! Single-flight, double-checked-lock credential cache. Backs [`crate::authorizer::FetchingAuthorizer`]
//! so a short-lived temporary credential is fetched once per expiry window, irrespective of how
//! many parallel threads ask for the current credential concurrently.
//!
//! The double-checked lock here deliberately does not reproduce the upstream fetcher's
//! check-then-act race: the second check happens under the *write* lock, and the fetch itself is
//! performed while still holding that write lock, so a concurrent caller blocked on the write lock
//! always observes a fresh entry once it acquires the lock rather than racing a second fetch.

// self
use crate::{
	_prelude::*,
	adapters::Clock,
	credential::Credential,
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
};

/// Refetch this far ahead of a temporary credential's actual expiry, so a fetch in flight never
/// hands out a credential that expires mid-request.
const REFRESH_MARGIN: Duration = Duration::minutes(5);

struct CacheEntry {
	result: std::result::Result<Credential, Arc<Error>>,
	expiration: Option<OffsetDateTime>,
}
impl CacheEntry {
	fn is_fresh(&self, now: OffsetDateTime) -> bool {
		if self.result.is_err() {
			return false;
		}

		match self.expiration {
			None => true,
			Some(expiration) => now + REFRESH_MARGIN < expiration,
		}
	}
}

/// A cache that calls `fetch` at most once per expiry window, sharing the fetched credential (or
/// the fetch's error) across every concurrent caller.
pub struct FetcherCache {
	fetch: Box<dyn Fn() -> Result<Credential> + Send + Sync>,
	clock: Arc<dyn Clock>,
	state: RwLock<Option<CacheEntry>>,
}
impl FetcherCache {
	/// Builds a cache around `fetch`, a caller-supplied function that performs one synchronous
	/// fetch of a fresh temporary credential (typically an HTTP call to an `awsCredentials` or
	/// equivalent route).
	pub fn new(
		fetch: impl Fn() -> Result<Credential> + Send + Sync + 'static,
		clock: Arc<dyn Clock>,
	) -> Self {
		Self { fetch: Box::new(fetch), clock, state: RwLock::new(None) }
	}

	/// Returns the currently cached credential, fetching a fresh one if none is cached or the
	/// cached entry has fallen within [`REFRESH_MARGIN`] of its expiry.
	///
	/// A cached fetch error is returned to every caller until the next fetch attempt succeeds; it
	/// is never treated as fresh, so every subsequent call retries the fetch.
	pub fn current(&self) -> std::result::Result<Credential, Arc<Error>> {
		let now = self.clock.now();

		if let Some(entry) = self.state.read().as_ref() {
			if entry.is_fresh(now) {
				return entry.result.clone();
			}
		}

		let mut state = self.state.write();

		if let Some(entry) = state.as_ref() {
			if entry.is_fresh(now) {
				return entry.result.clone();
			}
		}

		const KIND: OperationKind = OperationKind::Fetch;

		let _span = OperationSpan::new(KIND, "current").entered();

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = (self.fetch)().map_err(Arc::new);

		obs::record_operation_outcome(
			KIND,
			if result.is_ok() { OperationOutcome::Success } else { OperationOutcome::Failure },
		);

		let expiration = result.as_ref().ok().and_then(Credential::expiration);

		*state = Some(CacheEntry { result: result.clone(), expiration });

		result
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;
	use crate::{
		adapters::FixedClock,
		credential::{AccessTokenSecret, PermanentCredential, TemporaryCredential},
	};

	fn temp_credential(expiry_millis_from_epoch: i64) -> Credential {
		let cert = crate::cert::Certificate {
			version: 1,
			scopes: vec![],
			start: 0,
			expiry: expiry_millis_from_epoch,
			seed: "seed".to_string(),
			signature: String::new(),
			issuer: None,
		};

		Credential::Temporary(TemporaryCredential {
			client_id: "temp".to_string(),
			access_token: AccessTokenSecret::new("token"),
			certificate_json: serde_json::to_string(&cert).unwrap(),
			authorized_scopes: None,
		})
	}

	#[test]
	fn fetches_once_then_serves_cached_result() {
		let calls = AtomicUsize::new(0);
		let clock: Arc<dyn Clock> =
			Arc::new(FixedClock::new(time::macros::datetime!(2026-01-01 00:00 UTC)));
		let cache = FetcherCache::new(
			|| {
				calls.fetch_add(1, Ordering::SeqCst);
				Ok(temp_credential(9_999_999_999_999))
			},
			clock,
		);

		cache.current().expect("first fetch should succeed");
		cache.current().expect("second call should hit the cache");

		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn refetches_once_the_cached_entry_falls_within_the_refresh_margin() {
		let calls = AtomicUsize::new(0);
		let clock = Arc::new(FixedClock::new(time::macros::datetime!(2026-01-01 00:00 UTC)));
		let clock_dyn: Arc<dyn Clock> = clock.clone();
		let cache = FetcherCache::new(
			|| {
				calls.fetch_add(1, Ordering::SeqCst);

				let now = time::macros::datetime!(2026-01-01 00:00 UTC);
				let expiry = (now + Duration::minutes(10)).unix_timestamp() * 1000;

				Ok(temp_credential(expiry))
			},
			clock_dyn,
		);

		cache.current().expect("first fetch should succeed");

		clock.advance(Duration::minutes(6));
		cache.current().expect("refetch should succeed");

		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[test]
	fn a_cached_error_is_retried_on_the_next_call() {
		let calls = AtomicUsize::new(0);
		let clock: Arc<dyn Clock> =
			Arc::new(FixedClock::new(time::macros::datetime!(2026-01-01 00:00 UTC)));
		let cache = FetcherCache::new(
			|| {
				let n = calls.fetch_add(1, Ordering::SeqCst);

				if n == 0 {
					Err(Error::NonPermanentSource)
				} else {
					Ok(temp_credential(9_999_999_999_999))
				}
			},
			clock,
		);

		assert!(cache.current().is_err());
		assert!(cache.current().is_ok());
		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	// Single-flight guarantee under genuine thread parallelism, per the scheduling model: no
	// cooperative scheduling is assumed, so this spawns real OS threads rather than a task runtime.
	#[test]
	fn concurrent_callers_observe_a_single_fetch() {
		let calls = Arc::new(AtomicUsize::new(0));
		let clock: Arc<dyn Clock> =
			Arc::new(FixedClock::new(time::macros::datetime!(2026-01-01 00:00 UTC)));
		let cache = Arc::new(FetcherCache::new(
			{
				let calls = calls.clone();

				move || {
					calls.fetch_add(1, Ordering::SeqCst);
					std::thread::sleep(std::time::Duration::from_millis(20));

					Ok(temp_credential(9_999_999_999_999))
				}
			},
			clock,
		));
		let handles: Vec<_> = (0..8)
			.map(|_| {
				let cache = cache.clone();

				std::thread::spawn(move || cache.current().expect("fetch should succeed"))
			})
			.collect();

		for handle in handles {
			handle.join().expect("worker thread should not panic");
		}

		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}
}
