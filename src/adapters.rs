//! Minimal contracts the signing core depends on but does not itself implement: a clock, a
//! random-seed source, an HTTP send interface, a logger, and a metrics sink. Callers supply
//! concrete implementations; the core only needs them to exist.

// self
use crate::_prelude::*;

/// A source of the current time, injectable so tests can control clock skew and expiry.
pub trait Clock: Send + Sync {
	/// Returns the current instant.
	fn now(&self) -> OffsetDateTime;
}

/// A [`Clock`] backed by the system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// A [`Clock`] test double that holds a settable, fixed instant.
#[derive(Debug)]
pub struct FixedClock(RwLock<OffsetDateTime>);
impl FixedClock {
	/// Creates a fixed clock starting at `at`.
	pub fn new(at: OffsetDateTime) -> Self {
		Self(RwLock::new(at))
	}

	/// Advances (or rewinds) the clock to `at`.
	pub fn set(&self, at: OffsetDateTime) {
		*self.0.write() = at;
	}

	/// Advances the clock forward by `delta`.
	pub fn advance(&self, delta: Duration) {
		let mut guard = self.0.write();

		*guard += delta;
	}
}
impl Clock for FixedClock {
	fn now(&self) -> OffsetDateTime {
		*self.0.read()
	}
}

fn random_slug() -> String {
	use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

	URL_SAFE_NO_PAD.encode(uuid::Uuid::new_v4().as_bytes())
}

/// A source of high-entropy, URL-safe random identifiers.
///
/// Both certificate seeds and Hawk nonces are 22-character URL-safe slugs, the same encoding
/// `slugid`-style libraries use for a 128-bit UUID: a certificate seed is two such slugs
/// concatenated (44 characters total).
pub trait SeedSource: Send + Sync {
	/// Produces a fresh 44-character certificate seed (two concatenated 22-character slugs).
	fn seed(&self) -> String;
	/// Produces a fresh 22-character slug suitable for a Hawk nonce.
	fn nonce(&self) -> String;
}

/// The default [`SeedSource`], backed by [`uuid::Uuid::new_v4`].
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidSeedSource;
impl SeedSource for UuidSeedSource {
	fn seed(&self) -> String {
		format!("{}{}", random_slug(), random_slug())
	}

	fn nonce(&self) -> String {
		random_slug()
	}
}

/// A minimal HTTP send interface used by higher layers built on top of this core.
///
/// The core never composes retries, timeouts, or service-URL resolution on top of this trait —
/// those remain the caller's responsibility; the core only needs a send operation to exist so
/// that an [`crate::authorizer::Authorizer`] can be exercised end to end by its owner.
pub trait RequestTransport {
	/// The request type this transport accepts.
	type Request;
	/// The response type this transport returns on success.
	type Response;
	/// The error type this transport returns on failure.
	type Error;

	/// Sends `request` and returns its response.
	fn send(&self, request: Self::Request) -> std::result::Result<Self::Response, Self::Error>;
}

/// A logger with a single line-print operation.
pub trait Logger: Send + Sync {
	/// Emits a single log line.
	fn line(&self, message: &str);
}

/// The default [`Logger`], backed by `tracing` when the `tracing` feature is enabled and a
/// no-op otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;
impl Logger for TracingLogger {
	fn line(&self, message: &str) {
		#[cfg(feature = "tracing")]
		{
			tracing::info!(message);
		}

		#[cfg(not(feature = "tracing"))]
		{
			let _ = message;
		}
	}
}

/// A metrics sink with counters and measures, following the ambient metrics contract used
/// throughout the rest of the service.
pub trait MetricsSink: Send + Sync {
	/// Records a counter observation.
	fn count(&self, name: &str, value: f64);
	/// Records a distribution observation.
	fn measure(&self, name: &str, values: &[f64]);
}

const FLUSH_INTERVAL: std::time::Duration = std::time::Duration::from_secs(30);

struct MetricsState {
	counters: std::collections::HashMap<String, f64>,
	measures: std::collections::HashMap<String, Vec<f64>>,
	/// Bumped every time a timer is (re)armed or a flush runs; a sleeping background timer
	/// compares its captured generation against the current one before acting, so a flush that
	/// already ran (manually or via an earlier timer) makes a stale wakeup a no-op instead of
	/// requiring the sleeping thread to be cancelled outright.
	generation: u64,
	timer_armed: bool,
}
impl Default for MetricsState {
	fn default() -> Self {
		Self {
			counters: std::collections::HashMap::new(),
			measures: std::collections::HashMap::new(),
			generation: 0,
			timer_armed: false,
		}
	}
}

/// The default [`MetricsSink`]: batches counters and measures into two maps, flushed every 30
/// seconds (or on an explicit [`BatchingMetricsSink::flush`] call) through a supplied [`Logger`].
///
/// One mutex guards the counters map, the measures map, and the timer-armed flag together;
/// `flush` takes the mutex only long enough to swap the maps out into locals and reset the timer
/// state, then releases it before printing, so a slow logger never blocks concurrent recorders.
pub struct BatchingMetricsSink<L> {
	logger: L,
	state: Mutex<MetricsState>,
}
impl<L> BatchingMetricsSink<L>
where
	L: Logger + Clone + Send + Sync + 'static,
{
	/// Creates a new sink, ready to accumulate observations, wrapped in an [`Arc`] so the
	/// background flush timer can hold a strong reference to it.
	pub fn new(logger: L) -> Arc<Self> {
		Arc::new(Self { logger, state: Mutex::new(MetricsState::default()) })
	}

	fn arm_timer(self_arc: &Arc<Self>) {
		let generation = {
			let mut state = self_arc.state.lock();

			if state.timer_armed {
				return;
			}

			state.timer_armed = true;
			state.generation += 1;
			state.generation
		};
		let weak = Arc::downgrade(self_arc);

		std::thread::spawn(move || {
			std::thread::sleep(FLUSH_INTERVAL);

			if let Some(sink) = weak.upgrade() {
				sink.flush_if_current(generation);
			}
		});
	}

	fn flush_if_current(&self, expected_generation: u64) {
		if let Some((counters, measures)) = self.drain(Some(expected_generation)) {
			self.log_drained(counters, measures);
		}
	}

	/// Flushes any pending counters and measures immediately, logging one line per counter and
	/// one line per measure (median of the sorted observations).
	pub fn flush(&self) {
		if let Some((counters, measures)) = self.drain(None) {
			self.log_drained(counters, measures);
		}
	}

	/// Swaps the counters and measures maps out under the lock and resets the timer state,
	/// returning `None` without the swap if a background timer's generation is stale (i.e. an
	/// intervening flush already ran). Never holds the lock while logging.
	fn drain(
		&self,
		expected_generation: Option<u64>,
	) -> Option<(std::collections::HashMap<String, f64>, std::collections::HashMap<String, Vec<f64>>)>
	{
		let mut state = self.state.lock();

		if let Some(expected) = expected_generation {
			if !state.timer_armed || state.generation != expected {
				return None;
			}
		}

		let counters = std::mem::take(&mut state.counters);
		let measures = std::mem::take(&mut state.measures);

		state.timer_armed = false;
		state.generation += 1;

		Some((counters, measures))
	}

	fn log_drained(
		&self,
		counters: std::collections::HashMap<String, f64>,
		measures: std::collections::HashMap<String, Vec<f64>>,
	) {
		for (name, value) in counters {
			self.logger.line(&format!("Counter: {name} = {value}"));
		}

		for (name, mut values) in measures {
			values.sort_by(|a, b| a.partial_cmp(b).expect("metric values must not be NaN"));

			let median = values[values.len() / 2];

			self.logger.line(&format!("Measure: {name} median={median}"));
		}
	}
}
impl<L> MetricsSink for Arc<BatchingMetricsSink<L>>
where
	L: Logger + Clone + Send + Sync + 'static,
{
	fn count(&self, name: &str, value: f64) {
		{
			let mut state = self.state.lock();

			*state.counters.entry(name.to_string()).or_insert(0.0) += value;
		}

		Self::arm_timer(self);
	}

	fn measure(&self, name: &str, values: &[f64]) {
		{
			let mut state = self.state.lock();

			state.measures.entry(name.to_string()).or_insert_with(Vec::new).extend_from_slice(values);
		}

		Self::arm_timer(self);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Clone, Default)]
	struct RecordingLogger(Arc<Mutex<Vec<String>>>);
	impl Logger for RecordingLogger {
		fn line(&self, message: &str) {
			self.0.lock().push(message.to_string());
		}
	}

	#[test]
	fn random_slug_is_22_chars_and_seed_is_44() {
		let seeds = UuidSeedSource;

		assert_eq!(seeds.nonce().len(), 22);
		assert_eq!(seeds.seed().len(), 44);
	}

	#[test]
	fn fixed_clock_advances() {
		let start = time::macros::datetime!(2026-01-01 00:00 UTC);
		let clock = FixedClock::new(start);

		assert_eq!(clock.now(), start);

		clock.advance(Duration::minutes(5));

		assert_eq!(clock.now(), start + Duration::minutes(5));
	}

	#[test]
	fn flush_emits_counter_and_median_measure_lines() {
		let logger = RecordingLogger::default();
		let sink = BatchingMetricsSink::new(logger.clone());

		sink.count("calls", 1.0);
		sink.count("calls", 2.0);
		sink.measure("latency", &[3.0, 1.0, 2.0]);
		sink.flush();

		let lines = logger.0.lock().clone();

		assert!(lines.iter().any(|l| l == "Counter: calls = 3"));
		assert!(lines.iter().any(|l| l.starts_with("Measure: latency median=2")));
	}

	#[test]
	fn flush_with_nothing_recorded_emits_nothing() {
		let logger = RecordingLogger::default();
		let sink = BatchingMetricsSink::new(logger.clone());

		sink.flush();

		assert!(logger.0.lock().is_empty());
	}
}
