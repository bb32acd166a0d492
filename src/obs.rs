//! Optional observability helpers for signing operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `hawk_auth_core.operation` with the
//!   `operation` (kind) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `hawk_auth_core_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Signing-core operation kinds observed for tracing and metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Minting a temporary credential from a permanent one.
	Mint,
	/// Signing a request header.
	SignHeader,
	/// Signing a bewit URL.
	SignUrl,
	/// Fetching a fresh credential through a [`crate::fetcher::FetcherCache`].
	Fetch,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Mint => "mint",
			OperationKind::SignHeader => "sign_header",
			OperationKind::SignUrl => "sign_url",
			OperationKind::Fetch => "fetch",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an instrumented operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
