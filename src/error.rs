//! Error types shared across the credential, signing, and fetcher-cache surfaces.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public operations.
#[derive(Debug, ThisError)]
pub enum Error {
	/// A temporary-credential mint was requested with a duration exceeding the 31-day limit.
	#[error("Requested temporary-credential duration {requested} exceeds the 31-day limit.")]
	InvalidDuration {
		/// The duration that was rejected.
		requested: Duration,
	},
	/// Mint was attempted from a credential missing `client_id` or `access_token`.
	#[error("Cannot mint a temporary credential: {field} is empty.")]
	EmptyCredential {
		/// Name of the missing field.
		field: &'static str,
	},
	/// Mint was attempted from a temporary credential rather than a permanent one.
	#[error("Temporary credentials cannot mint further temporary credentials.")]
	NonPermanentSource,
	/// Certificate JSON could not be parsed when required.
	#[error("Certificate text could not be parsed as JSON.")]
	MalformedCertificate {
		/// Underlying JSON parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// A value that is expected to always serialize failed to do so.
	#[error("Failed to serialize an internal value that should always serialize.")]
	SerializationFailure {
		/// Underlying JSON serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// The fetch function supplied to a fetcher cache returned an error.
	#[error("Credential fetch failed: {message}.")]
	FetchFailure {
		/// Human-readable summary of the failure, as reported by the fetch function.
		message: String,
		/// Underlying error reported by the fetch function, if it carries one.
		#[source]
		source: Option<Box<dyn std::error::Error + Send + Sync>>,
	},
	/// A base URL and route did not combine into a valid URL.
	#[error("Could not build a valid URL from base `{base}`.")]
	UrlParseFailure {
		/// The base URL that was being extended.
		base: String,
		/// Underlying parse failure.
		#[source]
		source: url::ParseError,
	},
}
