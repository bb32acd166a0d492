//! Request signer: the `Authorization` header and bewit-signed-URL entry points, plus the `ext`
//! field encoding both consult.

// self
use crate::{
	_prelude::*,
	adapters::{Clock, SeedSource},
	credential::Credential,
	hawk,
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
};

/// The two header values a caller must attach to an outgoing request: the Hawk `Authorization`
/// header, and the `Content-Type` the Hawk payload hash was computed against (`None` when the
/// payload is empty, matching §8 scenario 6).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedHeaders {
	/// The complete `Authorization` header value.
	pub authorization: String,
	/// `Some("application/json")` iff the payload was nonempty; `None` otherwise.
	pub content_type: Option<&'static str>,
}

/// Builds the `ext` field: a base64-standard-encoded JSON object carrying the certificate (for
/// temporary credentials) and/or the authorized-scopes restriction, with `certificate` ordered
/// before `authorizedScopes` when both are present. A result that would serialize to `{}`
/// collapses to the empty string instead (§4.C4).
///
/// `serde_json::Map`'s default backing is a `BTreeMap`, which would alphabetize
/// `authorizedScopes` ahead of `certificate` — the wrong order — so the object is assembled as a
/// string directly rather than through a generic JSON value.
pub fn ext_field(credential: &Credential) -> Result<String> {
	let mut parts = Vec::new();

	if let Some(certificate_json) = credential.certificate_json() {
		parts.push(format!("\"certificate\":{certificate_json}"));
	}
	if let Some(scopes) = credential.authorized_scopes() {
		let encoded =
			serde_json::to_string(scopes).map_err(|source| Error::SerializationFailure { source })?;

		parts.push(format!("\"authorizedScopes\":{encoded}"));
	}

	if parts.is_empty() {
		return Ok(String::new());
	}

	Ok(hawk::b64_std(format!("{{{}}}", parts.join(",")).as_bytes()))
}

/// Produces the complete `Authorization` header value for a Hawk request.
///
/// The outgoing `Content-Type` is `application/json` iff `payload` is nonempty; this is
/// observable via [`SignedHeaders::content_type`].
pub fn signed_header(
	credential: &Credential,
	method: &str,
	url: &Url,
	payload: &[u8],
	clock: &dyn Clock,
	seeds: &dyn SeedSource,
) -> Result<SignedHeaders> {
	const KIND: OperationKind = OperationKind::SignHeader;

	let _span = OperationSpan::new(KIND, "signed_header").entered();

	obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

	let result = (|| {
		let ext = ext_field(credential)?;
		let ts = clock.now().unix_timestamp();
		let nonce = seeds.nonce();
		let key_pair = credential.hawk_key_pair();
		let content_type = if payload.is_empty() { None } else { Some("application/json") };
		let authorization =
			hawk::header_value(&key_pair, method, url, content_type, payload, &ext, ts, &nonce);

		Ok(SignedHeaders { authorization, content_type })
	})();

	obs::record_operation_outcome(
		KIND,
		if result.is_ok() { OperationOutcome::Success } else { OperationOutcome::Failure },
	);

	result
}

/// Produces a GET-only bewit-signed URL valid for `duration` from now, appending `bewit=<value>`
/// to the URL's existing query string.
pub fn signed_url(
	credential: &Credential,
	url: &Url,
	duration: Duration,
	clock: &dyn Clock,
) -> Result<Url> {
	const KIND: OperationKind = OperationKind::SignUrl;

	let _span = OperationSpan::new(KIND, "signed_url").entered();

	obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

	let result = (|| {
		let ext = ext_field(credential)?;
		let exp = (clock.now() + duration).unix_timestamp();
		let key_pair = credential.hawk_key_pair();
		let bewit = hawk::bewit_value(&key_pair, url, exp, &ext);
		let mut signed = url.clone();

		signed.query_pairs_mut().append_pair("bewit", &bewit);

		Ok(signed)
	})();

	obs::record_operation_outcome(
		KIND,
		if result.is_ok() { OperationOutcome::Success } else { OperationOutcome::Failure },
	);

	result
}
