//! Temporary-credential certificates: building, signing, verifying, and parsing the delegation
//! record that binds a derived temporary access token back to the permanent credential that
//! minted it.

// self
use crate::{
	_prelude::*,
	adapters::{Clock, SeedSource},
	credential::{AccessTokenSecret, PermanentCredential, TemporaryCredential},
	hawk,
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
};

/// The 31-day ceiling on a temporary credential's lifetime.
pub const MAX_DURATION: Duration = Duration::days(31);

/// A temporary-credential delegation record, self-signed against the permanent access token that
/// minted it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
	/// Certificate format version; currently always `1`.
	pub version: u32,
	/// Scopes granted to the certificate itself, independent of any authorized-scopes narrowing.
	pub scopes: Vec<String>,
	/// Start of validity, milliseconds since the Unix epoch.
	pub start: i64,
	/// End of validity, milliseconds since the Unix epoch.
	pub expiry: i64,
	/// Two concatenated 22-character URL-safe slugs; the HMAC input for the derived access token.
	pub seed: String,
	/// Base64-standard-encoded HMAC-SHA256 signature over the canonical line form.
	pub signature: String,
	/// Set iff the certificate names a temporary client id distinct from the issuing permanent one.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub issuer: Option<String>,
}
impl Certificate {
	fn canonical_lines(&self, temp_client_id: Option<&str>) -> String {
		let mut lines = vec![format!("version:{}", self.version)];

		if let Some(issuer) = &self.issuer {
			// A certificate with `issuer` set was minted with a named client id; verifying it
			// against `temp_client_id = None` is type-valid input that must simply fail
			// verification, not panic, so an absent name falls back to the empty string and the
			// resulting line form just won't match what was actually signed.
			let named_id = temp_client_id.unwrap_or_default();

			lines.push(format!("clientId:{named_id}"));
			lines.push(format!("issuer:{issuer}"));
		}

		lines.push(format!("seed:{}", self.seed));
		lines.push(format!("start:{}", self.start));
		lines.push(format!("expiry:{}", self.expiry));
		lines.push("scopes:".to_string());
		lines.extend(self.scopes.iter().cloned());
		lines.join("\n")
	}

	fn signature_for(&self, access_token: &str, temp_client_id: Option<&str>) -> String {
		let canonical = self.canonical_lines(temp_client_id);

		hawk::b64_std(&hawk::hmac_sha256(access_token.as_bytes(), canonical.as_bytes()))
	}

	fn sign(&mut self, access_token: &str, temp_client_id: Option<&str>) {
		self.signature = self.signature_for(access_token, temp_client_id);
	}

	/// Verifies this certificate's signature against `access_token`, the permanent access token
	/// that is claimed to have minted it.
	pub fn verify(&self, access_token: &str, temp_client_id: Option<&str>) -> bool {
		self.signature_for(access_token, temp_client_id) == self.signature
	}

	/// Parses a certificate's JSON text. An empty string means "no certificate" and returns
	/// `Ok(None)`; a non-empty, unparsable string is a [`crate::error::Error::MalformedCertificate`].
	pub fn parse(text: &str) -> Result<Option<Self>> {
		if text.is_empty() {
			return Ok(None);
		}

		serde_json::from_str(text).map(Some).map_err(|source| Error::MalformedCertificate { source })
	}

	/// The certificate's expiry instant, or the Unix epoch (treated as already expired) when the
	/// certificate is absent or unparsable.
	pub fn expiration(&self) -> OffsetDateTime {
		to_offset_date_time(self.expiry)
	}
}

fn to_millis(instant: OffsetDateTime) -> i64 {
	(instant.unix_timestamp_nanos() / 1_000_000) as i64
}

fn to_offset_date_time(millis: i64) -> OffsetDateTime {
	OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000)
		.unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

/// Mints a temporary credential from a permanent one (§4.C2). The source must be a permanent
/// credential with a non-empty `client_id` and `access_token`; `duration` must not exceed
/// [`MAX_DURATION`].
pub fn mint(
	perm: &PermanentCredential,
	temp_client_id: Option<&str>,
	duration: Duration,
	scopes: Vec<String>,
	clock: &dyn Clock,
	seeds: &dyn SeedSource,
) -> Result<TemporaryCredential> {
	const KIND: OperationKind = OperationKind::Mint;

	let _span = OperationSpan::new(KIND, "mint").entered();

	obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

	let result = mint_inner(perm, temp_client_id, duration, scopes, clock, seeds);

	obs::record_operation_outcome(
		KIND,
		if result.is_ok() { OperationOutcome::Success } else { OperationOutcome::Failure },
	);

	result
}

fn mint_inner(
	perm: &PermanentCredential,
	temp_client_id: Option<&str>,
	duration: Duration,
	scopes: Vec<String>,
	clock: &dyn Clock,
	seeds: &dyn SeedSource,
) -> Result<TemporaryCredential> {
	if duration > MAX_DURATION {
		return Err(Error::InvalidDuration { requested: duration });
	}
	if perm.client_id.is_empty() {
		return Err(Error::EmptyCredential { field: "client_id" });
	}
	if perm.access_token.expose().is_empty() {
		return Err(Error::EmptyCredential { field: "access_token" });
	}

	let now = clock.now();
	let start = now - Duration::minutes(5);
	let expiry = now + duration;
	let seed = seeds.seed();
	let issuer = temp_client_id.map(|_| perm.client_id.clone());
	let mut cert = Certificate {
		version: 1,
		scopes,
		start: to_millis(start),
		expiry: to_millis(expiry),
		seed: seed.clone(),
		signature: String::new(),
		issuer,
	};

	cert.sign(perm.access_token.expose(), temp_client_id);

	let certificate_json =
		serde_json::to_string(&cert).map_err(|source| Error::SerializationFailure { source })?;
	let derived_token = derive_temporary_access_token(perm.access_token.expose(), &seed);
	let client_id = temp_client_id.map(str::to_string).unwrap_or_else(|| perm.client_id.clone());

	Ok(TemporaryCredential {
		client_id,
		access_token: AccessTokenSecret::new(derived_token),
		certificate_json,
		authorized_scopes: perm.authorized_scopes.clone(),
	})
}

/// Derives the temporary access token: `hmac_sha256(perm_access_token, seed)`, base64url-encoded
/// with padding stripped.
pub fn derive_temporary_access_token(perm_access_token: &str, seed: &str) -> String {
	hawk::b64_url_nopad(&hawk::hmac_sha256(perm_access_token.as_bytes(), seed.as_bytes()))
}
