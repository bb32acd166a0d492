//! Credential values: the tagged `{Permanent, Temporary}` variant, Hawk key-pair derivation, and
//! the capability set the signer builds on top of.

// self
use crate::{
	_prelude::*,
	adapters::{Clock, SeedSource},
	cert,
	hawk::KeyPair,
};

/// A secret wrapper whose `Debug`/`Display` never print the underlying value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessTokenSecret(String);
impl AccessTokenSecret {
	/// Wraps a raw access token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw access token. Callers are responsible for not logging the result.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for AccessTokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
impl Display for AccessTokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// A permanent credential: a long-lived `{client_id, access_token}` pair, optionally narrowed by
/// an `authorized_scopes` restriction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermanentCredential {
	/// The client id.
	pub client_id: String,
	/// The shared secret.
	pub access_token: AccessTokenSecret,
	/// Tri-state authorized-scopes restriction: absent, present-empty, or present-nonempty.
	pub authorized_scopes: Option<Vec<String>>,
}
impl PermanentCredential {
	/// Builds a permanent credential.
	pub fn new(
		client_id: impl Into<String>,
		access_token: impl Into<String>,
		authorized_scopes: Option<Vec<String>>,
	) -> Self {
		Self {
			client_id: client_id.into(),
			access_token: AccessTokenSecret::new(access_token),
			authorized_scopes,
		}
	}

	/// Mints a temporary credential delegated from this one. See [`crate::cert::mint`].
	pub fn mint_temporary(
		&self,
		temp_client_id: Option<&str>,
		duration: Duration,
		scopes: Vec<String>,
		clock: &dyn Clock,
		seeds: &dyn SeedSource,
	) -> Result<TemporaryCredential> {
		cert::mint(self, temp_client_id, duration, scopes, clock, seeds)
	}
}

/// A temporary credential minted from a permanent one: the derived access token plus the raw
/// certificate JSON text that backs it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemporaryCredential {
	/// The client id: either the issuing permanent credential's id, or a distinct named id.
	pub client_id: String,
	/// The derived temporary access token.
	pub access_token: AccessTokenSecret,
	/// Raw, serialized certificate JSON text.
	pub certificate_json: String,
	/// Authorized scopes copied verbatim from the source permanent credential.
	pub authorized_scopes: Option<Vec<String>>,
}

/// A tagged credential value: either permanent or temporary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credential {
	/// A permanent credential.
	Permanent(PermanentCredential),
	/// A temporary credential minted from a permanent one.
	Temporary(TemporaryCredential),
}
impl Credential {
	/// The credential's client id.
	pub fn client_id(&self) -> &str {
		match self {
			Credential::Permanent(p) => &p.client_id,
			Credential::Temporary(t) => &t.client_id,
		}
	}

	/// The credential's access token (secret).
	pub fn access_token(&self) -> &AccessTokenSecret {
		match self {
			Credential::Permanent(p) => &p.access_token,
			Credential::Temporary(t) => &t.access_token,
		}
	}

	/// The raw certificate JSON text, if this is a temporary credential carrying a non-empty
	/// certificate. An empty certificate string is the one locally-recovered condition named in
	/// §7: it degrades to `None`, the same as a permanent credential, rather than surfacing an
	/// empty payload to callers.
	pub fn certificate_json(&self) -> Option<&str> {
		match self {
			Credential::Permanent(_) => None,
			Credential::Temporary(t) if t.certificate_json.is_empty() => None,
			Credential::Temporary(t) => Some(&t.certificate_json),
		}
	}

	/// The credential's authorized-scopes restriction (tri-state).
	pub fn authorized_scopes(&self) -> Option<&[String]> {
		match self {
			Credential::Permanent(p) => p.authorized_scopes.as_deref(),
			Credential::Temporary(t) => t.authorized_scopes.as_deref(),
		}
	}

	/// Returns a clone of this credential with its `authorized_scopes` replaced, without
	/// mutating the receiver. Used by authorizer-level narrowing to substitute a restriction into
	/// the ext computation.
	pub fn with_authorized_scopes(&self, authorized_scopes: Option<Vec<String>>) -> Self {
		match self {
			Credential::Permanent(p) => {
				Credential::Permanent(PermanentCredential { authorized_scopes, ..p.clone() })
			},
			Credential::Temporary(t) => {
				Credential::Temporary(TemporaryCredential { authorized_scopes, ..t.clone() })
			},
		}
	}

	/// The Hawk `{id, key}` pair for this credential, keyed by SHA-256.
	pub fn hawk_key_pair(&self) -> KeyPair<'_> {
		KeyPair { id: self.client_id(), key: self.access_token().expose() }
	}

	/// The instant at which this credential stops being usable: `None` for a permanent
	/// credential (no expiry), or the certificate's expiry (the Unix epoch if the certificate is
	/// unparsable) for a temporary one.
	pub fn expiration(&self) -> Option<OffsetDateTime> {
		match self {
			Credential::Permanent(_) => None,
			Credential::Temporary(t) => Some(
				crate::cert::Certificate::parse(&t.certificate_json)
					.ok()
					.flatten()
					.map(|cert| cert.expiration())
					.unwrap_or(OffsetDateTime::UNIX_EPOCH),
			),
		}
	}

	/// Mints a temporary credential from this one, if it is permanent; otherwise
	/// [`Error::NonPermanentSource`].
	pub fn mint_temporary(
		&self,
		temp_client_id: Option<&str>,
		duration: Duration,
		scopes: Vec<String>,
		clock: &dyn Clock,
		seeds: &dyn SeedSource,
	) -> Result<TemporaryCredential> {
		match self {
			Credential::Permanent(p) => p.mint_temporary(temp_client_id, duration, scopes, clock, seeds),
			Credential::Temporary(_) => Err(Error::NonPermanentSource),
		}
	}
}
