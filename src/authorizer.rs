//! A polymorphic signing façade over a credential source, supporting on-the-fly, monotone
//! authorized-scope narrowing. Three concrete variants share the [`Authorizer`] trait: a fixed
//! credential, a narrowing wrapper around any authorizer, and a fetcher-backed authorizer that
//! consults a [`crate::fetcher::FetcherCache`] before each signature.

// self
use crate::{_prelude::*, credential::Credential, fetcher::FetcherCache, scope, signer};

/// A pluggable signing façade. Implementors resolve a current [`Credential`] and expose the
/// additional authorized-scopes restriction, if any, this authorizer layer applies on top of it.
pub trait Authorizer: Send + Sync {
	/// Resolves the credential this authorizer currently signs with.
	fn current_credential(&self) -> Result<Credential>;

	/// This authorizer's own narrowing restriction, independent of whatever `authorized_scopes`
	/// the resolved credential itself carries. `None` means no additional narrowing.
	fn authorized_scopes(&self) -> Option<&[String]>;

	/// Resolves the current credential with this authorizer's own narrowing restriction (if any)
	/// substituted into its `authorized_scopes`, without mutating the underlying credential.
	fn effective_credential(&self) -> Result<Credential> {
		let credential = self.current_credential()?;

		match self.authorized_scopes() {
			Some(scopes) => Ok(credential.with_authorized_scopes(Some(scopes.to_vec()))),
			None => Ok(credential),
		}
	}
}

/// Wraps a fixed [`Credential`] with no authorizer-level narrowing.
#[derive(Debug)]
pub struct FixedCredentialAuthorizer {
	credential: Credential,
}
impl FixedCredentialAuthorizer {
	/// Wraps `credential`.
	pub fn new(credential: Credential) -> Self {
		Self { credential }
	}
}
impl Authorizer for FixedCredentialAuthorizer {
	fn current_credential(&self) -> Result<Credential> {
		Ok(self.credential.clone())
	}

	fn authorized_scopes(&self) -> Option<&[String]> {
		None
	}
}

/// Wraps any authorizer together with an explicit authorized-scopes restriction, substituting
/// it into the inner credential's ext computation without mutating the inner authorizer.
pub struct NarrowedAuthorizer {
	inner: Arc<dyn Authorizer>,
	authorized_scopes: Vec<String>,
}
impl Authorizer for NarrowedAuthorizer {
	fn current_credential(&self) -> Result<Credential> {
		self.inner.current_credential()
	}

	fn authorized_scopes(&self) -> Option<&[String]> {
		Some(&self.authorized_scopes)
	}
}

/// Consults a [`FetcherCache`] before each signature, so short-lived temporary credentials are
/// transparently refreshed on demand.
pub struct FetchingAuthorizer {
	cache: Arc<FetcherCache>,
	authorized_scopes: Option<Vec<String>>,
}
impl FetchingAuthorizer {
	/// Wraps `cache` with no authorizer-level narrowing.
	pub fn new(cache: Arc<FetcherCache>) -> Self {
		Self { cache, authorized_scopes: None }
	}
}
impl Authorizer for FetchingAuthorizer {
	fn current_credential(&self) -> Result<Credential> {
		self.cache.current().map_err(|err| Error::FetchFailure {
			message: err.to_string(),
			source: Some(Box::new(FetchErrorSource(err))),
		})
	}

	fn authorized_scopes(&self) -> Option<&[String]> {
		self.authorized_scopes.as_deref()
	}
}

#[derive(Debug)]
struct FetchErrorSource(Arc<Error>);
impl Display for FetchErrorSource {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		Display::fmt(&self.0, f)
	}
}
impl std::error::Error for FetchErrorSource {}

/// Returns a new authorizer whose effective `authorized_scopes` is `new_scopes` if `authorizer`
/// carries no prior narrowing, or `intersect(prior, new_scopes)` otherwise. Narrowing never
/// widens: narrowing to an empty list is well-formed and yields `authorizedScopes: []` in the ext
/// header.
pub fn narrow(authorizer: Arc<dyn Authorizer>, new_scopes: Vec<String>) -> Arc<dyn Authorizer> {
	let authorized_scopes = match authorizer.authorized_scopes() {
		Some(prior) => scope::intersect(prior, &new_scopes),
		None => new_scopes,
	};

	Arc::new(NarrowedAuthorizer { inner: authorizer, authorized_scopes })
}

/// Signs a header via `authorizer`'s currently effective credential. See
/// [`crate::signer::signed_header`].
pub fn sign_header(
	authorizer: &dyn Authorizer,
	method: &str,
	url: &Url,
	payload: &[u8],
	clock: &dyn crate::adapters::Clock,
	seeds: &dyn crate::adapters::SeedSource,
) -> Result<signer::SignedHeaders> {
	let credential = authorizer.effective_credential()?;

	signer::signed_header(&credential, method, url, payload, clock, seeds)
}

/// Signs a bewit URL via `authorizer`'s currently effective credential. See
/// [`crate::signer::signed_url`].
pub fn sign_url(
	authorizer: &dyn Authorizer,
	url: &Url,
	duration: Duration,
	clock: &dyn crate::adapters::Clock,
) -> Result<Url> {
	let credential = authorizer.effective_credential()?;

	signer::signed_url(&credential, url, duration, clock)
}
