//! Environment-variable conventions for locating a permanent credential and a root URL, kept
//! outside the core signing API so callers embedding this crate in a larger client are free to
//! source credentials however they like.

// self
use crate::_prelude::*;

/// Client-id environment variable name.
pub const CLIENT_ID_ENV: &str = "TASKCLUSTER_CLIENT_ID";
/// Access-token environment variable name.
pub const ACCESS_TOKEN_ENV: &str = "TASKCLUSTER_ACCESS_TOKEN";
/// Certificate environment variable name, for a temporary credential's certificate JSON text.
pub const CERTIFICATE_ENV: &str = "TASKCLUSTER_CERTIFICATE";
/// Root URL environment variable name.
pub const ROOT_URL_ENV: &str = "TASKCLUSTER_ROOT_URL";

/// A root URL and, where authentication is enabled, a credential read from the conventional
/// environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
	/// The root URL of the service cluster this credential authenticates against.
	pub root_url: String,
	/// The credential read from the environment, or `None` when `CLIENT_ID_ENV` is empty or
	/// unset — per §6, that means authentication is disabled rather than an error.
	pub credential: Option<crate::credential::Credential>,
}
impl Config {
	/// Reads a [`Config`] from the conventional environment variables.
	///
	/// `TASKCLUSTER_ROOT_URL` is required. `TASKCLUSTER_CLIENT_ID` empty or unset means
	/// authentication is disabled and [`Config::credential`] is `None`; otherwise
	/// `TASKCLUSTER_ACCESS_TOKEN` is required, and `TASKCLUSTER_CERTIFICATE`, if set and
	/// non-empty, yields a temporary credential whose certificate is that text, otherwise a
	/// permanent credential is returned.
	pub fn from_env() -> Result<Self> {
		let root_url = read_required(ROOT_URL_ENV)?;
		let client_id = std::env::var(CLIENT_ID_ENV).unwrap_or_default();

		if client_id.is_empty() {
			return Ok(Self { root_url, credential: None });
		}

		let access_token = read_required(ACCESS_TOKEN_ENV)?;
		let certificate_json = std::env::var(CERTIFICATE_ENV).unwrap_or_default();
		let credential = if certificate_json.is_empty() {
			crate::credential::Credential::Permanent(crate::credential::PermanentCredential::new(
				client_id,
				access_token,
				None,
			))
		} else {
			crate::credential::Credential::Temporary(crate::credential::TemporaryCredential {
				client_id,
				access_token: crate::credential::AccessTokenSecret::new(access_token),
				certificate_json,
				authorized_scopes: None,
			})
		};

		Ok(Self { root_url, credential: Some(credential) })
	}
}

fn read_required(name: &'static str) -> Result<String> {
	std::env::var(name).map_err(|_| Error::EmptyCredential { field: name })
}
