//! Hawk-style request signing, scope algebra, and credential lifecycle core for HTTP
//! microservice clients — the authentication/authorization layer underneath a generated
//! service API surface, not the surface itself.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod adapters;
pub mod authorizer;
pub mod cert;
pub mod config;
pub mod credential;
pub mod error;
pub mod fetcher;
pub mod hawk;
pub mod obs;
pub mod scope;
pub mod signer;

#[cfg(test)]
use color_eyre as _;

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use url;
