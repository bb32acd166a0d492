//! Hawk v1 MAC construction: the canonical request/bewit string, the payload hash, and the
//! `Authorization` header / bewit query-parameter encodings.
//!
//! No dedicated Hawk crate exists among the dependencies available to this core, so the protocol
//! is implemented directly against `hmac` + `sha2` + `base64`, the same primitives a hand-rolled
//! Hawk client reaches for in any language.

// crates.io
use base64::{
	Engine,
	engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

/// The `{id, key}` pair a Hawk MAC is keyed with.
#[derive(Clone, Copy, Debug)]
pub struct KeyPair<'a> {
	/// The Hawk credential id (a client id).
	pub id: &'a str,
	/// The Hawk shared secret (an access token).
	pub key: &'a str,
}

enum MacKind {
	Header,
	Bewit,
}
impl MacKind {
	const fn label(&self) -> &'static str {
		match self {
			MacKind::Header => "header",
			MacKind::Bewit => "bewit",
		}
	}
}

pub(crate) fn hmac_sha256(key: &[u8], message: &[u8]) -> Vec<u8> {
	let mut mac =
		Hmac::<Sha256>::new_from_slice(key).expect("HMAC-SHA256 accepts a key of any length");

	mac.update(message);
	mac.finalize().into_bytes().to_vec()
}

pub(crate) fn b64_std(bytes: &[u8]) -> String {
	STANDARD.encode(bytes)
}

pub(crate) fn b64_url_nopad(bytes: &[u8]) -> String {
	URL_SAFE_NO_PAD.encode(bytes)
}

/// The Hawk payload hash over `(content_type, payload)`, per the `hawk.1.payload` normalized
/// form.
pub fn payload_hash(content_type: &str, payload: &[u8]) -> String {
	let mut hasher = Sha256::new();

	hasher.update(b"hawk.1.payload\n");
	hasher.update(content_type.as_bytes());
	hasher.update(b"\n");
	hasher.update(payload);
	hasher.update(b"\n");

	b64_std(&hasher.finalize())
}

fn resource_string(url: &Url) -> String {
	let mut resource = url.path().to_string();

	if let Some(query) = url.query() {
		resource.push('?');
		resource.push_str(query);
	}

	resource
}

#[allow(clippy::too_many_arguments)]
fn normalized_string(
	kind: MacKind,
	ts_or_exp: i64,
	nonce: &str,
	method: &str,
	resource: &str,
	host: &str,
	port: u16,
	hash: &str,
	ext: &str,
) -> String {
	format!(
		"hawk.1.{}\n{ts_or_exp}\n{nonce}\n{method}\n{resource}\n{host}\n{port}\n{hash}\n{ext}\n",
		kind.label()
	)
}

fn escape_header_value(value: &str) -> String {
	value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Builds the complete `Authorization` header value for a Hawk request.
#[allow(clippy::too_many_arguments)]
pub fn header_value(
	key_pair: &KeyPair,
	method: &str,
	url: &Url,
	content_type: Option<&str>,
	payload: &[u8],
	ext: &str,
	ts: i64,
	nonce: &str,
) -> String {
	let host = url.host_str().unwrap_or_default();
	let port = url.port_or_known_default().unwrap_or(80);
	let resource = resource_string(url);
	let hash = content_type.map(|ct| payload_hash(ct, payload));
	let normalized = normalized_string(
		MacKind::Header,
		ts,
		nonce,
		method,
		&resource,
		host,
		port,
		hash.as_deref().unwrap_or(""),
		ext,
	);
	let mac = b64_std(&hmac_sha256(key_pair.key.as_bytes(), normalized.as_bytes()));
	let mut header =
		format!("Hawk id=\"{}\", ts=\"{ts}\", nonce=\"{}\"", escape_header_value(key_pair.id), nonce);

	if let Some(hash) = &hash {
		header.push_str(&format!(", hash=\"{hash}\""));
	}
	if !ext.is_empty() {
		header.push_str(&format!(", ext=\"{}\"", escape_header_value(ext)));
	}

	header.push_str(&format!(", mac=\"{mac}\""));
	header
}

/// Computes a bewit value (the MAC-bearing, base64url-encoded `id\exp\mac\ext` tuple) for a
/// GET-only, time-bounded signed URL.
pub fn bewit_value(key_pair: &KeyPair, url: &Url, exp: i64, ext: &str) -> String {
	let host = url.host_str().unwrap_or_default();
	let port = url.port_or_known_default().unwrap_or(80);
	let resource = resource_string(url);
	let normalized =
		normalized_string(MacKind::Bewit, exp, "", "GET", &resource, host, port, "", ext);
	let mac = b64_std(&hmac_sha256(key_pair.key.as_bytes(), normalized.as_bytes()));
	let raw = format!("{}\\{exp}\\{mac}\\{ext}", key_pair.id);

	b64_url_nopad(raw.as_bytes())
}
