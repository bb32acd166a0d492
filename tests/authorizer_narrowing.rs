// std
use std::sync::Arc;
// crates.io
use time::{Duration, macros};
use url::Url;
// self
use hawk_auth_core::{
	adapters::{FixedClock, UuidSeedSource},
	authorizer::{Authorizer, FixedCredentialAuthorizer, narrow, sign_header, sign_url},
	credential::{Credential, PermanentCredential},
	scope::covers,
};

fn base_authorizer() -> Arc<dyn Authorizer> {
	Arc::new(FixedCredentialAuthorizer::new(Credential::Permanent(PermanentCredential::new(
		"client-id",
		"access-token",
		None,
	))))
}

// Scope-narrowing monotonicity (§8): effective(narrow(narrow(a, s), t)) ⊆ effective(narrow(a, s)).
#[test]
fn repeated_narrowing_only_ever_shrinks_the_effective_scope_set() {
	let once = narrow(base_authorizer(), vec!["queue:*".to_string(), "auth:*".to_string()]);
	let twice = narrow(once.clone(), vec!["queue:get-task:my-queue".to_string(), "index:*".to_string()]);

	let once_scopes = once.authorized_scopes().expect("first narrowing always carries scopes");
	let twice_scopes = twice.authorized_scopes().expect("second narrowing always carries scopes");

	for scope in twice_scopes {
		assert!(
			once_scopes.iter().any(|p| covers(p, scope)),
			"{scope} escaped the first narrowing's boundary"
		);
	}
	// "index:*" has no counterpart in the first narrowing and must not survive.
	assert!(!twice_scopes.iter().any(|s| s == "index:*"));
}

#[test]
fn narrowing_never_widens_an_already_empty_restriction() {
	let narrowed_to_nothing = narrow(base_authorizer(), vec![]);
	let further = narrow(narrowed_to_nothing, vec!["queue:*".to_string()]);

	assert_eq!(further.authorized_scopes(), Some([].as_slice()));
}

#[test]
fn signing_through_a_narrowed_authorizer_carries_the_narrowed_ext() {
	let narrowed = narrow(base_authorizer(), vec!["queue:get-task".to_string()]);
	let url = Url::parse("https://queue.example.com/v1/task/abc").unwrap();
	let clock = FixedClock::new(macros::datetime!(2026-01-01 00:00 UTC));
	let headers = sign_header(narrowed.as_ref(), "GET", &url, b"", &clock, &UuidSeedSource)
		.expect("signing through a narrowed authorizer should succeed");

	assert!(headers.authorization.starts_with("Hawk id=\"client-id\""));
	assert!(headers.authorization.contains("ext=\""), "a narrowed authorizer must emit a nonempty ext");

	let signed = sign_url(narrowed.as_ref(), &url, Duration::minutes(15), &clock)
		.expect("bewit signing through a narrowed authorizer should succeed");

	assert!(signed.query_pairs().any(|(k, _)| k == "bewit"));
}
