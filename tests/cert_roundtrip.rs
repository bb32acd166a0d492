// crates.io
use time::{Duration, macros};
// self
use hawk_auth_core::{
	adapters::{FixedClock, SeedSource, UuidSeedSource},
	cert::{self, Certificate},
	credential::PermanentCredential,
	error::Error,
};

struct FixedSeeds(&'static str);
impl SeedSource for FixedSeeds {
	fn seed(&self) -> String {
		self.0.to_string()
	}

	fn nonce(&self) -> String {
		"fixed-nonce".to_string()
	}
}

fn permanent(client_id: &str, access_token: &str) -> PermanentCredential {
	PermanentCredential::new(client_id, access_token, None)
}

// Cert round-trip + derived-token-stability invariants (§8), exercised across a handful of
// representative mint parameterizations rather than a single fixture.
#[test]
fn unnamed_certificates_round_trip_across_durations_and_scopes() {
	let clock = FixedClock::new(macros::datetime!(2026-02-14 09:30 UTC));
	let cases: &[(Duration, &[&str])] = &[
		(Duration::minutes(1), &[]),
		(Duration::hours(6), &["queue:get-task"]),
		(Duration::days(31), &["queue:*", "auth:*", "index:insert-task:*"]),
	];

	for (idx, (duration, scopes)) in cases.iter().enumerate() {
		let perm = permanent("client-a", "super-secret-access-token");
		let scopes: Vec<String> = scopes.iter().map(|s| s.to_string()).collect();
		let seed_source = FixedSeeds(Box::leak(format!("seed-{idx}").into_boxed_str()));
		let temp = perm
			.mint_temporary(None, *duration, scopes.clone(), &clock, &seed_source)
			.expect("mint should succeed for a duration within the 31-day ceiling");

		let parsed = Certificate::parse(&temp.certificate_json)
			.expect("certificate JSON should parse")
			.expect("certificate text should be non-empty");

		assert_eq!(parsed.version, 1);
		assert_eq!(parsed.scopes, scopes);
		assert!(parsed.issuer.is_none(), "an unnamed mint must not carry an issuer");
		assert!(parsed.verify(perm.access_token.expose(), None), "signature must verify");

		let expected_token = cert::derive_temporary_access_token(perm.access_token.expose(), &parsed.seed);

		assert_eq!(temp.access_token.expose(), expected_token, "derived token must be stable");
	}
}

#[test]
fn named_certificate_round_trips_with_issuer_and_distinct_client_id() {
	let clock = FixedClock::new(macros::datetime!(2026-02-14 09:30 UTC));
	let perm = permanent("issuing-client", "issuing-secret");
	let temp = perm
		.mint_temporary(
			Some("delegated-client"),
			Duration::hours(12),
			vec!["queue:get-task".to_string()],
			&clock,
			&UuidSeedSource,
		)
		.expect("named mint should succeed");

	assert_eq!(temp.client_id, "delegated-client");

	let parsed = Certificate::parse(&temp.certificate_json).unwrap().unwrap();

	assert_eq!(parsed.issuer.as_deref(), Some("issuing-client"));
	assert!(parsed.verify(perm.access_token.expose(), Some("delegated-client")));
	assert!(
		!parsed.verify(perm.access_token.expose(), Some("a-different-client")),
		"verification must be bound to the exact named client id"
	);
	assert!(
		!parsed.verify(perm.access_token.expose(), None),
		"a named certificate must not verify as unnamed"
	);
}

#[test]
fn mint_rejects_a_duration_one_millisecond_past_the_ceiling() {
	let clock = FixedClock::new(macros::datetime!(2026-01-01 00:00 UTC));
	let perm = permanent("client", "secret");
	let err = perm
		.mint_temporary(None, cert::MAX_DURATION + Duration::milliseconds(1), vec![], &clock, &UuidSeedSource)
		.expect_err("durations past the 31-day ceiling must be rejected");

	assert!(matches!(err, Error::InvalidDuration { .. }));
}

#[test]
fn authorized_scopes_are_copied_onto_the_temporary_credential_unchanged() {
	let clock = FixedClock::new(macros::datetime!(2026-01-01 00:00 UTC));
	let perm = PermanentCredential::new("client", "secret", Some(vec!["a:*".to_string()]));
	let temp = perm
		.mint_temporary(None, Duration::hours(1), vec!["b:*".to_string()], &clock, &UuidSeedSource)
		.expect("mint should succeed");

	// The source's authorized_scopes is copied as-is onto the minted credential...
	assert_eq!(temp.authorized_scopes, Some(vec!["a:*".to_string()]));
	// ...and is orthogonal to the certificate's own scopes list.
	let parsed = Certificate::parse(&temp.certificate_json).unwrap().unwrap();

	assert_eq!(parsed.scopes, vec!["b:*".to_string()]);
}
