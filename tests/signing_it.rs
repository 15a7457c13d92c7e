#![cfg(feature = "reqwest")]

// crates.io
use time::macros::datetime;
// self
use sso_handshake::{
	_preludet::*,
	handshake::{AuthOutcome, AuthRequest},
	sign::{self, RedirectParams},
};

const GOLDEN_URL: &str = include_str!("fixtures/redirect_url.golden");

fn golden_params() -> RedirectParams {
	RedirectParams::new("https://app.example/cb?next=/a b&x=(1)*'!~", "{\"read\":true}")
		.with_nonce("aB3dE5g")
		.at(datetime!(2026-10-15 12:00:00 UTC))
}

fn mutate(url: &str, index: usize) -> String {
	url.char_indices()
		.map(|(i, c)| match (i == index, c) {
			(false, c) => c,
			(true, 'A') => 'B',
			(true, _) => 'A',
		})
		.collect()
}

#[test]
fn configured_authenticator_reproduces_reference_url() {
	let config = test_config_builder("k1")
		.permissions(serde_json::json!({ "read": true }))
		.build()
		.expect("Config should build.");
	let auth = build_reqwest_test_authenticator(config);
	let target = auth.redirect_builder().build_with(&golden_params()).expect("Build should succeed.");

	assert_eq!(target.as_str(), GOLDEN_URL.trim());
}

#[test]
fn any_single_character_change_breaks_the_signature() {
	let key = test_key_material("k1");
	let url = GOLDEN_URL.trim();

	sign::verify_redirect_url(url, key.public_key()).expect("Reference URL should verify.");

	for index in 0..url.len() {
		let mutated = mutate(url, index);

		assert!(
			sign::verify_redirect_url(&mutated, key.public_key()).is_err(),
			"Mutation at byte {index} should break verification: {mutated}."
		);
	}
}

#[test]
fn pkcs1_and_pkcs8_keys_sign_identically() {
	let pkcs8 = test_key_material("k1");
	let pkcs1 = sso_handshake::key::KeyMaterial::from_pem("k1", TEST_KEY_PKCS1_PEM)
		.expect("PKCS#1 fixture should parse.");
	let params = golden_params();
	let a = sign::sign_redirect_request(TEST_PROVIDER_URL, &params, &pkcs8)
		.expect("PKCS#8 signing should succeed.");
	let b = sign::sign_redirect_request(TEST_PROVIDER_URL, &params, &pkcs1)
		.expect("PKCS#1 signing should succeed.");

	assert_eq!(a.signed_url(), b.signed_url());
}

#[tokio::test]
async fn redirect_round_trip_from_request_to_provider_check() {
	let config = test_config_builder("k1")
		.permissions(serde_json::json!({ "read": true }))
		.build()
		.expect("Config should build.");
	let public_key = config.key.public_key().clone();
	let auth = build_reqwest_test_authenticator(config);
	let request = AuthRequest::from_url(
		&Url::parse("https://app.example/cb").expect("Request URL should parse."),
	);
	let outcome = auth.authenticate(&request).await.expect("Redirect should succeed.");
	let AuthOutcome::Redirect { target } = outcome else {
		panic!("Requests without a session should redirect.");
	};
	let url = target.to_url().expect("Redirect target should parse.");
	let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();
	let value = |name: &str| {
		pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str()).unwrap_or_default()
	};

	assert_eq!(url.as_str().split('?').next(), Some(TEST_PROVIDER_URL));
	assert_eq!(value("keyid"), "k1");
	assert_eq!(value("returnto"), "https://app.example/cb");
	assert_eq!(value("permissions"), "{\"read\":true}");
	assert_eq!(value("nonce").len(), sign::NONCE_LEN);
	assert!(value("now").ends_with(" GMT"));

	sign::verify_redirect_url(target.as_str(), &public_key)
		.expect("Provider-side verification should succeed.");
}
