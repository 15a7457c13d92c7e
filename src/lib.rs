//! Signed-redirect single sign-on handshake: canonical request signing, signed-header profile
//! exchange, and cookie-held session state behind one async authenticator.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handshake;
pub mod http;
pub mod key;
pub mod obs;
pub mod profile;
pub mod redirect;
pub mod sign;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::{SsoConfig, SsoConfigBuilder},
		handshake::Authenticator,
		http::ReqwestHttpClient,
		key::KeyMaterial,
	};

	/// PKCS#8 RSA key shared by the test suites.
	pub const TEST_KEY_PEM: &str = include_str!("../tests/fixtures/sso_signing_key.pem");
	/// The same key as [`TEST_KEY_PEM`] in the traditional PKCS#1 encoding.
	pub const TEST_KEY_PKCS1_PEM: &str = include_str!("../tests/fixtures/sso_signing_key_pkcs1.pem");
	/// Provider URL used by fixtures.
	pub const TEST_PROVIDER_URL: &str = "https://sso.example.com/login";

	/// Authenticator type alias used by reqwest-backed integration tests.
	pub type ReqwestTestAuthenticator = Authenticator<ReqwestHttpClient>;

	/// Loads [`TEST_KEY_PEM`] under the provided key identifier.
	pub fn test_key_material(key_id: &str) -> KeyMaterial {
		KeyMaterial::from_pem(key_id, TEST_KEY_PEM).expect("Test key fixture should parse.")
	}

	/// Starts a config builder wired to [`TEST_PROVIDER_URL`] and the fixture key.
	pub fn test_config_builder(key_id: &str) -> SsoConfigBuilder {
		SsoConfig::builder(test_key_material(key_id)).provider_url(TEST_PROVIDER_URL)
	}

	/// Builds a reqwest HTTP client that trusts the mock server certificates.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs an [`Authenticator`] for the provided config backed by the test transport.
	pub fn build_reqwest_test_authenticator(config: SsoConfig) -> ReqwestTestAuthenticator {
		Authenticator::with_http_client(config, test_reqwest_http_client())
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration as StdDuration,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use rsa;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
