//! Validated, immutable handshake configuration.
//!
//! [`SsoConfig`] is built once at startup, either through [`SsoConfigBuilder`] or from a
//! deserialized [`SsoSettings`] document, and shared behind an `Arc` by every request the
//! [`Authenticator`](crate::handshake::Authenticator) serves.

/// Builder API for assembling configurations.
pub mod builder;
/// Serde model of the configuration document.
pub mod settings;

pub use builder::*;
pub use settings::*;

// self
use crate::{_prelude::*, auth::SessionCookie, key::KeyMaterial};

/// Path appended to the API base URL to reach the profile endpoint.
pub const PROFILE_PATH: &str = "/my";
/// Default profile-fetch timeout.
pub const DEFAULT_PROFILE_TIMEOUT: StdDuration = StdDuration::from_secs(10);

/// What the authenticator does when the profile endpoint fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileFailurePolicy {
	/// Authenticate with an empty profile and report the error on the outcome.
	#[default]
	Continue,
	/// Fail the request with the profile error.
	Fail,
}

/// Immutable configuration consumed by the authenticator.
#[derive(Debug)]
pub struct SsoConfig {
	/// Identity provider login URL, kept verbatim because it is part of the signed input.
	pub provider_url: String,
	/// Signing key and its identifier.
	pub key: KeyMaterial,
	/// Session cookie codec.
	pub cookie: SessionCookie,
	/// Base URL of the provider API; `None` disables profile fetches.
	pub api_base_url: Option<Url>,
	/// Profile endpoint derived from [`SsoConfig::api_base_url`].
	pub profile_endpoint: Option<Url>,
	/// JSON-serialized permissions descriptor sent with every redirect.
	pub permissions: String,
	/// Reject inbound requests that did not arrive over HTTPS.
	pub is_secure: bool,
	/// Deadline for a single profile fetch.
	pub profile_timeout: StdDuration,
	/// Skip certificate validation on the profile transport.
	pub accept_invalid_certs: bool,
	/// Behavior when a profile fetch fails.
	pub profile_failure_policy: ProfileFailurePolicy,
}
impl SsoConfig {
	/// Creates a new builder around the provided key material.
	pub fn builder(key: KeyMaterial) -> SsoConfigBuilder {
		SsoConfigBuilder::new(key)
	}

	/// Returns `true` when a profile endpoint is configured.
	pub fn fetches_profile(&self) -> bool {
		self.profile_endpoint.is_some()
	}
}
