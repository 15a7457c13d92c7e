//! Session state persisted in the client-held cookie.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, auth::SsoToken};

/// User profile returned by the identity provider's profile endpoint.
///
/// The shape is provider-defined; any JSON object is accepted. An empty profile means the
/// endpoint is disabled or the lookup failed under a tolerant policy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(Map<String, Value>);
impl Profile {
	/// Wraps an already-decoded JSON object.
	pub fn new(fields: Map<String, Value>) -> Self {
		Self(fields)
	}

	/// Returns `true` when no profile data is present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Looks up a top-level field.
	pub fn get(&self, field: &str) -> Option<&Value> {
		self.0.get(field)
	}

	/// Borrows the underlying JSON object.
	pub fn as_map(&self) -> &Map<String, Value> {
		&self.0
	}

	/// Consumes the profile and returns the JSON object.
	pub fn into_inner(self) -> Map<String, Value> {
		self.0
	}
}
impl From<Map<String, Value>> for Profile {
	fn from(fields: Map<String, Value>) -> Self {
		Self(fields)
	}
}

/// Outcome of a completed handshake, as stored in the session cookie.
///
/// Once present, the holder is never redirected again until the host clears the cookie.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
	/// Token issued by the identity provider.
	pub token: SsoToken,
	/// Profile resolved for the token, empty when unavailable.
	#[serde(default)]
	pub profile: Profile,
}
impl SessionState {
	/// Creates a session for `token` and `profile`.
	pub fn new(token: SsoToken, profile: Profile) -> Self {
		Self { token, profile }
	}

	/// A session is usable when it carries a non-empty token.
	pub fn is_valid(&self) -> bool {
		!self.token.is_empty()
	}
}
