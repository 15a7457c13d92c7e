//! Default session cookie codec.
//!
//! Values are URL-safe base64 (no padding) of the JSON-encoded [`SessionState`]. Expiry,
//! attributes, and integrity protection of the cookie belong to the host.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::{_prelude::*, auth::SessionState};

/// Default cookie name.
pub const DEFAULT_COOKIE_NAME: &str = "sso";

/// Errors raised while decoding or encoding a session cookie.
#[derive(Debug, ThisError)]
pub enum SessionCookieError {
	/// Cookie value is not URL-safe base64.
	#[error("Session cookie is not valid base64.")]
	Encoding(#[from] base64::DecodeError),
	/// Cookie payload is not a session state document.
	#[error("Session cookie payload is malformed.")]
	Payload {
		/// Path-aware decoding failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Session state could not be serialized.
	#[error("Session state could not be serialized.")]
	Serialize(#[source] serde_json::Error),
}

/// Codec bound to a cookie name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionCookie {
	name: String,
}
impl SessionCookie {
	/// Creates a codec for the cookie called `name`.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}

	/// Cookie name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Encodes `state` into a cookie value.
	pub fn encode(&self, state: &SessionState) -> Result<String, SessionCookieError> {
		let json = serde_json::to_vec(state).map_err(SessionCookieError::Serialize)?;

		Ok(URL_SAFE_NO_PAD.encode(json))
	}

	/// Decodes a cookie value produced by [`SessionCookie::encode`].
	pub fn decode(&self, value: &str) -> Result<SessionState, SessionCookieError> {
		let json = URL_SAFE_NO_PAD.decode(value.trim())?;
		let de = &mut serde_json::Deserializer::from_slice(&json);

		serde_path_to_error::deserialize(de).map_err(|source| SessionCookieError::Payload { source })
	}

	/// Finds this cookie in a `Cookie` request header and decodes it.
	///
	/// Returns `Ok(None)` when the header does not carry the cookie or carries it empty.
	pub fn read(&self, cookie_header: &str) -> Result<Option<SessionState>, SessionCookieError> {
		let value = cookie_header
			.split(';')
			.filter_map(|pair| pair.trim().split_once('='))
			.find(|(name, _)| *name == self.name)
			.map(|(_, value)| value.trim_matches('"'));

		match value {
			Some(value) if !value.is_empty() => self.decode(value).map(Some),
			_ => Ok(None),
		}
	}

	/// Renders `name=value` for a `Set-Cookie` header.
	pub fn set_cookie_value(&self, state: &SessionState) -> Result<String, SessionCookieError> {
		Ok(format!("{}={}", self.name, self.encode(state)?))
	}
}
impl Default for SessionCookie {
	fn default() -> Self {
		Self::new(DEFAULT_COOKIE_NAME)
	}
}
