//! Bearer token wrapper that redacts sensitive material.

// self
use crate::_prelude::*;

/// Token returned by the identity provider, redacted in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SsoToken(String);
impl SsoToken {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` for an empty token, which never counts as a session.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for SsoToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for SsoToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SsoToken").field(&"<redacted>").finish()
	}
}
impl Display for SsoToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
