//! Time-bound signed headers for the profile endpoint.
//!
//! Only the HTTP-date is signed, so a header proves key possession at a moment in time but is
//! not bound to the URL or token it travels with. The acceptable clock skew is agreed with the
//! identity provider and enforced there; nothing here rejects stale timestamps.

// crates.io
use time::{UtcOffset, macros::format_description};
// self
use crate::{_prelude::*, auth::SsoToken, error::SigningError, key::KeyMaterial, sign};

/// Value of the `x-api-version` header sent to the profile endpoint.
pub const API_VERSION: &str = "~8";

/// Renders `at` as an RFC 7231 HTTP-date, e.g. `Thu, 15 Oct 2026 12:00:00 GMT`.
pub fn http_date(at: OffsetDateTime) -> Result<String, SigningError> {
	let format = format_description!(
		"[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
	);

	Ok(at.to_offset(UtcOffset::UTC).format(format)?)
}

/// Signed credentials for a single profile request.
#[derive(Clone)]
pub struct SignedHeader {
	/// HTTP-date that was signed and is sent as `Date`.
	pub date: String,
	/// Identifier of the signing key.
	pub key_id: String,
	/// Base64 RSA-SHA256 signature over [`SignedHeader::date`].
	pub signature: String,
	token: SsoToken,
}
impl SignedHeader {
	/// Signs `at` with `key` and binds the bearer `token` to the result.
	pub fn new(
		token: &SsoToken,
		key: &KeyMaterial,
		at: OffsetDateTime,
	) -> Result<Self, SigningError> {
		let date = http_date(at)?;
		let signature = sign::sign_timestamp(&date, key)?;

		Ok(Self { date, key_id: key.key_id().to_owned(), signature, token: token.clone() })
	}

	/// `Authorization` header value.
	pub fn authorization(&self) -> String {
		format!("Signature keyId=\"{}\",algorithm=\"rsa-sha256\" {}", self.key_id, self.signature)
	}

	/// Full header set for the profile request, in send order.
	pub fn headers(&self) -> Vec<(&'static str, String)> {
		vec![
			("accept", "application/json".into()),
			("x-api-version", API_VERSION.into()),
			("date", self.date.clone()),
			("authorization", self.authorization()),
			("x-auth-token", self.token.expose().to_owned()),
		]
	}
}
impl Debug for SignedHeader {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SignedHeader")
			.field("date", &self.date)
			.field("key_id", &self.key_id)
			.field("token", &self.token)
			.finish()
	}
}
