//! Request signing for both directions of the handshake.
//!
//! Redirects sign the percent-encoded form of the whole provider URL (base URL, `?`, canonical
//! query). Profile requests sign only the current HTTP-date. Both use RSA-SHA256 with PKCS#1 v1.5
//! padding and standard base64, which is what the identity provider verifies.

pub mod canonical;
pub mod header;

pub use canonical::*;
pub use header::*;

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use percent_encoding::percent_decode_str;
use rand::{Rng, distr::Alphanumeric};
use rsa::{
	RsaPublicKey,
	pkcs1v15::{Signature, VerifyingKey},
	signature::Verifier,
};
use sha2::Sha256;
// self
use crate::{_prelude::*, error::SigningError, key::KeyMaterial};

/// Length of generated nonces. Alphanumeric sampling gives ~95 bits at this length.
pub const NONCE_LEN: usize = 16;

const SIG_SEPARATOR: &str = "&sig=";

/// A signed outbound redirect request.
#[derive(Clone, Debug)]
pub struct SignedRequest {
	/// Canonical query that was signed.
	pub query: CanonicalQuery,
	/// Provider URL joined with the encoded query, without the signature.
	pub unsigned_url: String,
	/// Base64 RSA-SHA256 signature over the percent-encoded [`SignedRequest::unsigned_url`].
	pub signature: String,
}
impl SignedRequest {
	/// Nonce carried by the request.
	pub fn nonce(&self) -> &str {
		self.query.get("nonce").unwrap_or_default()
	}

	/// HTTP-date carried in the `now` field.
	pub fn now(&self) -> &str {
		self.query.get("now").unwrap_or_default()
	}

	/// Final URL with the trailing `&sig=` parameter.
	pub fn signed_url(&self) -> String {
		format!("{}{SIG_SEPARATOR}{}", self.unsigned_url, encode_component(&self.signature))
	}
}

/// Draws a fresh alphanumeric nonce of [`NONCE_LEN`] characters.
pub fn generate_nonce() -> String {
	rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect()
}

/// Builds and signs the canonical redirect request for `provider_url`.
pub fn sign_redirect_request(
	provider_url: &str,
	params: &RedirectParams,
	key: &KeyMaterial,
) -> Result<SignedRequest, SigningError> {
	let now = http_date(params.now)?;
	let query = CanonicalQuery::redirect(
		key.key_id(),
		&params.nonce,
		&now,
		&params.permissions,
		&params.return_url,
	);
	let unsigned_url = format!("{provider_url}?{}", query.encode());
	let signature = key.sign(encode_component(&unsigned_url).as_bytes())?;

	Ok(SignedRequest { query, unsigned_url, signature })
}

/// Signs a bare timestamp string.
pub fn sign_timestamp(timestamp: &str, key: &KeyMaterial) -> Result<String, SigningError> {
	key.sign(timestamp.as_bytes())
}

/// Verifies a signed redirect URL the way the identity provider does.
///
/// The trailing `&sig=` parameter is split off and decoded, and the remaining URL is
/// re-encoded and checked against `public_key`.
pub fn verify_redirect_url(url: &str, public_key: &RsaPublicKey) -> Result<(), SigningError> {
	let (unsigned, signature) =
		url.rsplit_once(SIG_SEPARATOR).ok_or(SigningError::MissingSignature)?;
	let signature = percent_decode_str(signature).decode_utf8_lossy();

	verify(encode_component(unsigned).as_bytes(), &signature, public_key)
}

/// Verifies a timestamp signature produced by [`sign_timestamp`].
pub fn verify_timestamp(
	timestamp: &str,
	signature: &str,
	public_key: &RsaPublicKey,
) -> Result<(), SigningError> {
	verify(timestamp.as_bytes(), signature, public_key)
}

fn verify(message: &[u8], signature: &str, public_key: &RsaPublicKey) -> Result<(), SigningError> {
	let raw = STANDARD.decode(signature)?;
	let signature = Signature::try_from(raw.as_slice()).map_err(SigningError::Verify)?;

	VerifyingKey::<Sha256>::new(public_key.clone())
		.verify(message, &signature)
		.map_err(SigningError::Verify)
}
