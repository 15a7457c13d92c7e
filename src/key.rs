//! Private signing key material loaded once at startup and shared read-only afterwards.

// std
use std::path::Path;
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rsa::{
	RsaPrivateKey, RsaPublicKey,
	pkcs1::DecodeRsaPrivateKey,
	pkcs1v15::SigningKey,
	pkcs8::DecodePrivateKey,
	rand_core::OsRng,
	signature::{RandomizedSigner, SignatureEncoding},
};
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, SigningError},
};

/// RSA private key paired with the identifier the identity provider knows it by.
///
/// The value is immutable after construction. Its [`Debug`] output never includes key bytes.
pub struct KeyMaterial {
	key_id: String,
	signing_key: SigningKey<Sha256>,
	public_key: RsaPublicKey,
}
impl KeyMaterial {
	/// Parses a PEM-encoded RSA private key (PKCS#8 `PRIVATE KEY` or PKCS#1 `RSA PRIVATE KEY`).
	///
	/// Empty input is a [`ConfigError::MissingKeyMaterial`]; bytes that are present but do not
	/// decode are a [`SigningError::MalformedKey`].
	pub fn from_pem(key_id: impl Into<String>, pem: impl AsRef<[u8]>) -> Result<Self> {
		let key_id = key_id.into();

		if key_id.trim().is_empty() {
			return Err(ConfigError::MissingKeyId.into());
		}

		let bytes = pem.as_ref();

		if bytes.iter().all(u8::is_ascii_whitespace) {
			return Err(ConfigError::MissingKeyMaterial.into());
		}

		let pem = std::str::from_utf8(bytes)
			.map_err(|e| SigningError::MalformedKey { reason: e.to_string() })?;
		let private_key = parse_private_key(pem)?;
		let public_key = RsaPublicKey::from(&private_key);

		Ok(Self { key_id, signing_key: SigningKey::new(private_key), public_key })
	}

	/// Reads and parses a PEM key file.
	pub fn from_pem_file(key_id: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let pem = std::fs::read(path)
			.map_err(|source| ConfigError::KeyRead { path: path.display().to_string(), source })?;

		Self::from_pem(key_id, pem)
	}

	/// Identifier sent as `keyid` in redirects and `keyId` in signed headers.
	pub fn key_id(&self) -> &str {
		&self.key_id
	}

	/// Public half of the key, as the identity provider would hold it.
	pub fn public_key(&self) -> &RsaPublicKey {
		&self.public_key
	}

	/// Signs `message` with RSA-SHA256 (PKCS#1 v1.5) and returns standard base64.
	///
	/// The private-key operation is blinded with OS randomness because part of every redirect
	/// message comes from the inbound request. Blinding does not change the signature bytes.
	pub fn sign(&self, message: &[u8]) -> Result<String, SigningError> {
		let signature =
			self.signing_key.try_sign_with_rng(&mut OsRng, message).map_err(SigningError::Sign)?;

		Ok(STANDARD.encode(signature.to_bytes()))
	}
}
impl Debug for KeyMaterial {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("KeyMaterial")
			.field("key_id", &self.key_id)
			.field("private_key", &"<redacted>")
			.finish()
	}
}

fn parse_private_key(pem: &str) -> Result<RsaPrivateKey, SigningError> {
	match RsaPrivateKey::from_pkcs8_pem(pem) {
		Ok(key) => Ok(key),
		Err(pkcs8) => RsaPrivateKey::from_pkcs1_pem(pem)
			.map_err(|pkcs1| SigningError::MalformedKey { reason: format!("{pkcs8}; {pkcs1}") }),
	}
}
