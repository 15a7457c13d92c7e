//! Signed redirect targets for clients without a session.
//!
//! A target is single-use by convention: the identity provider redirects back once per issued
//! URL. Issued targets are not tracked locally, so replay protection rests on the provider
//! checking `nonce` and `now`.

// self
use crate::{
	_prelude::*,
	error::SigningError,
	key::KeyMaterial,
	sign::{self, RedirectParams, SignedRequest},
};

/// Redirect destination handed back to the host.
#[derive(Clone, Debug)]
pub struct RedirectTarget {
	/// The signed request behind [`RedirectTarget::url`].
	pub request: SignedRequest,
	url: String,
}
impl RedirectTarget {
	fn new(request: SignedRequest) -> Self {
		let url = request.signed_url();

		Self { request, url }
	}

	/// Full URL including the trailing `sig` parameter.
	pub fn as_str(&self) -> &str {
		&self.url
	}

	/// Parses the target into a [`Url`].
	pub fn to_url(&self) -> Result<Url, url::ParseError> {
		Url::parse(&self.url)
	}
}
impl AsRef<str> for RedirectTarget {
	fn as_ref(&self) -> &str {
		self.as_str()
	}
}
impl Display for RedirectTarget {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.url)
	}
}

/// Stateless composer of signed redirect URLs for one provider and key.
#[derive(Clone, Copy, Debug)]
pub struct RedirectUrlBuilder<'a> {
	provider_url: &'a str,
	permissions: &'a str,
	key: &'a KeyMaterial,
}
impl<'a> RedirectUrlBuilder<'a> {
	/// Creates a builder. `permissions` is the JSON-serialized permissions descriptor.
	pub fn new(provider_url: &'a str, permissions: &'a str, key: &'a KeyMaterial) -> Self {
		Self { provider_url, permissions, key }
	}

	/// Builds a target for `return_url` with a fresh nonce and timestamp.
	pub fn build(&self, return_url: &str) -> Result<RedirectTarget, SigningError> {
		self.build_with(&RedirectParams::new(return_url, self.permissions))
	}

	/// Builds a target from explicit parameters. The same parameters always yield the same URL.
	pub fn build_with(&self, params: &RedirectParams) -> Result<RedirectTarget, SigningError> {
		sign::sign_redirect_request(self.provider_url, params, self.key).map(RedirectTarget::new)
	}
}

/// One-shot form of [`RedirectUrlBuilder::build`].
pub fn build_redirect_url(
	provider_url: &str,
	return_url: &str,
	permissions: &str,
	key: &KeyMaterial,
) -> Result<RedirectTarget, SigningError> {
	RedirectUrlBuilder::new(provider_url, permissions, key).build(return_url)
}
