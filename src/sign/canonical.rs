//! Canonical redirect query construction.

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
// self
use crate::{_prelude::*, sign};

/// Field names of a redirect query, in the exact order they are serialized and signed.
///
/// Identity fields (`cid`, `company`, `country`, `email`, `firstName`, `lastName`, `state`) are
/// always sent empty; the identity provider fills them after authentication.
pub const REDIRECT_FIELDS: [&str; 12] = [
	"cid",
	"company",
	"country",
	"email",
	"firstName",
	"keyid",
	"lastName",
	"nonce",
	"now",
	"permissions",
	"returnto",
	"state",
];

// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, matching `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'!')
	.remove(b'~')
	.remove(b'*')
	.remove(b'\'')
	.remove(b'(')
	.remove(b')');

/// Percent-encodes a string component the way the identity provider decodes it.
pub fn encode_component(value: &str) -> String {
	utf8_percent_encode(value, COMPONENT).to_string()
}

/// Inputs that vary per redirect.
///
/// [`RedirectParams::new`] draws a fresh nonce and reads the clock; [`with_nonce`] and [`at`]
/// exist so a request can be reproduced exactly.
///
/// [`with_nonce`]: RedirectParams::with_nonce
/// [`at`]: RedirectParams::at
#[derive(Clone, Debug)]
pub struct RedirectParams {
	/// Fully-qualified URL the provider redirects back to.
	pub return_url: String,
	/// JSON-serialized permissions descriptor.
	pub permissions: String,
	/// Per-request random string.
	pub nonce: String,
	/// Moment rendered into the `now` field.
	pub now: OffsetDateTime,
}
impl RedirectParams {
	/// Creates parameters with a fresh nonce and the current UTC time.
	pub fn new(return_url: impl Into<String>, permissions: impl Into<String>) -> Self {
		Self {
			return_url: return_url.into(),
			permissions: permissions.into(),
			nonce: sign::generate_nonce(),
			now: OffsetDateTime::now_utc(),
		}
	}

	/// Overrides the nonce.
	pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
		self.nonce = nonce.into();

		self
	}

	/// Overrides the timestamp.
	pub fn at(mut self, now: OffsetDateTime) -> Self {
		self.now = now;

		self
	}
}

/// Ordered key-value pairs of a redirect query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalQuery(Vec<(&'static str, String)>);
impl CanonicalQuery {
	/// Builds the redirect query. Field order always follows [`REDIRECT_FIELDS`].
	pub fn redirect(
		key_id: &str,
		nonce: &str,
		now: &str,
		permissions: &str,
		return_url: &str,
	) -> Self {
		let pairs = REDIRECT_FIELDS
			.iter()
			.map(|&field| {
				let value = match field {
					"keyid" => key_id,
					"nonce" => nonce,
					"now" => now,
					"permissions" => permissions,
					"returnto" => return_url,
					_ => "",
				};

				(field, value.to_owned())
			})
			.collect();

		Self(pairs)
	}

	/// Returns the value for `field`, if present.
	pub fn get(&self, field: &str) -> Option<&str> {
		self.0.iter().find(|(name, _)| *name == field).map(|(_, value)| value.as_str())
	}

	/// Iterates over the pairs in serialization order.
	pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
		self.0.iter().map(|(name, value)| (*name, value.as_str()))
	}

	/// Serializes as `key=value&key=value…` with percent-encoded values.
	pub fn encode(&self) -> String {
		let mut buf = String::new();

		for (idx, (name, value)) in self.0.iter().enumerate() {
			if idx > 0 {
				buf.push('&');
			}

			buf.push_str(name);
			buf.push('=');
			buf.push_str(&encode_component(value));
		}

		buf
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn component_encoding_keeps_unreserved_marks() {
		assert_eq!(encode_component("a b&c=d/e?f"), "a%20b%26c%3Dd%2Fe%3Ff");
		assert_eq!(encode_component("-_.!~*'()"), "-_.!~*'()");
		assert_eq!(encode_component("+/="), "%2B%2F%3D");
		assert_eq!(encode_component("é"), "%C3%A9");
	}

	#[test]
	fn query_field_order_is_fixed() {
		let query = CanonicalQuery::redirect(
			"k1",
			"nonce",
			"Thu, 15 Oct 2026 12:00:00 GMT",
			"{}",
			"https://app.example/cb",
		);
		let names = query.iter().map(|(name, _)| name).collect::<Vec<_>>();

		assert_eq!(names, REDIRECT_FIELDS);
		assert_eq!(query.get("keyid"), Some("k1"));
		assert_eq!(query.get("email"), Some(""));
		assert_eq!(query.get("sig"), None);
	}

	#[test]
	fn query_encoding_matches_form_layout() {
		let query = CanonicalQuery::redirect(
			"k1",
			"aB3dE5g",
			"Thu, 15 Oct 2026 12:00:00 GMT",
			"{\"read\":true}",
			"https://app.example/cb",
		);

		assert_eq!(
			query.encode(),
			"cid=&company=&country=&email=&firstName=&keyid=k1&lastName=&nonce=aB3dE5g\
			 &now=Thu%2C%2015%20Oct%202026%2012%3A00%3A00%20GMT\
			 &permissions=%7B%22read%22%3Atrue%7D&returnto=https%3A%2F%2Fapp.example%2Fcb&state="
		);
	}
}
