//! Host-supplied view of an inbound request.

// self
use crate::{
	_prelude::*,
	auth::{SessionCookie, SessionCookieError, SessionState, SsoToken},
};

/// Query parameter carrying the token on the way back from the identity provider.
pub const TOKEN_PARAM: &str = "token";

/// The parts of an inbound request the handshake looks at.
#[derive(Clone, Debug)]
pub struct AuthRequest {
	/// Protocol the request arrived over (`http` or `https`).
	pub protocol: String,
	/// Host header value, including any port.
	pub host: String,
	/// Path plus query string, as received.
	pub path: String,
	/// Token returned by the identity provider, if present and non-empty.
	pub token: Option<SsoToken>,
	/// Session state decoded from the cookie, if any.
	pub session: Option<SessionState>,
}
impl AuthRequest {
	/// Creates a request without token or session.
	pub fn new(
		protocol: impl Into<String>,
		host: impl Into<String>,
		path: impl Into<String>,
	) -> Self {
		Self {
			protocol: protocol.into(),
			host: host.into(),
			path: path.into(),
			token: None,
			session: None,
		}
	}

	/// Derives protocol, host, path, and token from an absolute request URL.
	pub fn from_url(url: &Url) -> Self {
		let host = match (url.host_str(), url.port()) {
			(Some(host), Some(port)) => format!("{host}:{port}"),
			(Some(host), None) => host.to_owned(),
			(None, _) => String::new(),
		};
		let path = match url.query() {
			Some(query) => format!("{}?{query}", url.path()),
			None => url.path().to_owned(),
		};
		let token = url
			.query_pairs()
			.find(|(name, _)| name == TOKEN_PARAM)
			.map(|(_, value)| value.into_owned());
		let request = Self::new(url.scheme(), host, path);

		match token {
			Some(token) => request.with_token(token),
			None => request,
		}
	}

	/// Attaches the returned token. Empty tokens are ignored.
	pub fn with_token(mut self, token: impl Into<String>) -> Self {
		let token = SsoToken::new(token);

		self.token = if token.is_empty() { None } else { Some(token) };

		self
	}

	/// Attaches decoded session state.
	pub fn with_session(mut self, session: SessionState) -> Self {
		self.session = Some(session);

		self
	}

	/// Decodes the session cookie from a `Cookie` header and attaches it when present.
	pub fn with_cookie_header(
		mut self,
		codec: &SessionCookie,
		cookie_header: &str,
	) -> Result<Self, SessionCookieError> {
		if let Some(session) = codec.read(cookie_header)? {
			self.session = Some(session);
		}

		Ok(self)
	}

	/// Returns `true` when the request arrived over HTTPS.
	pub fn is_https(&self) -> bool {
		self.protocol.eq_ignore_ascii_case("https")
	}

	/// URL the identity provider should send the client back to.
	pub fn return_url(&self) -> String {
		format!("{}://{}{}", self.protocol, self.host, self.path)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::Profile;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Request URL fixture should parse.")
	}

	#[test]
	fn from_url_keeps_port_path_and_query() {
		let request = AuthRequest::from_url(&url("http://app.local:8080/dash?tab=2"));

		assert_eq!(request.protocol, "http");
		assert_eq!(request.host, "app.local:8080");
		assert_eq!(request.path, "/dash?tab=2");
		assert!(!request.is_https());
		assert!(request.token.is_none());
		assert_eq!(request.return_url(), "http://app.local:8080/dash?tab=2");
	}

	#[test]
	fn from_url_extracts_non_empty_token() {
		let request = AuthRequest::from_url(&url("https://app.example/cb?token=abc%20d"));

		assert_eq!(request.token.as_ref().map(SsoToken::expose), Some("abc d"));
		assert!(request.is_https());

		let request = AuthRequest::from_url(&url("https://app.example/cb?token="));

		assert!(request.token.is_none());
	}

	#[test]
	fn cookie_header_attaches_session() {
		let codec = SessionCookie::default();
		let state = SessionState::new(SsoToken::new("abc"), Profile::default());
		let header = codec.set_cookie_value(&state).expect("State should encode.");
		let request = AuthRequest::new("https", "app.example", "/")
			.with_cookie_header(&codec, &header)
			.expect("Cookie should decode.");

		assert_eq!(request.session, Some(state));

		let request = AuthRequest::new("https", "app.example", "/")
			.with_cookie_header(&codec, "other=1")
			.expect("Unrelated cookies should be ignored.");

		assert!(request.session.is_none());
	}
}
