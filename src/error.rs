//! Handshake-level error types shared across signing, profile exchange, and session handling.

// self
use crate::_prelude::*;

/// Handshake-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical handshake error exposed by public APIs.
///
/// Hosts map every variant to the "fail" action. [`Error::Config`] and [`Error::Signing`] are
/// always fatal; [`Error::ProfileFetch`] only reaches callers when the configured
/// [`ProfileFailurePolicy`](crate::config::ProfileFailurePolicy) says so.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Cryptographic failure while producing a signature.
	#[error(transparent)]
	Signing(#[from] SigningError),
	/// Profile endpoint could not resolve the returned token.
	#[error(transparent)]
	ProfileFetch(#[from] ProfileFetchError),
	/// Session cookie could not be decoded.
	///
	/// The crate returns [`SessionCookieError`](crate::auth::SessionCookieError) directly from the
	/// cookie codec; this variant lets hosts fold cookie reads into the same `?` chain as
	/// [`Authenticator::authenticate`](crate::handshake::Authenticator::authenticate).
	#[error(transparent)]
	SessionCookie(#[from] crate::auth::SessionCookieError),
}

/// Configuration and validation failures raised before any signing or network call.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// No private key was configured.
	#[error("No private signing key is configured.")]
	MissingKeyMaterial,
	/// The key file could not be read.
	#[error("Private key file `{path}` could not be read.")]
	KeyRead {
		/// Path that failed to load.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// The key identifier is empty.
	#[error("Signing key identifier cannot be empty.")]
	MissingKeyId,
	/// The identity provider URL is missing.
	#[error("Identity provider URL is not configured.")]
	MissingProviderUrl,
	/// A configured URL cannot be parsed.
	#[error("The {field} URL is invalid.")]
	InvalidUrl {
		/// Configuration field that failed to parse.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The provider URL already carries a query or fragment.
	#[error("Identity provider URL must not carry a query or fragment: {url}.")]
	ProviderUrlNotBare {
		/// Offending URL.
		url: String,
	},
	/// Settings document could not be decoded.
	#[error("SSO settings are malformed.")]
	Settings {
		/// Path-aware decoding failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Permissions descriptor cannot be serialized to JSON.
	#[error("Permissions descriptor cannot be serialized.")]
	Permissions(#[source] serde_json::Error),
	/// HTTPS is required but the inbound request arrived over another protocol.
	#[error("Invalid setting - is_secure must be disabled for a non-https server (got {protocol}).")]
	InsecureTransport {
		/// Protocol of the inbound request.
		protocol: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Cryptographic failures. These are never skipped because an unsigned or malformed signature
/// breaks the trust boundary with the identity provider.
#[derive(Debug, ThisError)]
pub enum SigningError {
	/// Key bytes are not a PEM-encoded RSA private key.
	#[error("Private key is not a valid PEM-encoded RSA key.")]
	MalformedKey {
		/// PKCS#8 and PKCS#1 decoding failures, in that order.
		reason: String,
	},
	/// The signer rejected the message.
	#[error("RSA-SHA256 signing failed.")]
	Sign(#[source] rsa::signature::Error),
	/// A signature did not verify against the public key.
	#[error("Signature verification failed.")]
	Verify(#[source] rsa::signature::Error),
	/// The redirect URL carries no trailing `sig` parameter.
	#[error("Redirect URL carries no `sig` parameter.")]
	MissingSignature,
	/// The signature is not valid base64.
	#[error("Signature is not valid base64.")]
	SignatureEncoding(#[from] base64::DecodeError),
	/// The timestamp could not be rendered as an HTTP-date.
	#[error("Timestamp cannot be rendered as an HTTP-date.")]
	Timestamp(#[from] time::error::Format),
}

/// Failures raised while exchanging a token for a profile.
#[derive(Debug, ThisError)]
pub enum ProfileFetchError {
	/// The request never produced a response.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The profile endpoint answered with a non-2xx status.
	#[error("Profile endpoint returned HTTP {status}: {body_preview}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Truncated response body for diagnostics.
		body_preview: String,
	},
	/// The profile endpoint answered with something other than a JSON object.
	#[error("Profile endpoint returned malformed JSON.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The signed header could not be produced.
	#[error(transparent)]
	Signing(#[from] SigningError),
}

/// Transport-level failures.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the profile endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request exceeded the configured profile timeout.
	#[error("Profile endpoint did not answer within the configured timeout.")]
	Timeout,
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}
