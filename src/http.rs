//! Transport primitives for the profile exchange.
//!
//! The handshake needs exactly one kind of outbound call: a `GET` with a handful of headers
//! that returns a status and a body. [`ProfileHttpClient`] captures that contract so hosts can
//! plug in their own HTTP stack; [`ReqwestHttpClient`] is the default implementation.

// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`ProfileHttpClient::get`].
pub type HttpFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpReply, TransportError>> + 'a + Send>>;

/// Outbound `GET` request.
#[derive(Clone, Debug)]
pub struct HttpGet {
	/// Absolute target URL.
	pub url: Url,
	/// Header name/value pairs, in send order. Names are lowercase.
	pub headers: Vec<(&'static str, String)>,
	/// Deadline for the whole exchange; `None` leaves it to the transport.
	pub timeout: Option<StdDuration>,
}

/// Response status and raw body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpReply {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl HttpReply {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Abstraction over HTTP transports able to perform the profile request.
///
/// Implementations must be `Send + Sync + 'static` so an
/// [`Authenticator`](crate::handshake::Authenticator) can share them across concurrent
/// requests, and the returned future must be `Send`. A request that exceeds
/// [`HttpGet::timeout`] must resolve to [`TransportError::Timeout`].
pub trait ProfileHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Performs `request` and returns the response regardless of its status.
	fn get(&self, request: HttpGet) -> HttpFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client, optionally skipping certificate validation.
	pub fn with_certificate_validation(
		accept_invalid_certs: bool,
	) -> Result<Self, crate::error::ConfigError> {
		let client =
			ReqwestClient::builder().danger_accept_invalid_certs(accept_invalid_certs).build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ProfileHttpClient for ReqwestHttpClient {
	fn get(&self, request: HttpGet) -> HttpFuture<'_> {
		Box::pin(async move {
			let mut builder = self.0.get(request.url);

			for (name, value) in request.headers {
				builder = builder.header(name, value);
			}
			if let Some(timeout) = request.timeout {
				builder = builder.timeout(timeout);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok::<_, TransportError>(HttpReply { status, body })
		})
	}
}
