//! Token-to-profile exchange against the identity provider's profile endpoint.
//!
//! Every call carries a freshly signed [`SignedHeader`]. Failures are returned as
//! [`ProfileFetchError`]; deciding whether a missing profile is fatal is left to the
//! [`Authenticator`](crate::handshake::Authenticator).

// self
use crate::{
	_prelude::*,
	auth::{Profile, SsoToken},
	config::DEFAULT_PROFILE_TIMEOUT,
	error::ProfileFetchError,
	http::{HttpGet, ProfileHttpClient},
	key::KeyMaterial,
	obs::{self, HandshakeStage, StageOutcome, StageSpan},
	sign::SignedHeader,
};

const BODY_PREVIEW_LIMIT: usize = 256;

/// Client for the profile endpoint.
pub struct TokenExchangeClient<C>
where
	C: ?Sized + ProfileHttpClient,
{
	http_client: Arc<C>,
	endpoint: Url,
	timeout: StdDuration,
}
impl<C> TokenExchangeClient<C>
where
	C: ?Sized + ProfileHttpClient,
{
	/// Creates a client for `endpoint` with the default timeout.
	pub fn new(http_client: Arc<C>, endpoint: Url) -> Self {
		Self { http_client, endpoint, timeout: DEFAULT_PROFILE_TIMEOUT }
	}

	/// Overrides the request deadline. A timed-out request is a [`ProfileFetchError`].
	///
	/// The deadline travels to the transport as [`HttpGet::timeout`] and is enforced there, not
	/// here. A [`ProfileHttpClient`] that ignores it can stall the handshake indefinitely;
	/// [`ReqwestHttpClient`](crate::http::ReqwestHttpClient) honors it.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Profile endpoint URL.
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	/// Resolves `token` to the provider's profile, signing the request with `key`.
	pub async fn fetch_profile(
		&self,
		token: &SsoToken,
		key: &KeyMaterial,
	) -> Result<Profile, ProfileFetchError> {
		const STAGE: HandshakeStage = HandshakeStage::ProfileFetch;

		let span = StageSpan::new(STAGE, "fetch_profile");

		obs::record_stage_outcome(STAGE, StageOutcome::Attempt);

		let result = span
			.instrument(async move {
				let header = SignedHeader::new(token, key, OffsetDateTime::now_utc())?;
				let request = HttpGet {
					url: self.endpoint.clone(),
					headers: header.headers(),
					timeout: Some(self.timeout),
				};
				let reply = self.http_client.get(request).await?;

				if !reply.is_success() {
					return Err(ProfileFetchError::Status {
						status: reply.status,
						body_preview: truncate_preview(&reply.body),
					});
				}

				decode_profile(&reply.body)
			})
			.await;

		obs::finish_stage(&span, STAGE, &result);

		result
	}
}
impl<C> Debug for TokenExchangeClient<C>
where
	C: ?Sized + ProfileHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenExchangeClient")
			.field("endpoint", &self.endpoint)
			.field("timeout", &self.timeout)
			.finish()
	}
}

fn decode_profile(body: &[u8]) -> Result<Profile, ProfileFetchError> {
	let de = &mut serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(de).map_err(|source| ProfileFetchError::Decode { source })
}

fn truncate_preview(body: &[u8]) -> String {
	let body = String::from_utf8_lossy(body);

	if body.chars().count() <= BODY_PREVIEW_LIMIT {
		return body.into_owned();
	}

	let mut buf = body.chars().take(BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}
