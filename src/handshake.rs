//! Per-request session state machine.
//!
//! [`Authenticator::authenticate`] looks at one inbound request and decides between reusing the
//! session cookie, resolving a returned token into a new session, and redirecting to the
//! identity provider. The HTTPS precondition is checked before anything else, so an insecure
//! request never triggers signing or a network call.

pub mod outcome;
pub mod request;

pub use outcome::*;
pub use request::*;

// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;
use crate::{
	_prelude::*,
	auth::{Profile, SessionState, SsoToken},
	config::{ProfileFailurePolicy, SsoConfig},
	error::{ConfigError, ProfileFetchError},
	http::ProfileHttpClient,
	obs::{self, HandshakeStage, StageOutcome, StageSpan},
	profile::TokenExchangeClient,
	redirect::RedirectUrlBuilder,
};

#[cfg(feature = "reqwest")]
/// Authenticator specialized for the crate's default reqwest transport.
pub type ReqwestAuthenticator = Authenticator<ReqwestHttpClient>;

/// Drives the SSO handshake for inbound requests.
///
/// The configuration and HTTP client are shared read-only, so one instance serves any number
/// of concurrent requests without locking.
pub struct Authenticator<C>
where
	C: ?Sized + ProfileHttpClient,
{
	/// Immutable handshake configuration.
	pub config: Arc<SsoConfig>,
	/// Transport used for profile fetches.
	pub http_client: Arc<C>,
}
impl<C> Authenticator<C>
where
	C: ?Sized + ProfileHttpClient,
{
	/// Creates an authenticator around a caller-provided transport.
	pub fn with_http_client(config: impl Into<Arc<SsoConfig>>, http_client: impl Into<Arc<C>>) -> Self {
		Self { config: config.into(), http_client: http_client.into() }
	}

	/// Redirect builder bound to the configured provider, permissions, and key.
	pub fn redirect_builder(&self) -> RedirectUrlBuilder<'_> {
		RedirectUrlBuilder::new(&self.config.provider_url, &self.config.permissions, &self.config.key)
	}

	/// Profile client, or `None` when no API base URL is configured.
	pub fn token_exchange(&self) -> Option<TokenExchangeClient<C>> {
		self.config.profile_endpoint.as_ref().map(|endpoint| {
			TokenExchangeClient::new(self.http_client.clone(), endpoint.clone())
				.with_timeout(self.config.profile_timeout)
		})
	}

	/// State the request enters the handshake in.
	pub fn entry_state(&self, request: &AuthRequest) -> HandshakeState {
		if request.session.as_ref().is_some_and(SessionState::is_valid) {
			HandshakeState::Authenticated
		} else if request.token.is_some() {
			HandshakeState::TokenReceivedPendingProfile
		} else {
			HandshakeState::NoSession
		}
	}

	/// Runs one handshake cycle for `request`.
	pub async fn authenticate(&self, request: &AuthRequest) -> Result<AuthOutcome> {
		self.ensure_transport_allowed(request)?;

		match (self.entry_state(request), &request.session, &request.token) {
			(HandshakeState::Authenticated, Some(session), _) => Ok(self.reuse_session(session)),
			(HandshakeState::TokenReceivedPendingProfile, _, Some(token)) =>
				self.resolve_token(token.clone()).await,
			_ => self.redirect(request),
		}
	}

	fn ensure_transport_allowed(&self, request: &AuthRequest) -> Result<()> {
		if self.config.is_secure && !request.is_https() {
			Err(ConfigError::InsecureTransport { protocol: request.protocol.clone() }.into())
		} else {
			Ok(())
		}
	}

	fn reuse_session(&self, session: &SessionState) -> AuthOutcome {
		obs::record_stage_outcome(HandshakeStage::SessionReuse, StageOutcome::Success);

		AuthOutcome::Continue { credentials: session.clone(), issued: false, profile_error: None }
	}

	fn redirect(&self, request: &AuthRequest) -> Result<AuthOutcome> {
		const STAGE: HandshakeStage = HandshakeStage::Redirect;

		let span = StageSpan::new(STAGE, "redirect");
		let _guard = span.clone().entered();

		obs::record_stage_outcome(STAGE, StageOutcome::Attempt);

		let result = self.redirect_builder().build(&request.return_url());

		obs::finish_stage(&span, STAGE, &result);

		Ok(AuthOutcome::Redirect { target: result? })
	}

	async fn resolve_token(&self, token: SsoToken) -> Result<AuthOutcome> {
		const STAGE: HandshakeStage = HandshakeStage::TokenExchange;

		let span = StageSpan::new(STAGE, "resolve_token");

		obs::record_stage_outcome(STAGE, StageOutcome::Attempt);

		let result = span.instrument(self.issue_session(token)).await;

		obs::finish_stage(&span, STAGE, &result);

		result
	}

	async fn issue_session(&self, token: SsoToken) -> Result<AuthOutcome> {
		let Some(client) = self.token_exchange() else {
			return Ok(AuthOutcome::Continue {
				credentials: SessionState::new(token, Profile::default()),
				issued: true,
				profile_error: None,
			});
		};
		let (profile, profile_error) = match client.fetch_profile(&token, &self.config.key).await {
			Ok(profile) => (profile, None),
			// Signing failures stay fatal under every policy.
			Err(ProfileFetchError::Signing(e)) => return Err(e.into()),
			Err(e) => match self.config.profile_failure_policy {
				ProfileFailurePolicy::Continue => {
					obs::report_profile_failure(&e);

					(Profile::default(), Some(e))
				},
				ProfileFailurePolicy::Fail => return Err(e.into()),
			},
		};

		Ok(AuthOutcome::Continue {
			credentials: SessionState::new(token, profile),
			issued: true,
			profile_error,
		})
	}
}
#[cfg(feature = "reqwest")]
impl Authenticator<ReqwestHttpClient> {
	/// Creates an authenticator with its own reqwest transport.
	///
	/// Certificate validation follows [`SsoConfig::accept_invalid_certs`].
	pub fn new(config: SsoConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::with_certificate_validation(config.accept_invalid_certs)?;

		Ok(Self::with_http_client(config, http_client))
	}
}
impl<C> Clone for Authenticator<C>
where
	C: ?Sized + ProfileHttpClient,
{
	fn clone(&self) -> Self {
		Self { config: self.config.clone(), http_client: self.http_client.clone() }
	}
}
impl<C> Debug for Authenticator<C>
where
	C: ?Sized + ProfileHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authenticator")
			.field("provider_url", &self.config.provider_url)
			.field("key_id", &self.config.key.key_id())
			.field("fetches_profile", &self.config.fetches_profile())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{
		_preludet::test_config_builder,
		error::TransportError,
		http::{HttpFuture, HttpGet, HttpReply},
		sign,
	};

	#[derive(Default)]
	struct CountingHttpClient {
		status: u16,
		body: &'static str,
		calls: AtomicUsize,
	}
	impl CountingHttpClient {
		fn replying(status: u16, body: &'static str) -> Self {
			Self { status, body, calls: AtomicUsize::new(0) }
		}
	}
	impl ProfileHttpClient for CountingHttpClient {
		fn get(&self, _request: HttpGet) -> HttpFuture<'_> {
			self.calls.fetch_add(1, Ordering::SeqCst);

			let reply = HttpReply { status: self.status, body: self.body.as_bytes().to_vec() };

			Box::pin(async move { Ok::<_, TransportError>(reply) })
		}
	}

	fn authenticator(
		config: SsoConfig,
		client: CountingHttpClient,
	) -> (Authenticator<CountingHttpClient>, Arc<CountingHttpClient>) {
		let client = Arc::new(client);

		(Authenticator::with_http_client(config, client.clone()), client)
	}

	fn existing_session() -> SessionState {
		SessionState::new(SsoToken::new("abc"), Profile::default())
	}

	#[tokio::test]
	async fn existing_session_short_circuits() {
		let config = test_config_builder("k1")
			.api_base_url("https://api.example.com")
			.build()
			.expect("Config should build.");
		let (auth, client) = authenticator(config, CountingHttpClient::replying(200, "{}"));
		let request = AuthRequest::new("https", "app.example", "/")
			.with_session(existing_session())
			.with_token("ignored");
		let outcome = auth.authenticate(&request).await.expect("Session reuse should succeed.");

		assert_eq!(outcome.state(), HandshakeState::Authenticated);
		assert_eq!(outcome.credentials().map(|s| s.token.expose()), Some("abc"));
		assert!(outcome.state_to_persist().is_none());
		assert_eq!(client.calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn missing_session_redirects_with_return_url() {
		let config = test_config_builder("k1").build().expect("Config should build.");
		let public_key = config.key.public_key().clone();
		let (auth, _) = authenticator(config, CountingHttpClient::default());
		let request = AuthRequest::new("https", "app.example", "/cb?x=1");

		assert_eq!(auth.entry_state(&request), HandshakeState::NoSession);

		let outcome = auth.authenticate(&request).await.expect("Redirect should succeed.");
		let target = outcome.redirect_target().expect("Outcome should redirect.");

		assert_eq!(outcome.state(), HandshakeState::RedirectRequired);
		assert_eq!(target.request.query.get("returnto"), Some("https://app.example/cb?x=1"));
		assert!(outcome.state_to_persist().is_none());

		sign::verify_redirect_url(target.as_str(), &public_key)
			.expect("Redirect signature should verify.");
	}

	#[tokio::test]
	async fn invalid_session_is_treated_as_absent() {
		let config = test_config_builder("k1").build().expect("Config should build.");
		let (auth, _) = authenticator(config, CountingHttpClient::default());
		let request = AuthRequest::new("https", "app.example", "/")
			.with_session(SessionState::new(SsoToken::new(""), Profile::default()));
		let outcome = auth.authenticate(&request).await.expect("Redirect should succeed.");

		assert_eq!(outcome.state(), HandshakeState::RedirectRequired);
	}

	#[tokio::test]
	async fn token_without_profile_endpoint_skips_fetch() {
		let config = test_config_builder("k1").build().expect("Config should build.");
		let (auth, client) = authenticator(config, CountingHttpClient::replying(200, "{}"));
		let request = AuthRequest::new("https", "app.example", "/cb").with_token("tok");

		assert_eq!(auth.entry_state(&request), HandshakeState::TokenReceivedPendingProfile);

		let outcome = auth.authenticate(&request).await.expect("Token resolution should succeed.");
		let persisted = outcome.state_to_persist().expect("New session should be persisted.");

		assert_eq!(persisted.token.expose(), "tok");
		assert!(persisted.profile.is_empty());
		assert_eq!(client.calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn token_with_profile_endpoint_resolves_profile() {
		let config = test_config_builder("k1")
			.api_base_url("https://api.example.com")
			.build()
			.expect("Config should build.");
		let (auth, client) =
			authenticator(config, CountingHttpClient::replying(200, r#"{"email":"a@b.c"}"#));
		let request = AuthRequest::new("https", "app.example", "/cb").with_token("tok");
		let outcome = auth.authenticate(&request).await.expect("Token resolution should succeed.");

		match outcome {
			AuthOutcome::Continue { credentials, issued, profile_error } => {
				assert!(issued);
				assert!(profile_error.is_none());
				assert_eq!(credentials.profile.get("email"), Some(&json!("a@b.c")));
			},
			other => panic!("Unexpected outcome: {other:?}."),
		}

		assert_eq!(client.calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn profile_failure_policy_decides_outcome() {
		let tolerant = test_config_builder("k1")
			.api_base_url("https://api.example.com")
			.build()
			.expect("Config should build.");
		let (auth, _) = authenticator(tolerant, CountingHttpClient::replying(500, "boom"));
		let request = AuthRequest::new("https", "app.example", "/cb").with_token("tok");
		let outcome = auth.authenticate(&request).await.expect("Tolerant policy should continue.");

		match outcome {
			AuthOutcome::Continue { credentials, issued, profile_error } => {
				assert!(issued);
				assert!(credentials.profile.is_empty());
				assert!(matches!(
					profile_error,
					Some(ProfileFetchError::Status { status: 500, .. })
				));
			},
			other => panic!("Unexpected outcome: {other:?}."),
		}

		let strict = test_config_builder("k1")
			.api_base_url("https://api.example.com")
			.profile_failure_policy(ProfileFailurePolicy::Fail)
			.build()
			.expect("Config should build.");
		let (auth, _) = authenticator(strict, CountingHttpClient::replying(500, "boom"));
		let err = auth.authenticate(&request).await.expect_err("Strict policy should fail.");

		assert!(matches!(err, Error::ProfileFetch(ProfileFetchError::Status { status: 500, .. })));
	}

	#[tokio::test]
	async fn insecure_request_is_rejected_before_any_work() {
		let config = test_config_builder("k1")
			.api_base_url("https://api.example.com")
			.is_secure(true)
			.build()
			.expect("Config should build.");
		let (auth, client) = authenticator(config, CountingHttpClient::replying(200, "{}"));

		for request in [
			AuthRequest::new("http", "app.example", "/"),
			AuthRequest::new("http", "app.example", "/cb").with_token("tok"),
			AuthRequest::new("http", "app.example", "/").with_session(existing_session()),
		] {
			let err = auth.authenticate(&request).await.expect_err("Plain HTTP should fail.");

			assert!(matches!(err, Error::Config(ConfigError::InsecureTransport { .. })));
		}

		assert_eq!(client.calls.load(Ordering::SeqCst), 0);

		let outcome = auth
			.authenticate(&AuthRequest::new("https", "app.example", "/"))
			.await
			.expect("HTTPS should pass the precondition.");

		assert_eq!(outcome.state(), HandshakeState::RedirectRequired);
	}
}
