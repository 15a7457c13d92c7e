//! Walks one client through the handshake: redirect to the identity provider, return with a
//! token, and reuse of the issued session cookie.

// crates.io
use color_eyre::Result;
use serde_json::json;
use url::Url;
// self
use sso_handshake::{
	config::SsoSettings,
	handshake::{AuthOutcome, AuthRequest, ReqwestAuthenticator},
};

const DEMO_KEY_PEM: &str = include_str!("../tests/fixtures/sso_signing_key.pem");

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	// No `apiBaseUrl`, so returned tokens are accepted without a profile call.
	let settings = SsoSettings {
		url: "https://sso.example.com/login".into(),
		key_id: "demo-key".into(),
		private_key: Some(DEMO_KEY_PEM.into()),
		permissions: Some(json!({ "read": true })),
		..Default::default()
	};
	let auth = ReqwestAuthenticator::new(sso_handshake::config::SsoConfig::from_settings(settings)?)?;
	let codec = auth.config.cookie.clone();
	let first = AuthRequest::from_url(&Url::parse("https://app.example.com/reports?page=2")?);

	if let AuthOutcome::Redirect { target } = auth.authenticate(&first).await? {
		println!("Send the client to {target}.");
		println!("Nonce {} issued at {}.", target.request.nonce(), target.request.now());
	}

	// Simulate the identity provider sending the client back with a token.
	let returned =
		AuthRequest::from_url(&Url::parse("https://app.example.com/reports?page=2&token=demo")?);
	let outcome = auth.authenticate(&returned).await?;
	let Some(state) = outcome.state_to_persist() else {
		eprintln!("Expected a freshly issued session, got {}.", outcome.state());

		return Ok(());
	};
	let cookie = codec.set_cookie_value(state)?;

	println!("Set-Cookie: {cookie}.");

	let next = AuthRequest::new("https", "app.example.com", "/reports?page=3")
		.with_cookie_header(&codec, &cookie)?;
	let outcome = auth.authenticate(&next).await?;

	println!("Follow-up request is {}.", outcome.state());

	Ok(())
}
