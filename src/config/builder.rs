// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::SessionCookie,
	config::{DEFAULT_PROFILE_TIMEOUT, PROFILE_PATH, ProfileFailurePolicy, SsoConfig},
	error::ConfigError,
	key::KeyMaterial,
};

/// Builder for [`SsoConfig`] values.
#[derive(Debug)]
pub struct SsoConfigBuilder {
	/// Signing key material.
	pub key: KeyMaterial,
	/// Identity provider login URL.
	pub provider_url: Option<String>,
	/// Session cookie name.
	pub cookie_name: String,
	/// Provider API base URL; empty disables profile fetches.
	pub api_base_url: String,
	/// Permissions descriptor; serialized as `{}` when unset.
	pub permissions: Option<Value>,
	/// Enforce HTTPS-only operation.
	pub is_secure: bool,
	/// Profile-fetch deadline.
	pub profile_timeout: StdDuration,
	/// Skip certificate validation on the profile transport.
	pub accept_invalid_certs: bool,
	/// Profile failure handling.
	pub profile_failure_policy: ProfileFailurePolicy,
}
impl SsoConfigBuilder {
	/// Creates a new builder seeded with the provided key.
	pub fn new(key: KeyMaterial) -> Self {
		Self {
			key,
			provider_url: None,
			cookie_name: crate::auth::DEFAULT_COOKIE_NAME.into(),
			api_base_url: String::new(),
			permissions: None,
			is_secure: false,
			profile_timeout: DEFAULT_PROFILE_TIMEOUT,
			accept_invalid_certs: false,
			profile_failure_policy: ProfileFailurePolicy::default(),
		}
	}

	/// Sets the identity provider login URL.
	pub fn provider_url(mut self, url: impl Into<String>) -> Self {
		self.provider_url = Some(url.into());

		self
	}

	/// Overrides the session cookie name.
	pub fn cookie_name(mut self, name: impl Into<String>) -> Self {
		self.cookie_name = name.into();

		self
	}

	/// Sets the provider API base URL. An empty string disables profile fetches.
	pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
		self.api_base_url = url.into();

		self
	}

	/// Sets the permissions descriptor.
	pub fn permissions(mut self, permissions: Value) -> Self {
		self.permissions = Some(permissions);

		self
	}

	/// Toggles HTTPS enforcement.
	pub fn is_secure(mut self, is_secure: bool) -> Self {
		self.is_secure = is_secure;

		self
	}

	/// Overrides the profile-fetch deadline.
	pub fn profile_timeout(mut self, timeout: StdDuration) -> Self {
		self.profile_timeout = timeout;

		self
	}

	/// Toggles certificate validation on the profile transport.
	pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
		self.accept_invalid_certs = accept;

		self
	}

	/// Overrides the profile failure policy.
	pub fn profile_failure_policy(mut self, policy: ProfileFailurePolicy) -> Self {
		self.profile_failure_policy = policy;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<SsoConfig, ConfigError> {
		let provider_url = self
			.provider_url
			.filter(|url| !url.trim().is_empty())
			.ok_or(ConfigError::MissingProviderUrl)?;

		validate_provider_url(&provider_url)?;

		let api_base_url = parse_api_base_url(&self.api_base_url)?;
		let profile_endpoint = api_base_url.as_ref().map(profile_endpoint).transpose()?;
		let permissions = match self.permissions {
			Some(value) =>
				serde_json::to_string(&sort_keys(value)).map_err(ConfigError::Permissions)?,
			None => "{}".into(),
		};

		Ok(SsoConfig {
			provider_url,
			key: self.key,
			cookie: SessionCookie::new(self.cookie_name),
			api_base_url,
			profile_endpoint,
			permissions,
			is_secure: self.is_secure,
			profile_timeout: self.profile_timeout,
			accept_invalid_certs: self.accept_invalid_certs,
			profile_failure_policy: self.profile_failure_policy,
		})
	}
}

// Emits object keys in sorted order at every depth.
fn sort_keys(value: Value) -> Value {
	match value {
		Value::Object(map) => {
			let mut entries = map.into_iter().collect::<Vec<_>>();

			entries.sort_by(|(a, _), (b, _)| a.cmp(b));

			Value::Object(entries.into_iter().map(|(k, v)| (k, sort_keys(v))).collect())
		},
		Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
		other => other,
	}
}

fn validate_provider_url(raw: &str) -> Result<(), ConfigError> {
	let url = Url::parse(raw)
		.map_err(|source| ConfigError::InvalidUrl { field: "provider", source })?;

	if url.query().is_some() || url.fragment().is_some() {
		Err(ConfigError::ProviderUrlNotBare { url: raw.to_owned() })
	} else {
		Ok(())
	}
}

fn parse_api_base_url(raw: &str) -> Result<Option<Url>, ConfigError> {
	let trimmed = raw.trim();

	if trimmed.is_empty() {
		return Ok(None);
	}

	Url::parse(trimmed)
		.map(Some)
		.map_err(|source| ConfigError::InvalidUrl { field: "api base", source })
}

fn profile_endpoint(base: &Url) -> Result<Url, ConfigError> {
	let joined = format!("{}{PROFILE_PATH}", base.as_str().trim_end_matches('/'));

	Url::parse(&joined).map_err(|source| ConfigError::InvalidUrl { field: "profile", source })
}
