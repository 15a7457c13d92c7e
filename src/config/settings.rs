// std
use std::path::PathBuf;
// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	config::{DEFAULT_PROFILE_TIMEOUT, ProfileFailurePolicy, SsoConfig},
	error::ConfigError,
	key::KeyMaterial,
};

/// Configuration document as hosts write it, using the camelCase option names.
///
/// ```json
/// {
///   "url": "https://sso.example.com/login",
///   "keyId": "k1",
///   "keyPath": "/etc/sso/key.pem",
///   "cookieName": "sso",
///   "apiBaseUrl": "https://api.example.com",
///   "permissions": { "read": true },
///   "isSecure": true
/// }
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SsoSettings {
	/// Identity provider login URL.
	pub url: String,
	/// Signing key identifier.
	pub key_id: String,
	/// Path to a PEM key file; ignored when `private_key` is set.
	pub key_path: Option<PathBuf>,
	/// Inline PEM key. Never serialized back out.
	#[serde(skip_serializing)]
	pub private_key: Option<String>,
	/// Session cookie name.
	pub cookie_name: String,
	/// Provider API base URL; empty disables profile fetches.
	pub api_base_url: String,
	/// Permissions descriptor.
	pub permissions: Option<Value>,
	/// Enforce HTTPS-only operation.
	pub is_secure: bool,
	/// Profile-fetch deadline in seconds.
	pub profile_timeout_secs: u64,
	/// Skip certificate validation on the profile transport.
	pub accept_invalid_certs: bool,
	/// Profile failure handling.
	pub profile_failure_policy: ProfileFailurePolicy,
}
impl SsoSettings {
	/// Parses a JSON settings document, reporting the path of the first invalid field.
	pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
		let de = &mut serde_json::Deserializer::from_str(raw);

		serde_path_to_error::deserialize(de).map_err(|source| ConfigError::Settings { source })
	}

	fn load_key(&self) -> Result<KeyMaterial> {
		if let Some(pem) = self.private_key.as_deref().filter(|pem| !pem.trim().is_empty()) {
			return KeyMaterial::from_pem(&self.key_id, pem);
		}

		match self.key_path.as_ref().filter(|path| !path.as_os_str().is_empty()) {
			Some(path) => KeyMaterial::from_pem_file(&self.key_id, path),
			None => Err(ConfigError::MissingKeyMaterial.into()),
		}
	}
}
impl Default for SsoSettings {
	fn default() -> Self {
		Self {
			url: String::new(),
			key_id: String::new(),
			key_path: None,
			private_key: None,
			cookie_name: crate::auth::DEFAULT_COOKIE_NAME.into(),
			api_base_url: String::new(),
			permissions: None,
			is_secure: false,
			profile_timeout_secs: DEFAULT_PROFILE_TIMEOUT.as_secs(),
			accept_invalid_certs: false,
			profile_failure_policy: ProfileFailurePolicy::default(),
		}
	}
}
impl Debug for SsoSettings {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SsoSettings")
			.field("url", &self.url)
			.field("key_id", &self.key_id)
			.field("key_path", &self.key_path)
			.field("private_key_set", &self.private_key.is_some())
			.field("cookie_name", &self.cookie_name)
			.field("api_base_url", &self.api_base_url)
			.field("is_secure", &self.is_secure)
			.finish()
	}
}

impl SsoConfig {
	/// Resolves key material and validates a settings document.
	///
	/// An inline `privateKey` wins over `keyPath`; with neither, the result is
	/// [`ConfigError::MissingKeyMaterial`].
	pub fn from_settings(settings: SsoSettings) -> Result<Self> {
		if settings.url.trim().is_empty() {
			return Err(ConfigError::MissingProviderUrl.into());
		}

		let key = settings.load_key()?;
		let mut builder = Self::builder(key)
			.provider_url(settings.url)
			.cookie_name(settings.cookie_name)
			.api_base_url(settings.api_base_url)
			.is_secure(settings.is_secure)
			.profile_timeout(StdDuration::from_secs(settings.profile_timeout_secs))
			.accept_invalid_certs(settings.accept_invalid_certs)
			.profile_failure_policy(settings.profile_failure_policy);

		if let Some(permissions) = settings.permissions {
			builder = builder.permissions(permissions);
		}

		Ok(builder.build()?)
	}
}
