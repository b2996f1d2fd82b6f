//! Application defaults consulted whenever a caller leaves a value out.

// self
use crate::{
	_prelude::*,
	auth::{AppId, Secret},
	error::ConfigError,
	provider::Endpoints,
};

/// How the application secret reaches VK's token endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	/// `client_id`/`client_secret` sent as form parameters (VK's documented scheme).
	#[default]
	RequestBody,
	/// HTTP Basic with `client_id`/`client_secret`.
	BasicAuth,
}

/// Defaults for application identity, redirect target, and endpoints.
///
/// Passed to [`Authorization`](crate::flows::Authorization) at construction time; the
/// authorization component never reads process-wide state. Every field is optional so a
/// configuration file only needs to spell out what it overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	/// Default application id (OAuth `client_id`).
	pub app_id: Option<AppId>,
	/// Default application secret.
	pub app_secret: Option<Secret>,
	/// Default redirect URI used by the `site` and `client` flows.
	pub redirect_uri: Option<Url>,
	/// VK API version, sent as the `v` parameter when set.
	pub api_version: Option<String>,
	/// Endpoint override; `None` means VK's production endpoints.
	pub endpoints: Option<Endpoints>,
	/// Client authentication used for the code exchange. The `app_server` flow always
	/// sends credentials in the request body.
	pub client_auth_method: ClientAuthMethod,
}
impl Config {
	/// Parses a JSON configuration document, reporting the path of the first bad field.
	pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(raw);

		Ok(serde_path_to_error::deserialize(&mut de)?)
	}

	/// Sets the default application id.
	pub fn with_app_id(mut self, app_id: impl Into<AppId>) -> Self {
		self.app_id = Some(app_id.into());

		self
	}

	/// Sets the default application secret.
	pub fn with_app_secret(mut self, secret: impl Into<Secret>) -> Self {
		self.app_secret = Some(secret.into());

		self
	}

	/// Sets the default redirect URI.
	pub fn with_redirect_uri(mut self, redirect_uri: Url) -> Self {
		self.redirect_uri = Some(redirect_uri);

		self
	}

	/// Sets the VK API version forwarded as `v`.
	pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
		self.api_version = Some(version.into());

		self
	}

	/// Points the authorization component at custom endpoints.
	pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
		self.endpoints = Some(endpoints);

		self
	}

	/// Overrides the client authentication used for the code exchange.
	pub fn with_client_auth_method(mut self, method: ClientAuthMethod) -> Self {
		self.client_auth_method = method;

		self
	}

	/// Returns the configured endpoints, falling back to VK's production endpoints.
	pub fn resolve_endpoints(&self) -> Result<Endpoints, ConfigError> {
		match &self.endpoints {
			Some(endpoints) => Ok(endpoints.clone()),
			None => Endpoints::vk(),
		}
	}
}
