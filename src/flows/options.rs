//! Caller-facing inputs for the URL builder and token exchanger.

// self
use crate::{
	_prelude::*,
	auth::{AppId, ScopeList, Secret},
};

/// OAuth 2.0 grant variant selected by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowType {
	/// Authorization Code grant for server-side sites.
	#[default]
	Site,
	/// Implicit grant for standalone/client-side applications.
	Client,
	/// Client Credentials grant for server-to-server calls.
	AppServer,
}
impl FlowType {
	/// Returns the label used in configuration, spans, and metrics.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowType::Site => "site",
			FlowType::Client => "client",
			FlowType::AppServer => "app_server",
		}
	}
}
impl Display for FlowType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for FlowType {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"site" => Ok(FlowType::Site),
			"client" => Ok(FlowType::Client),
			"app_server" => Ok(FlowType::AppServer),
			other => Err(Error::unknown_flow(other)),
		}
	}
}

/// Per-call overrides for the application identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppOptions {
	/// Application id; falls back to the configured id.
	pub app_id: Option<AppId>,
	/// Application secret; falls back to the configured secret.
	pub app_secret: Option<Secret>,
	/// Redirect URI used when the top-level options leave it out.
	pub redirect_uri: Option<Url>,
}
impl AppOptions {
	/// Sets the application id.
	pub fn with_app_id(mut self, app_id: impl Into<AppId>) -> Self {
		self.app_id = Some(app_id.into());

		self
	}

	/// Sets the application secret.
	pub fn with_app_secret(mut self, secret: impl Into<Secret>) -> Self {
		self.app_secret = Some(secret.into());

		self
	}

	/// Sets the fallback redirect URI.
	pub fn with_redirect_uri(mut self, redirect_uri: Url) -> Self {
		self.redirect_uri = Some(redirect_uri);

		self
	}
}

/// Input accepted by [`Authorization::authorization_url`](crate::flows::Authorization::authorization_url)
/// and [`Authorization::authorize`](crate::flows::Authorization::authorize).
///
/// The struct is never mutated by the operations; defaults are resolved once on entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationOptions {
	/// Grant variant; defaults to [`FlowType::Site`].
	#[serde(rename = "type")]
	pub flow: FlowType,
	/// Redirect URI; falls back to [`AppOptions::redirect_uri`], then the configuration.
	pub redirect_uri: Option<Url>,
	/// Requested permissions.
	pub scope: Option<ScopeList>,
	/// Authorization code returned to the redirect URI (`site` exchange only).
	pub code: Option<String>,
	/// Opaque `state` value; a random one is generated for URLs when absent.
	pub state: Option<String>,
	/// Additional parameters forwarded verbatim (`display`, `revoke`, ...).
	pub extra_params: Vec<(String, String)>,
	/// Application identity overrides.
	pub app_options: Option<AppOptions>,
}
impl AuthorizationOptions {
	/// Creates options for the provided flow.
	pub fn new(flow: FlowType) -> Self {
		Self { flow, ..Default::default() }
	}

	/// Options for exchanging an authorization code with the `site` flow.
	pub fn site_code(code: impl Into<String>) -> Self {
		Self::new(FlowType::Site).with_code(code)
	}

	/// Overrides the flow.
	pub fn with_flow(mut self, flow: FlowType) -> Self {
		self.flow = flow;

		self
	}

	/// Sets the redirect URI.
	pub fn with_redirect_uri(mut self, redirect_uri: Url) -> Self {
		self.redirect_uri = Some(redirect_uri);

		self
	}

	/// Sets the requested scope.
	pub fn with_scope(mut self, scope: ScopeList) -> Self {
		self.scope = Some(scope);

		self
	}

	/// Sets the authorization code.
	pub fn with_code(mut self, code: impl Into<String>) -> Self {
		self.code = Some(code.into());

		self
	}

	/// Sets the `state` value.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Appends an extra parameter.
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.extra_params.push((key.into(), value.into()));

		self
	}

	/// Sets the application identity overrides.
	pub fn with_app_options(mut self, app_options: AppOptions) -> Self {
		self.app_options = Some(app_options);

		self
	}
}
