//! Option resolution shared by the URL builder and the token exchanger.

// self
use crate::{
	_prelude::*,
	config::Config,
	flows::{AuthorizationOptions, FlowType},
};

/// Caller options with every default applied, computed once per call.
#[derive(Clone, Debug)]
pub(crate) struct ResolvedRequest {
	pub(crate) flow: FlowType,
	pub(crate) redirect_uri: Option<Url>,
	pub(crate) code: Option<String>,
	pub(crate) state: Option<String>,
	pub(crate) params: Vec<(String, String)>,
}
impl ResolvedRequest {
	/// Applies the redirect chain `options -> app options -> config` and folds the scope and
	/// API version into the forwarded parameters.
	pub(crate) fn resolve(options: AuthorizationOptions, config: &Config) -> Self {
		let AuthorizationOptions {
			flow,
			redirect_uri,
			scope,
			code,
			state,
			extra_params,
			app_options,
		} = options;
		let redirect_uri = redirect_uri
			.or_else(|| app_options.and_then(|app| app.redirect_uri))
			.or_else(|| config.redirect_uri.clone());
		let mut params = Vec::with_capacity(extra_params.len() + 2);

		if let Some(scope) = scope.filter(|scope| !scope.is_empty()) {
			params.push(("scope".to_owned(), scope.to_param()));
		}
		if let Some(version) = &config.api_version {
			params.push(("v".to_owned(), version.clone()));
		}

		params.extend(extra_params);

		Self { flow, redirect_uri, code, state, params }
	}
}
