//! Authorization URL builder for the `site` and `client` flows.
//!
//! `site` yields a `response_type=code` URL for the Authorization Code grant; `client` yields a
//! `response_type=token` URL for the implicit grant. `app_server` has no user-facing redirect
//! and is rejected.

// self
use crate::{
	_prelude::*,
	flows::{Authorization, AuthorizationOptions, FlowType, ResolvedRequest},
	http::TokenHttpClient,
	oauth::TransportErrorMapper,
	obs::{self, FlowOutcome, FlowSpan},
};

impl<C, M> Authorization<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds the URL the user agent should be redirected to.
	///
	/// The redirect URI resolves from `options`, then `options.app_options`, then the
	/// configured default. Scope is sent comma-joined and caller parameters are forwarded
	/// verbatim. A random `state` is generated when the caller does not provide one.
	pub fn authorization_url(&self, options: AuthorizationOptions) -> Result<Url> {
		let flow = options.flow;
		let span = FlowSpan::new(flow, "authorization_url");

		obs::record_flow_outcome(flow, FlowOutcome::Attempt);

		let result = span.in_scope(|| self.build_authorization_url(options));

		match &result {
			Ok(_) => obs::record_flow_outcome(flow, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(flow, FlowOutcome::Failure),
		}

		result
	}

	fn build_authorization_url(&self, options: AuthorizationOptions) -> Result<Url> {
		let implicit = match options.flow {
			FlowType::Site => false,
			FlowType::Client => true,
			FlowType::AppServer => return Err(Error::unknown_flow(options.flow)),
		};
		let client = self.client(options.app_options.as_ref())?;
		let request = ResolvedRequest::resolve(options, &self.config);
		let url = client.authorize_url(&request, implicit);

		obs::debug_event("built authorization url", request.flow);

		Ok(url)
	}
}
