//! Token exchanger for the `site` and `app_server` flows.
//!
//! `site` trades the authorization code returned to the redirect URI for an access token.
//! `app_server` runs the client-credentials grant with the application secret in the request
//! body. `client` tokens arrive in the redirect fragment and never reach this module.

// self
use crate::{
	_prelude::*,
	client::ApiClient,
	flows::{Authorization, AuthorizationOptions, FlowType, ResolvedRequest},
	http::TokenHttpClient,
	oauth::{TokenRequestContext, TransportErrorMapper},
	obs::{self, FlowOutcome, FlowSpan},
};

impl<C, M> Authorization<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Exchanges credentials for an access token and wraps it in an [`ApiClient`].
	///
	/// `site` requires `options.code`. The token response's `expires_in` is anchored to the
	/// moment the response was received; `0` or an absent value means the token never
	/// expires.
	pub async fn authorize(&self, options: AuthorizationOptions) -> Result<ApiClient> {
		let flow = options.flow;
		let span = FlowSpan::new(flow, "authorize");

		obs::record_flow_outcome(flow, FlowOutcome::Attempt);

		let result = span.instrument(self.exchange(options)).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(flow, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(flow, FlowOutcome::Failure),
		}

		result
	}

	async fn exchange(&self, options: AuthorizationOptions) -> Result<ApiClient> {
		if options.flow == FlowType::Client {
			return Err(Error::unknown_flow(options.flow));
		}

		let client = self.client(options.app_options.as_ref())?;
		let request = ResolvedRequest::resolve(options, &self.config);
		let ctx = TokenRequestContext {
			http_client: self.http_client.as_ref(),
			mapper: self.transport_mapper.as_ref(),
			strategy: self.strategy.as_ref(),
		};
		let response = match request.flow {
			FlowType::Site => {
				let code = request.code.as_deref().filter(|code| !code.is_empty()).ok_or_else(
					|| Error::InvalidArgument {
						reason: "The `site` flow requires an authorization `code`".into(),
					},
				)?;

				client.exchange_code(&ctx, code, &request).await?
			},
			FlowType::AppServer => client.exchange_client_credentials(&ctx, &request).await?,
			FlowType::Client => return Err(Error::unknown_flow(request.flow)),
		};
		let issued_at = OffsetDateTime::now_utc();

		obs::debug_event("token exchange succeeded", request.flow);

		Ok(ApiClient::from_token_response(response, issued_at)?)
	}
}
