//! Runs the `app_server` (client credentials) flow against a local mock of VK's token endpoint
//! and shows that repeated calls reuse one cached OAuth client.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use vkontakte_auth::{
	config::Config,
	flows::{AuthorizationOptions, FlowType, ReqwestAuthorization},
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	provider::Endpoints,
	reqwest::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/access_token")
				.form_urlencoded_tuple("grant_type", "client_credentials");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"demo-service-token","expires_in":0}"#);
		})
		.await;
	let config = Config::default()
		.with_app_id(51234567_u64)
		.with_app_secret("demo-secret")
		.with_endpoints(Endpoints::from_site(&Url::parse(&server.base_url())?)?);
	// The mock server presents a self-signed certificate.
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let auth = ReqwestAuthorization::with_http_client(
		config,
		http_client,
		Arc::new(ReqwestTransportErrorMapper),
	)?;
	let api = auth.authorize(AuthorizationOptions::new(FlowType::AppServer)).await?;

	println!(
		"Service token: {}, expires: {:?}.",
		api.token().unwrap_or_default(),
		api.expires_at()
	);

	let again = auth.authorize(AuthorizationOptions::new(FlowType::AppServer)).await?;
	let cached = auth.client(None)?;

	println!(
		"Second token: {}, cached clients: {}, same client: {}.",
		again.token().unwrap_or_default(),
		auth.clients().len(),
		Arc::ptr_eq(&cached, &auth.client(None)?)
	);

	token_mock.assert_calls_async(2).await;

	Ok(())
}
