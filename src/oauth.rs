//! OAuth client facade over the `oauth2` crate, shaped for VK's endpoints and responses.

pub use oauth2;

// std
use std::borrow::Cow;
// crates.io
use oauth2::{
	AccessToken, AuthType, AuthUrl, AuthorizationCode, Client, ClientId, ClientSecret, CsrfToken,
	EndpointNotSet, EndpointSet, HttpClientError, RedirectUrl, RefreshToken, RequestTokenError,
	Scope, StandardRevocableToken, TokenResponse, TokenUrl,
	basic::{
		BasicErrorResponse, BasicRequestTokenError, BasicRevocationErrorResponse,
		BasicTokenIntrospectionResponse, BasicTokenType,
	},
};
// self
use crate::{
	_prelude::*,
	auth::{AppId, Secret},
	config::ClientAuthMethod,
	error::{ConfigError, TransientError, TransportError},
	flows::{FlowType, ResolvedRequest},
	http::{ResponseMetadata, ResponseMetadataSlot, TokenHttpClient},
	provider::{Endpoints, ProviderErrorContext, ProviderErrorKind, ProviderStrategy},
};

type VkBasicClient = Client<
	BasicErrorResponse,
	VkTokenResponse,
	BasicTokenIntrospectionResponse,
	StandardRevocableToken,
	BasicRevocationErrorResponse,
	EndpointSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointSet,
>;

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a crate error.
	fn map_transport_error(
		&self,
		flow: FlowType,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		_flow: FlowType,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(meta, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => transient(
				meta,
				format!("HTTP client error occurred while calling the token endpoint: {message}"),
			),
			_ => transient(meta, "HTTP client error occurred while calling the token endpoint"),
		}
	}
}

/// Token endpoint response as VK sends it.
///
/// VK omits `token_type`, reports `expires_in = 0` for non-expiring (`offline`) tokens, and
/// adds `user_id` plus `email` when the `email` scope was granted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VkTokenResponse {
	access_token: AccessToken,
	#[serde(skip, default = "bearer")]
	token_type: BasicTokenType,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	expires_in: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	user_id: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	email: Option<String>,
}
impl VkTokenResponse {
	/// Id of the user who granted access (absent for `app_server` tokens).
	pub fn user_id(&self) -> Option<u64> {
		self.user_id
	}

	/// E-mail address, present only when the `email` scope was granted.
	pub fn email(&self) -> Option<&str> {
		self.email.as_deref()
	}
}
impl TokenResponse for VkTokenResponse {
	type TokenType = BasicTokenType;

	fn access_token(&self) -> &AccessToken {
		&self.access_token
	}

	fn token_type(&self) -> &Self::TokenType {
		&self.token_type
	}

	fn expires_in(&self) -> Option<std::time::Duration> {
		self.expires_in.filter(|secs| *secs > 0).map(std::time::Duration::from_secs)
	}

	fn refresh_token(&self) -> Option<&RefreshToken> {
		None
	}

	fn scopes(&self) -> Option<&Vec<Scope>> {
		None
	}
}

/// Borrowed transport pieces needed for one token request.
pub(crate) struct TokenRequestContext<'a, C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) http_client: &'a C,
	pub(crate) mapper: &'a M,
	pub(crate) strategy: &'a dyn ProviderStrategy,
}

/// OAuth client bound to one VK application.
///
/// Instances are cached per [`AppId`] by the client registry and shared through [`Arc`].
#[derive(Clone, Debug)]
pub struct OAuthClient {
	app_id: AppId,
	inner: VkBasicClient,
}
impl OAuthClient {
	/// Builds a client for `app_id` against `endpoints`.
	pub fn new(
		app_id: AppId,
		app_secret: Option<&Secret>,
		endpoints: &Endpoints,
		auth_method: ClientAuthMethod,
	) -> Self {
		let mut inner: VkBasicClient = Client::new(ClientId::new(app_id.to_string()))
			.set_auth_uri(AuthUrl::from_url(endpoints.authorization.clone()))
			.set_token_uri(TokenUrl::from_url(endpoints.token.clone()))
			.set_auth_type(auth_type(auth_method));

		if let Some(secret) = app_secret {
			inner = inner.set_client_secret(ClientSecret::new(secret.expose().to_owned()));
		}

		Self { app_id, inner }
	}

	/// Application id this client authenticates as.
	pub fn app_id(&self) -> &AppId {
		&self.app_id
	}

	/// Builds the authorization redirect URL (`response_type=code`, or `token` when
	/// `implicit` is set).
	pub(crate) fn authorize_url(&self, request: &ResolvedRequest, implicit: bool) -> Url {
		let state =
			request.state.clone().map(CsrfToken::new).unwrap_or_else(CsrfToken::new_random);
		let mut authorize = self.inner.authorize_url(move || state);

		if implicit {
			authorize = authorize.use_implicit_flow();
		}
		if let Some(redirect) = &request.redirect_uri {
			authorize =
				authorize.set_redirect_uri(Cow::Owned(RedirectUrl::from_url(redirect.clone())));
		}
		for (key, value) in &request.params {
			authorize = authorize.add_extra_param(key.clone(), value.clone());
		}

		let (url, _state) = authorize.url();

		url
	}

	/// Exchanges an authorization code (`grant_type=authorization_code`).
	pub(crate) async fn exchange_code<C, M>(
		&self,
		ctx: &TokenRequestContext<'_, C, M>,
		code: &str,
		request: &ResolvedRequest,
	) -> Result<VkTokenResponse>
	where
		C: ?Sized + TokenHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		let meta = ResponseMetadataSlot::default();
		let handle = ctx.http_client.with_metadata(meta.clone());
		let mut exchange = self.inner.exchange_code(AuthorizationCode::new(code.to_owned()));

		if let Some(redirect) = &request.redirect_uri {
			exchange =
				exchange.set_redirect_uri(Cow::Owned(RedirectUrl::from_url(redirect.clone())));
		}
		for (key, value) in &request.params {
			exchange = exchange.add_extra_param(key.clone(), value.clone());
		}

		exchange.request_async(&handle).await.map_err(|err| {
			map_request_error(ctx.strategy, FlowType::Site, meta.take(), err, ctx.mapper)
		})
	}

	/// Runs the client-credentials grant with credentials in the request body.
	///
	/// The resolved redirect URI travels as a plain form parameter, ahead of the caller's
	/// parameters.
	pub(crate) async fn exchange_client_credentials<C, M>(
		&self,
		ctx: &TokenRequestContext<'_, C, M>,
		request: &ResolvedRequest,
	) -> Result<VkTokenResponse>
	where
		C: ?Sized + TokenHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		let meta = ResponseMetadataSlot::default();
		let handle = ctx.http_client.with_metadata(meta.clone());
		let client = self.inner.clone().set_auth_type(AuthType::RequestBody);
		let mut exchange = client.exchange_client_credentials();

		if let Some(redirect) = &request.redirect_uri {
			exchange = exchange.add_extra_param("redirect_uri", redirect.to_string());
		}
		for (key, value) in &request.params {
			exchange = exchange.add_extra_param(key.clone(), value.clone());
		}

		exchange.request_async(&handle).await.map_err(|err| {
			map_request_error(ctx.strategy, FlowType::AppServer, meta.take(), err, ctx.mapper)
		})
	}
}

fn bearer() -> BasicTokenType {
	BasicTokenType::Bearer
}

fn auth_type(method: ClientAuthMethod) -> AuthType {
	match method {
		ClientAuthMethod::RequestBody => AuthType::RequestBody,
		ClientAuthMethod::BasicAuth => AuthType::BasicAuth,
	}
}

fn map_request_error<E, M>(
	strategy: &dyn ProviderStrategy,
	flow: FlowType,
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
	mapper: &M,
) -> Error
where
	E: 'static + Send + Sync + StdError,
	M: ?Sized + TransportErrorMapper<E>,
{
	let meta = meta.as_ref();

	match err {
		RequestTokenError::ServerResponse(response) =>
			map_server_response_error(strategy, flow, response, meta),
		RequestTokenError::Request(error) => mapper.map_transport_error(flow, meta, error),
		RequestTokenError::Parse(source, body) =>
			map_parse_error(strategy, flow, meta, source, &body),
		RequestTokenError::Other(message) => transient(meta, message),
	}
}

fn map_server_response_error(
	strategy: &dyn ProviderStrategy,
	flow: FlowType,
	response: BasicErrorResponse,
	meta: Option<&ResponseMetadata>,
) -> Error {
	let mut ctx =
		ProviderErrorContext::new(flow).with_oauth_error(response.error().as_ref().to_string());

	if let Some(description) = response.error_description() {
		ctx = ctx.with_error_description(description.clone());
	}
	if let Some(status) = meta_status(meta) {
		ctx = ctx.with_http_status(status);
	}

	let message = match response.error_description() {
		Some(description) => format!("Token endpoint returned an OAuth error: {description}"),
		None => format!("Token endpoint returned an OAuth error: {}", response.error().as_ref()),
	};

	classified(strategy.classify_token_error(&ctx), message, meta)
}

// VK occasionally answers 200 with an error payload; give the strategy a look at the body
// before reporting a parse failure.
fn map_parse_error(
	strategy: &dyn ProviderStrategy,
	flow: FlowType,
	meta: Option<&ResponseMetadata>,
	source: serde_path_to_error::Error<serde_json::Error>,
	body: &[u8],
) -> Error {
	let preview = String::from_utf8_lossy(body).into_owned();
	let mut ctx = ProviderErrorContext::new(flow).with_body_preview(preview);

	if let Some(status) = meta_status(meta) {
		ctx = ctx.with_http_status(status);
	}

	match strategy.classify_token_error(&ctx) {
		ProviderErrorKind::Transient =>
			TransientError::TokenResponseParse { source, status: meta_status(meta) }.into(),
		kind => classified(
			kind,
			format!("Token endpoint returned an unparseable error: {}", source.inner()),
			meta,
		),
	}
}

fn classified(kind: ProviderErrorKind, reason: String, meta: Option<&ResponseMetadata>) -> Error {
	match kind {
		ProviderErrorKind::InvalidGrant => Error::InvalidGrant { reason },
		ProviderErrorKind::InvalidClient => Error::InvalidClient { reason },
		ProviderErrorKind::InsufficientScope => Error::InsufficientScope { reason },
		ProviderErrorKind::Transient => transient(meta, reason),
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(meta: Option<&ResponseMetadata>, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransientError::TokenEndpoint {
			message: "Request timed out while calling the token endpoint".into(),
			status: meta_status(meta).or_else(|| err.status().map(|code| code.as_u16())),
			retry_after: meta_retry_after(meta),
		}
		.into();
	}

	TransportError::from(err).into()
}

fn transient(meta: Option<&ResponseMetadata>, message: impl Into<String>) -> Error {
	TransientError::TokenEndpoint {
		message: message.into(),
		status: meta_status(meta),
		retry_after: meta_retry_after(meta),
	}
	.into()
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

fn meta_retry_after(meta: Option<&ResponseMetadata>) -> Option<Duration> {
	meta.and_then(|value| value.retry_after)
}
