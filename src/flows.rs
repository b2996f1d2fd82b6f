//! Authorization facade: URL builder, token exchanger, and per-application client factory.

pub mod options;
pub mod registry;

mod authorization_url;
mod common;
mod token_exchange;

pub use options::*;
pub use registry::*;

pub(crate) use common::ResolvedRequest;

// self
use crate::{
	_prelude::*,
	config::Config,
	error::ConfigError,
	http::TokenHttpClient,
	oauth::{OAuthClient, TransportErrorMapper},
	provider::{Endpoints, ProviderStrategy, VkStrategy},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Authorization specialized for the crate's default reqwest transport stack.
pub type ReqwestAuthorization = Authorization<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Entry point for VK authorization.
///
/// Owns the application defaults, the HTTP transport used for token exchanges, the
/// error-classification strategy, and the registry that keeps one [`OAuthClient`] per
/// application id. All operations take `&self`; share one instance behind an [`Arc`] to serve
/// concurrent callers.
pub struct Authorization<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every token request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Strategy that classifies token endpoint failures.
	pub strategy: Arc<dyn ProviderStrategy>,
	config: Config,
	endpoints: Endpoints,
	clients: ClientRegistry,
}
impl<C, M> Authorization<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates an authorization facade that reuses the caller-provided transport + mapper pair.
	///
	/// Fails when the configured endpoints cannot be resolved.
	pub fn with_http_client(
		config: Config,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		let endpoints = config.resolve_endpoints()?;

		Ok(Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			strategy: Arc::new(VkStrategy),
			config,
			endpoints,
			clients: ClientRegistry::default(),
		})
	}

	/// Replaces the error-classification strategy.
	pub fn with_strategy(mut self, strategy: Arc<dyn ProviderStrategy>) -> Self {
		self.strategy = strategy;

		self
	}

	/// Application defaults this facade was built with.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Endpoints every cached client talks to.
	pub fn endpoints(&self) -> &Endpoints {
		&self.endpoints
	}

	/// Returns the OAuth client for the application named by `app_options`, falling back to
	/// the configured defaults for any field left out.
	///
	/// Clients are cached by application id for the lifetime of this facade. The first call
	/// for an id decides the secret; later calls with a different secret for the same id get
	/// the cached client back unchanged.
	pub fn client(&self, app_options: Option<&AppOptions>) -> Result<Arc<OAuthClient>> {
		let app_id = app_options
			.and_then(|app| app.app_id.as_ref())
			.or(self.config.app_id.as_ref())
			.ok_or(ConfigError::MissingAppId)?;
		let app_secret = app_options
			.and_then(|app| app.app_secret.as_ref())
			.or(self.config.app_secret.as_ref());

		Ok(self.clients.get_or_create(
			app_id,
			app_secret,
			&self.endpoints,
			self.config.client_auth_method,
		))
	}

	/// Registry backing [`Authorization::client`].
	pub fn clients(&self) -> &ClientRegistry {
		&self.clients
	}
}
#[cfg(feature = "reqwest")]
impl Authorization<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a facade that provisions its own reqwest-backed transport.
	pub fn new(config: Config) -> Result<Self> {
		Self::with_http_client(
			config,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> Debug for Authorization<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authorization")
			.field("config", &self.config)
			.field("endpoints", &self.endpoints)
			.field("cached_clients", &self.clients.len())
			.finish()
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::auth::{AppId, Secret};

	fn authorization(config: Config) -> ReqwestAuthorization {
		Authorization::new(config).expect("Authorization should build from a valid config.")
	}

	#[test]
	fn client_without_any_app_id_is_a_config_error() {
		let auth = authorization(Config::default());
		let err = auth.client(None).expect_err("Missing app id should fail.");

		assert!(matches!(err, Error::Config(ConfigError::MissingAppId)));
		assert!(auth.clients().is_empty());
	}

	#[test]
	fn client_prefers_per_call_app_id_over_config() {
		let auth = authorization(Config::default().with_app_id(1_u64).with_app_secret("s"));
		let default = auth.client(None).expect("Configured app id should resolve.");
		let other = auth
			.client(Some(&AppOptions::default().with_app_id(AppId::from(2_u64))))
			.expect("Per-call app id should resolve.");

		assert_eq!(default.app_id().as_ref(), "1");
		assert_eq!(other.app_id().as_ref(), "2");
		assert_eq!(auth.clients().len(), 2);
	}

	#[test]
	fn cached_client_ignores_rotated_secret() {
		let auth = authorization(Config::default().with_app_id(1_u64));
		let first = auth
			.client(Some(&AppOptions::default().with_app_secret(Secret::new("old"))))
			.expect("First lookup should build a client.");
		let second = auth
			.client(Some(&AppOptions::default().with_app_secret(Secret::new("new"))))
			.expect("Second lookup should hit the cache.");

		assert!(Arc::ptr_eq(&first, &second));
	}

	#[test]
	fn debug_output_redacts_secret() {
		let auth = authorization(Config::default().with_app_id(1_u64).with_app_secret("hunter2"));

		assert!(!format!("{auth:?}").contains("hunter2"));
	}
}
