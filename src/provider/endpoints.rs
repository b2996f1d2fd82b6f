//! OAuth endpoint set for VK and its builder.

// self
use crate::{_prelude::*, error::ConfigError};

/// Base site of VK's OAuth server.
pub const VK_OAUTH_SITE: &str = "https://oauth.vk.com";
/// Authorization path joined onto [`VK_OAUTH_SITE`].
pub const AUTHORIZE_PATH: &str = "/authorize";
/// Token path joined onto [`VK_OAUTH_SITE`].
pub const TOKEN_PATH: &str = "/access_token";

/// Endpoints used when building authorization URLs and exchanging tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
	/// Authorization endpoint users are redirected to.
	pub authorization: Url,
	/// Token endpoint used for code and client-credentials exchanges.
	pub token: Url,
}
impl Endpoints {
	/// VK's production endpoints.
	pub fn vk() -> Result<Self, ConfigError> {
		let site = Url::parse(VK_OAUTH_SITE)
			.map_err(|source| ConfigError::InvalidEndpoint { path: "/", source })?;

		Self::from_site(&site)
	}

	/// Joins the fixed authorize/token paths onto `site`.
	pub fn from_site(site: &Url) -> Result<Self, ConfigError> {
		Self::builder(site.clone()).build()
	}

	/// Starts a builder rooted at `site`.
	pub fn builder(site: Url) -> EndpointsBuilder {
		EndpointsBuilder::new(site)
	}
}

/// Builder for [`Endpoints`] that accepts custom paths.
#[derive(Clone, Debug)]
pub struct EndpointsBuilder {
	site: Url,
	authorize_path: &'static str,
	token_path: &'static str,
}
impl EndpointsBuilder {
	/// Creates a builder with VK's default paths.
	pub fn new(site: Url) -> Self {
		Self { site, authorize_path: AUTHORIZE_PATH, token_path: TOKEN_PATH }
	}

	/// Overrides the authorization path.
	pub fn authorize_path(mut self, path: &'static str) -> Self {
		self.authorize_path = path;

		self
	}

	/// Overrides the token path.
	pub fn token_path(mut self, path: &'static str) -> Self {
		self.token_path = path;

		self
	}

	/// Joins both paths onto the site.
	pub fn build(self) -> Result<Endpoints, ConfigError> {
		let authorization = join(&self.site, self.authorize_path)?;
		let token = join(&self.site, self.token_path)?;

		Ok(Endpoints { authorization, token })
	}
}

fn join(site: &Url, path: &'static str) -> Result<Url, ConfigError> {
	site.join(path).map_err(|source| ConfigError::InvalidEndpoint { path, source })
}
