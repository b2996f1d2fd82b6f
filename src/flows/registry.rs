//! Per-application cache of OAuth clients.

// self
use crate::{
	_prelude::*,
	auth::{AppId, Secret},
	config::ClientAuthMethod,
	oauth::OAuthClient,
	obs::{self, CacheOutcome},
	provider::Endpoints,
};

/// Cache holding at most one [`OAuthClient`] per [`AppId`].
///
/// Entries are created on first use and never evicted or updated: a later lookup with a
/// different secret for a cached id returns the original client unchanged. The lock is held
/// while a client is built, so concurrent first lookups construct exactly one instance.
#[derive(Debug, Default)]
pub struct ClientRegistry {
	clients: Mutex<HashMap<AppId, Arc<OAuthClient>>>,
}
impl ClientRegistry {
	/// Returns the cached client for `app_id`, building it from the remaining arguments on a
	/// miss.
	pub fn get_or_create(
		&self,
		app_id: &AppId,
		app_secret: Option<&Secret>,
		endpoints: &Endpoints,
		auth_method: ClientAuthMethod,
	) -> Arc<OAuthClient> {
		let mut clients = self.clients.lock();

		if let Some(client) = clients.get(app_id) {
			obs::record_client_cache(CacheOutcome::Hit);

			return client.clone();
		}

		obs::record_client_cache(CacheOutcome::Miss);

		let client =
			Arc::new(OAuthClient::new(app_id.clone(), app_secret, endpoints, auth_method));

		clients.insert(app_id.clone(), client.clone());

		client
	}

	/// Number of cached clients.
	pub fn len(&self) -> usize {
		self.clients.lock().len()
	}

	/// Returns true when nothing has been cached yet.
	pub fn is_empty(&self) -> bool {
		self.clients.lock().is_empty()
	}
}
