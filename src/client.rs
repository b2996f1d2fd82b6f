//! API client value produced by a successful authorization.

// crates.io
use oauth2::TokenResponse;
// self
use crate::{_prelude::*, auth::Secret, error::TransientError, oauth::VkTokenResponse};

/// Handle for calling the VK API on behalf of whoever granted the token.
///
/// Built by [`Authorization::authorize`](crate::flows::Authorization::authorize); the access
/// token moves in here and nowhere else keeps a copy.
#[derive(Clone, Default)]
pub struct ApiClient {
	token: Option<Secret>,
	user_id: Option<u64>,
	email: Option<String>,
	expires_at: Option<OffsetDateTime>,
}
impl ApiClient {
	/// Client without a token, for methods VK serves anonymously.
	pub fn anonymous() -> Self {
		Self::default()
	}

	/// Wraps a bare access token with no expiry or user metadata.
	pub fn with_token(token: impl Into<Secret>) -> Self {
		Self { token: Some(token.into()), ..Default::default() }
	}

	/// Builds a client from a token endpoint response issued at `issued_at`.
	///
	/// A lifetime that overflows the expiry instant is reported as an upstream failure.
	pub fn from_token_response(
		response: VkTokenResponse,
		issued_at: OffsetDateTime,
	) -> Result<Self, TransientError> {
		let expires_at = match response.expires_in() {
			Some(lifetime) => {
				let out_of_range =
					|| TransientError::ExpiresInOutOfRange { expires_in: lifetime.as_secs() };
				let lifetime = Duration::try_from(lifetime).map_err(|_| out_of_range())?;

				Some(issued_at.checked_add(lifetime).ok_or_else(out_of_range)?)
			},
			None => None,
		};

		Ok(Self {
			token: Some(Secret::new(response.access_token().secret().to_owned())),
			user_id: response.user_id(),
			email: response.email().map(str::to_owned),
			expires_at,
		})
	}

	/// Access token, if the client is authorized. Callers must avoid logging it.
	pub fn token(&self) -> Option<&str> {
		self.token.as_ref().map(Secret::expose)
	}

	/// Id of the user who granted access.
	pub fn user_id(&self) -> Option<u64> {
		self.user_id
	}

	/// E-mail returned alongside the token.
	pub fn email(&self) -> Option<&str> {
		self.email.as_deref()
	}

	/// Expiry instant; `None` for anonymous clients and non-expiring tokens.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expires_at
	}

	/// Returns `true` when the client carries a token.
	pub fn is_authorized(&self) -> bool {
		self.token.is_some()
	}

	/// Returns `true` if the token expired at `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| instant >= expires_at)
	}

	/// Returns `true` if the token has expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}
impl Debug for ApiClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("token", &self.token.as_ref().map(|_| "<redacted>"))
			.field("user_id", &self.user_id)
			.field("email", &self.email)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
