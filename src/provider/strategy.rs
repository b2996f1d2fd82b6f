//! Strategy hooks that classify token endpoint failures.
//!
//! Implementations map OAuth error fields, response bodies, and HTTP status codes onto
//! [`ProviderErrorKind`] without tying the classification to any particular HTTP client.

// self
use crate::{_prelude::*, flows::FlowType};

/// Strategy hook that classifies token endpoint errors.
///
/// Implementors are required to be `Send + Sync`, and the hook only sees crate-owned data
/// so downstream crates never depend on reqwest-specific structures.
pub trait ProviderStrategy: Send + Sync {
	/// Maps a failed token request into the crate's error categories.
	fn classify_token_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind;
}

/// Canonical provider error categories used by strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderErrorKind {
	/// VK rejected the authorization grant (bad or expired code, user action required).
	InvalidGrant,
	/// Application authentication failed.
	InvalidClient,
	/// Requested scopes are not allowed for the application.
	InsufficientScope,
	/// Failure is temporary.
	Transient,
}

/// Context passed to strategies when classifying token errors.
///
/// Only primitive data is kept (status code, OAuth fields, body preview) so strategies stay
/// decoupled from the HTTP stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderErrorContext {
	/// Flow associated with the failing request.
	pub flow: FlowType,
	/// HTTP status code returned by VK, when available.
	pub http_status: Option<u16>,
	/// OAuth `error` field.
	pub oauth_error: Option<String>,
	/// OAuth `error_description` field.
	pub error_description: Option<String>,
	/// Preview of the response body for non-JSON payloads.
	pub body_preview: Option<String>,
}
impl ProviderErrorContext {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Creates a new context scoped to the provided flow.
	pub fn new(flow: FlowType) -> Self {
		Self {
			flow,
			http_status: None,
			oauth_error: None,
			error_description: None,
			body_preview: None,
		}
	}

	/// Adds an HTTP status code.
	pub fn with_http_status(mut self, status: u16) -> Self {
		self.http_status = Some(status);

		self
	}

	/// Adds the OAuth error code string.
	pub fn with_oauth_error(mut self, error: impl Into<String>) -> Self {
		self.oauth_error = Some(error.into());

		self
	}

	/// Adds the OAuth `error_description` field.
	pub fn with_error_description(mut self, description: impl Into<String>) -> Self {
		self.error_description = Some(description.into());

		self
	}

	/// Adds a body preview, truncated to a fixed number of characters.
	pub fn with_body_preview(mut self, body: impl Into<String>) -> Self {
		self.body_preview = Some(truncate_preview(body.into()));

		self
	}
}

/// Classification tuned for VK's OAuth server.
///
/// VK answers with the RFC 6749 codes plus a few of its own (`need_validation`,
/// `need_captcha`, `invalid_request` for redirect mismatches). Structured fields win over
/// body hints, which win over the HTTP status. Transport failures never
/// reach the strategy; the transport error mapper handles them.
#[derive(Debug, Default)]
pub struct VkStrategy;
impl Display for VkStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("vk-strategy")
	}
}
impl ProviderStrategy for VkStrategy {
	fn classify_token_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind {
		if let Some(kind) = ctx.oauth_error.as_deref().and_then(match_exact_value) {
			return kind;
		}
		if let Some(kind) = ctx.error_description.as_deref().and_then(classify_text) {
			return kind;
		}
		if let Some(kind) = ctx.body_preview.as_deref().and_then(classify_text) {
			return kind;
		}

		classify_status(ctx.http_status)
	}
}

fn truncate_preview(body: String) -> String {
	if body.chars().count() <= ProviderErrorContext::BODY_PREVIEW_LIMIT {
		return body;
	}

	let mut buf: String = body.chars().take(ProviderErrorContext::BODY_PREVIEW_LIMIT).collect();

	buf.push('…');

	buf
}

fn match_exact_value(value: &str) -> Option<ProviderErrorKind> {
	const GRANT: &[&str] =
		&["invalid_grant", "access_denied", "invalid_request", "need_validation", "need_captcha"];
	const CLIENT: &[&str] = &["invalid_client", "unauthorized_client"];
	const SCOPE: &[&str] = &["invalid_scope", "insufficient_scope"];
	const TRANSIENT: &[&str] = &["temporarily_unavailable", "server_error"];

	let matches = |set: &[&str]| set.iter().any(|code| value.eq_ignore_ascii_case(code));

	if matches(GRANT) {
		Some(ProviderErrorKind::InvalidGrant)
	} else if matches(CLIENT) {
		Some(ProviderErrorKind::InvalidClient)
	} else if matches(SCOPE) {
		Some(ProviderErrorKind::InsufficientScope)
	} else if matches(TRANSIENT) {
		Some(ProviderErrorKind::Transient)
	} else {
		None
	}
}

fn classify_text(text: &str) -> Option<ProviderErrorKind> {
	let lowered = text.to_ascii_lowercase();

	match lowered.as_str() {
		text if text.contains("invalid_grant") || text.contains("code is invalid") =>
			Some(ProviderErrorKind::InvalidGrant),
		text if text.contains("invalid_client") || text.contains("client_secret is incorrect") =>
			Some(ProviderErrorKind::InvalidClient),
		text if text.contains("invalid_scope") || text.contains("insufficient_scope") =>
			Some(ProviderErrorKind::InsufficientScope),
		text if text.contains("temporarily_unavailable") || text.contains("retry") =>
			Some(ProviderErrorKind::Transient),
		_ => None,
	}
}

fn classify_status(status: Option<u16>) -> ProviderErrorKind {
	match status {
		Some(400 | 404 | 410) => ProviderErrorKind::InvalidGrant,
		Some(401) => ProviderErrorKind::InvalidClient,
		Some(403) => ProviderErrorKind::InsufficientScope,
		_ => ProviderErrorKind::Transient,
	}
}
