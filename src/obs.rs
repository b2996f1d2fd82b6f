//! Optional observability helpers for authorization flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit spans named `vkontakte_auth.flow` with the `flow` (authorization
//!   type) and `stage` (operation) fields.
//! - Enable `metrics` to increment `vkontakte_auth_flow_total` for every attempt/success/failure,
//!   labeled by `flow` + `outcome`, and `vkontakte_auth_client_cache_total` for client registry
//!   hits and misses.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Client registry lookup result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheOutcome {
	/// A cached client was reused.
	Hit,
	/// A new client was built and cached.
	Miss,
}
impl CacheOutcome {
	/// Returns a stable label suitable for metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CacheOutcome::Hit => "hit",
			CacheOutcome::Miss => "miss",
		}
	}
}
