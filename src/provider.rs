//! VK endpoint data and error-classification strategies.
//!
//! `endpoints` exposes the OAuth endpoint set (defaulting to `https://oauth.vk.com`).
//! `strategy` defines [`ProviderStrategy`], an HTTP-client-agnostic hook used to map token
//! endpoint failures into the crate's error taxonomy.

pub mod endpoints;
pub mod strategy;

pub use endpoints::*;
pub use strategy::*;
