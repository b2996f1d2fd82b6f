//! Builds VK authorization URLs for the `site` (code) and `client` (implicit) flows.

// crates.io
use color_eyre::Result;
use url::Url;
// self
use vkontakte_auth::{
	auth::ScopeList,
	config::Config,
	flows::{AuthorizationOptions, FlowType, ReqwestAuthorization},
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let config = Config::default()
		.with_app_id(51234567_u64)
		.with_app_secret("demo-secret")
		.with_redirect_uri(Url::parse("https://example.com/vk/callback")?)
		.with_api_version("5.199");
	let auth = ReqwestAuthorization::new(config)?;
	let site = auth.authorization_url(
		AuthorizationOptions::new(FlowType::Site)
			.with_scope(ScopeList::try_from(["friends", "offline"])?)
			.with_state("csrf-demo"),
	)?;
	let client = auth.authorization_url(
		AuthorizationOptions::new(FlowType::Client)
			.with_scope(ScopeList::single("photos")?)
			.with_param("display", "popup"),
	)?;

	println!("Redirect site users to: {site}.");
	println!("Open in the standalone app: {client}.");

	Ok(())
}
