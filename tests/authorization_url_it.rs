// std
use std::collections::HashMap;
// self
use vkontakte_auth::{
	auth::{AppId, ScopeList},
	config::Config,
	error::{ConfigError, Error},
	flows::{AppOptions, AuthorizationOptions, FlowType, ReqwestAuthorization},
	url::Url,
};

const APP_ID: u64 = 51234567;
const REDIRECT: &str = "https://example.com/vk/callback";

fn authorization() -> ReqwestAuthorization {
	let config = Config::default()
		.with_app_id(AppId::from(APP_ID))
		.with_app_secret("app-secret")
		.with_redirect_uri(Url::parse(REDIRECT).expect("Redirect fixture should parse."));

	ReqwestAuthorization::new(config).expect("Authorization should build from config.")
}

fn pairs(url: &Url) -> HashMap<String, String> {
	url.query_pairs().into_owned().collect()
}

#[test]
fn site_url_targets_vk_with_configured_defaults() {
	let url = authorization()
		.authorization_url(AuthorizationOptions::new(FlowType::Site).with_state("csrf-1"))
		.expect("Site authorization URL should build.");
	let pairs = pairs(&url);

	assert!(url.as_str().starts_with("https://oauth.vk.com/authorize?"));
	assert_eq!(pairs.get("response_type"), Some(&"code".into()));
	assert_eq!(pairs.get("client_id"), Some(&APP_ID.to_string()));
	assert_eq!(pairs.get("redirect_uri"), Some(&REDIRECT.into()));
	assert_eq!(pairs.get("state"), Some(&"csrf-1".into()));
	assert!(!pairs.contains_key("scope"));
}

#[test]
fn single_scope_and_one_element_list_produce_identical_urls() {
	let auth = authorization();
	let single = ScopeList::single("friends").expect("Single scope should validate.");
	let list = ScopeList::try_from(vec!["friends".to_owned()]).expect("Scope list should validate.");
	let first = auth
		.authorization_url(
			AuthorizationOptions::new(FlowType::Client).with_scope(single).with_state("s"),
		)
		.expect("URL with a single scope should build.");
	let second = auth
		.authorization_url(
			AuthorizationOptions::new(FlowType::Client).with_scope(list).with_state("s"),
		)
		.expect("URL with a scope list should build.");

	assert_eq!(first, second);
	assert_eq!(pairs(&first).get("scope"), Some(&"friends".into()));
}

#[test]
fn scope_list_is_comma_joined_in_caller_order() {
	let scope =
		ScopeList::try_from(["wall", "friends", "offline"]).expect("Scope list should validate.");
	let url = authorization()
		.authorization_url(AuthorizationOptions::new(FlowType::Client).with_scope(scope))
		.expect("Client authorization URL should build.");
	let pairs = pairs(&url);

	assert_eq!(pairs.get("response_type"), Some(&"token".into()));
	assert_eq!(pairs.get("scope"), Some(&"wall,friends,offline".into()));
}

#[test]
fn extra_params_and_api_version_are_forwarded() {
	let config = Config::default()
		.with_app_id(AppId::from(APP_ID))
		.with_api_version("5.199")
		.with_redirect_uri(Url::parse(REDIRECT).expect("Redirect fixture should parse."));
	let auth = ReqwestAuthorization::new(config).expect("Authorization should build.");
	let url = auth
		.authorization_url(
			AuthorizationOptions::new(FlowType::Site)
				.with_param("display", "mobile")
				.with_param("revoke", "1"),
		)
		.expect("Site authorization URL should build.");
	let pairs = pairs(&url);

	assert_eq!(pairs.get("v"), Some(&"5.199".into()));
	assert_eq!(pairs.get("display"), Some(&"mobile".into()));
	assert_eq!(pairs.get("revoke"), Some(&"1".into()));
}

#[test]
fn explicit_redirect_beats_app_options_and_config() {
	let explicit = "https://explicit.example.com/cb";
	let url = authorization()
		.authorization_url(
			AuthorizationOptions::new(FlowType::Site)
				.with_redirect_uri(Url::parse(explicit).expect("Redirect fixture should parse."))
				.with_app_options(AppOptions::default().with_redirect_uri(
					Url::parse("https://app.example.com/cb").expect("Redirect fixture should parse."),
				)),
		)
		.expect("Site authorization URL should build.");

	assert_eq!(pairs(&url).get("redirect_uri"), Some(&explicit.into()));
}

#[test]
fn unknown_flow_names_are_invalid_arguments() {
	let err = "bogus".parse::<FlowType>().expect_err("Unknown flow should be rejected.");

	assert!(matches!(err, Error::InvalidArgument { .. }));
	assert!(err.to_string().contains("bogus"));
}

#[test]
fn app_server_has_no_authorization_url() {
	let err = authorization()
		.authorization_url(AuthorizationOptions::new(FlowType::AppServer))
		.expect_err("App server flow should be rejected by the URL builder.");

	assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[test]
fn missing_app_id_surfaces_config_error() {
	let auth = ReqwestAuthorization::new(Config::default()).expect("Authorization should build.");
	let err = auth
		.authorization_url(AuthorizationOptions::new(FlowType::Client))
		.expect_err("URL without any app id should fail.");

	assert!(matches!(err, Error::Config(ConfigError::MissingAppId)));
}

#[test]
fn options_deserialize_from_json_with_type_field() {
	let options: AuthorizationOptions = serde_json::from_str(
		r#"{"type":"client","scope":"friends,photos","state":"abc"}"#,
	)
	.expect("Options should deserialize.");
	let url = authorization().authorization_url(options).expect("Client URL should build.");
	let pairs = pairs(&url);

	assert_eq!(pairs.get("response_type"), Some(&"token".into()));
	assert_eq!(pairs.get("scope"), Some(&"friends,photos".into()));
	assert_eq!(pairs.get("state"), Some(&"abc".into()));
}
