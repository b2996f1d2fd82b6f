// crates.io
use httpmock::prelude::*;
// self
use vkontakte_auth::{
	_preludet::*,
	auth::{AppId, Secret},
	config::{ClientAuthMethod, Config},
	error::TransientError,
	flows::{AppOptions, AuthorizationOptions, FlowType},
	provider::Endpoints,
};

const APP_ID: u64 = 7654321;
const APP_SECRET: &str = "s";
const REDIRECT: &str = "https://example.com/vk/callback";

fn endpoints(server: &MockServer) -> Endpoints {
	Endpoints::builder(Url::parse(&server.base_url()).expect("Mock base URL should parse."))
		.build()
		.expect("Mock endpoints should build.")
}

fn config(server: &MockServer) -> Config {
	Config::default()
		.with_app_id(AppId::from(APP_ID))
		.with_app_secret(APP_SECRET)
		.with_redirect_uri(Url::parse(REDIRECT).expect("Redirect fixture should parse."))
		.with_endpoints(endpoints(server))
}

fn authorization(config: Config) -> ReqwestTestAuthorization {
	build_reqwest_test_authorization(config)
}

#[tokio::test]
async fn site_code_exchange_returns_authorized_client() {
	let server = MockServer::start_async().await;
	let auth = authorization(config(&server));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/access_token")
				.header("content-type", "application/x-www-form-urlencoded")
				.form_urlencoded_tuple("grant_type", "authorization_code")
				.form_urlencoded_tuple("code", "abc")
				.form_urlencoded_tuple("redirect_uri", REDIRECT)
				.form_urlencoded_tuple("client_secret", APP_SECRET);
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"tok123","expires_in":86400,"user_id":1,"email":"a@b.c"}"#);
		})
		.await;
	let client = auth
		.authorize(AuthorizationOptions::site_code("abc"))
		.await
		.expect("Code exchange should succeed.");

	mock.assert_async().await;

	assert_eq!(client.token(), Some("tok123"));
	assert_eq!(client.user_id(), Some(1));
	assert_eq!(client.email(), Some("a@b.c"));
	assert!(client.expires_at().is_some());
	assert!(!client.is_expired());
}

#[tokio::test]
async fn offline_token_without_expiry_never_expires() {
	let server = MockServer::start_async().await;
	let auth = authorization(config(&server));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/access_token");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"offline","expires_in":0,"user_id":42}"#);
		})
		.await;
	let client = auth
		.authorize(AuthorizationOptions::site_code("abc"))
		.await
		.expect("Code exchange should succeed.");

	mock.assert_async().await;

	assert_eq!(client.token(), Some("offline"));
	assert!(client.expires_at().is_none());
}

#[tokio::test]
async fn app_server_sends_credentials_in_request_body() {
	let server = MockServer::start_async().await;
	let auth = authorization(
		config(&server).with_client_auth_method(ClientAuthMethod::BasicAuth).with_api_version("5.199"),
	);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/access_token")
				.form_urlencoded_tuple("grant_type", "client_credentials")
				.form_urlencoded_tuple("client_id", APP_ID.to_string())
				.form_urlencoded_tuple("client_secret", APP_SECRET)
				.form_urlencoded_tuple("v", "5.199");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"service-token","expires_in":0}"#);
		})
		.await;
	let client = auth
		.authorize(AuthorizationOptions::new(FlowType::AppServer))
		.await
		.expect("Client credentials exchange should succeed.");

	mock.assert_async().await;

	assert_eq!(client.token(), Some("service-token"));
	assert_eq!(client.user_id(), None);
}

#[tokio::test]
async fn app_server_identity_comes_from_app_options() {
	let server = MockServer::start_async().await;
	let auth = authorization(Config::default().with_endpoints(endpoints(&server)));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/access_token")
				.form_urlencoded_tuple("grant_type", "client_credentials")
				.form_urlencoded_tuple("client_id", "1")
				.form_urlencoded_tuple("client_secret", "s");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"per-call","expires_in":0}"#);
		})
		.await;
	let client = auth
		.authorize(
			AuthorizationOptions::new(FlowType::AppServer).with_app_options(
				AppOptions::default().with_app_id(AppId::from(1_u64)).with_app_secret("s"),
			),
		)
		.await
		.expect("Per-call identity should authenticate.");

	mock.assert_async().await;

	assert_eq!(client.token(), Some("per-call"));
	assert_eq!(auth.clients().len(), 1);
}

#[tokio::test]
async fn app_server_forwards_resolved_redirect() {
	let server = MockServer::start_async().await;
	let auth = authorization(config(&server));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/access_token")
				.form_urlencoded_tuple("grant_type", "client_credentials")
				.form_urlencoded_tuple("redirect_uri", REDIRECT);
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"service-token","expires_in":0}"#);
		})
		.await;

	auth.authorize(AuthorizationOptions::new(FlowType::AppServer))
		.await
		.expect("Client credentials exchange should carry the redirect.");

	mock.assert_async().await;
}

#[tokio::test]
async fn oversized_expires_in_is_reported_as_upstream_failure() {
	let server = MockServer::start_async().await;
	let auth = authorization(config(&server));
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/access_token");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"tok","expires_in":18446744073709551615}"#);
		})
		.await;
	let err = auth
		.authorize(AuthorizationOptions::site_code("abc"))
		.await
		.expect_err("Unrepresentable expiry should fail.");

	assert!(matches!(err, Error::Transient(TransientError::ExpiresInOutOfRange { .. })));
}

#[tokio::test]
async fn invalid_code_maps_to_invalid_grant() {
	let server = MockServer::start_async().await;
	let auth = authorization(config(&server));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/access_token");
			then.status(401).header("content-type", "application/json").body(
				r#"{"error":"invalid_grant","error_description":"Code is invalid or expired."}"#,
			);
		})
		.await;
	let err = auth
		.authorize(AuthorizationOptions::site_code("stale"))
		.await
		.expect_err("Expired code should be rejected.");

	mock.assert_async().await;

	assert!(matches!(err, Error::InvalidGrant { .. }));
	assert!(err.to_string().contains("Code is invalid or expired"));
}

#[tokio::test]
async fn wrong_secret_maps_to_invalid_client() {
	let server = MockServer::start_async().await;
	let auth = authorization(config(&server));
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/access_token");
			then.status(401).header("content-type", "application/json").body(
				r#"{"error":"invalid_client","error_description":"client_secret is incorrect"}"#,
			);
		})
		.await;
	let err = auth
		.authorize(AuthorizationOptions::new(FlowType::AppServer))
		.await
		.expect_err("Wrong secret should be rejected.");

	assert!(matches!(err, Error::InvalidClient { .. }));
}

#[tokio::test]
async fn unavailable_endpoint_is_transient_with_retry_hint() {
	let server = MockServer::start_async().await;
	let auth = authorization(config(&server));
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/access_token");
			then.status(503)
				.header("content-type", "application/json")
				.header("retry-after", "30")
				.body(r#"{"error":"temporarily_unavailable"}"#);
		})
		.await;
	let err = auth
		.authorize(AuthorizationOptions::site_code("abc"))
		.await
		.expect_err("Unavailable endpoint should fail.");

	match err {
		Error::Transient(TransientError::TokenEndpoint { status, retry_after, .. }) => {
			assert_eq!(status, Some(503));
			assert_eq!(retry_after.map(|hint| hint.whole_seconds()), Some(30));
		},
		other => panic!("Expected a transient error, got {other:?}."),
	}
}

#[tokio::test]
async fn client_flow_never_reaches_token_endpoint() {
	let server = MockServer::start_async().await;
	let auth = authorization(config(&server));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/access_token");
			then.status(200);
		})
		.await;
	let err = auth
		.authorize(AuthorizationOptions::new(FlowType::Client))
		.await
		.expect_err("Implicit flow has no token exchange.");

	assert!(matches!(err, Error::InvalidArgument { .. }));

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn factory_reuses_first_client_for_an_app_id() {
	let server = MockServer::start_async().await;
	let auth = authorization(config(&server).with_app_secret("first"));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/access_token")
				.form_urlencoded_tuple("client_secret", "first");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"service-token","expires_in":0}"#);
		})
		.await;
	let rotated = AppOptions::default().with_app_secret(Secret::new("rotated"));

	auth.authorize(AuthorizationOptions::new(FlowType::AppServer))
		.await
		.expect("First exchange should succeed.");
	auth.authorize(AuthorizationOptions::new(FlowType::AppServer).with_app_options(rotated.clone()))
		.await
		.expect("Second exchange should reuse the cached client.");

	mock.assert_calls_async(2).await;

	let first = auth.client(None).expect("Cached client should resolve.");
	let second = auth.client(Some(&rotated)).expect("Cached client should resolve.");

	assert!(Arc::ptr_eq(&first, &second));
	assert_eq!(auth.clients().len(), 1);
}

#[tokio::test]
async fn concurrent_exchanges_share_one_facade() {
	let server = MockServer::start_async().await;
	let auth = Arc::new(authorization(config(&server)));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/access_token");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"shared","expires_in":3600}"#);
		})
		.await;
	let handles = (0..4)
		.map(|_| {
			let auth = auth.clone();

			tokio::spawn(async move {
				auth.authorize(AuthorizationOptions::new(FlowType::AppServer)).await
			})
		})
		.collect::<Vec<_>>();

	for handle in handles {
		let client = handle
			.await
			.expect("Exchange task should not panic.")
			.expect("Concurrent exchange should succeed.");

		assert_eq!(client.token(), Some("shared"));
	}

	mock.assert_calls_async(4).await;

	assert_eq!(auth.clients().len(), 1);
}
