mod common;

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use brand_central_connector::{
	auth::{
		CacheKey, ClientCredentialsTokenProvider, MemoryTokenCache, TokenCache, TokenProvider,
	},
	config::{ClientAuthMethod, ConnectorOptions},
	connector::ExternalFileProvider,
	error::{ConfigError, Error},
	http::ReqwestHttpClient,
};

fn provider(options: ConnectorOptions) -> (ClientCredentialsTokenProvider, Arc<MemoryTokenCache>) {
	let cache_backend = Arc::new(MemoryTokenCache::default());
	let cache: Arc<dyn TokenCache> = cache_backend.clone();

	(ClientCredentialsTokenProvider::new(ReqwestHttpClient::default(), cache, options), cache_backend)
}

#[tokio::test]
async fn token_is_reused_across_api_calls() {
	let server = MockServer::start_async().await;
	let token_mock = common::mock_token_endpoint(&server).await;
	let api_mock =
		common::mock_api(&server, "/public_api/v1/file_types", 200, json!([])).await;
	let (connector, _, cache) = common::build_connector(&server.base_url(), Default::default());

	for _ in 0..2 {
		let types = connector.file_types().await.expect("File types should load.");

		assert!(types.data().is_some_and(|types| types.is_empty()));
	}

	assert_eq!(cache.len(), 1);

	token_mock.assert_calls_async(1).await;
	api_mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn concurrent_callers_share_one_exchange() {
	let server = MockServer::start_async().await;
	let token_mock = common::mock_token_endpoint(&server).await;
	let (provider, _) = provider(ConnectorOptions::default());
	let config = common::config(&server.base_url());
	let (a, b) = tokio::join!(provider.acquire_token(&config), provider.acquire_token(&config));

	assert_eq!(a.expect("First caller should get a token.").secret.expose(), common::ACCESS_TOKEN);
	assert_eq!(b.expect("Second caller should get a token.").secret.expose(), common::ACCESS_TOKEN);

	token_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn token_inside_preemptive_window_is_refreshed() {
	let server = MockServer::start_async().await;
	let token_mock = common::mock_token_endpoint(&server).await;
	// 1800s lifetime falls inside a one-hour window, so every call exchanges again.
	let (provider, _) =
		provider(ConnectorOptions::default().with_preemptive_window(time::Duration::hours(1)));
	let config = common::config(&server.base_url());

	provider.acquire_token(&config).await.expect("First exchange should succeed.");
	provider.acquire_token(&config).await.expect("Second exchange should succeed.");

	token_mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn client_secret_post_sends_credentials_in_body() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/2.0/token")
				.form_urlencoded_tuple("grant_type", "client_credentials")
				.form_urlencoded_tuple("client_id", common::CLIENT_ID)
				.form_urlencoded_tuple("client_secret", common::CLIENT_SECRET);
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"api-token\",\"token_type\":\"bearer\",\"expires_in\":1800}",
			);
		})
		.await;
	let (provider, _) =
		provider(ConnectorOptions::default().with_client_auth(ClientAuthMethod::ClientSecretPost));
	let token = provider
		.acquire_token(&common::config(&server.base_url()))
		.await
		.expect("Exchange should succeed.");

	assert_eq!(token.secret.expose(), common::ACCESS_TOKEN);

	token_mock.assert_async().await;
}

#[tokio::test]
async fn invalid_client_is_reported() {
	let server = MockServer::start_async().await;
	let _token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/2.0/token");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_client\",\"error_description\":\"Unknown client.\"}");
		})
		.await;
	let (provider, cache) = provider(ConnectorOptions::default());
	let err = provider
		.acquire_token(&common::config(&server.base_url()))
		.await
		.expect_err("Rejected credentials should fail.");

	assert!(matches!(err, Error::InvalidClient { .. }));
	assert!(cache.is_empty());
}

#[tokio::test]
async fn invalidate_forgets_cached_token() {
	let server = MockServer::start_async().await;
	let _token_mock = common::mock_token_endpoint(&server).await;
	let (provider, cache) = provider(ConnectorOptions::default());
	let config = common::config(&server.base_url());

	provider.acquire_token(&config).await.expect("Exchange should succeed.");

	let key = CacheKey::new(&config).expect("Key should build.");

	assert!(cache.fetch(&key).await.expect("Fetch should succeed.").is_some());

	provider.invalidate(&config).await.expect("Invalidate should succeed.");

	assert!(cache.is_empty());
}

#[tokio::test]
async fn unrepresentable_expiry_is_a_config_error() {
	let server = MockServer::start_async().await;
	let _token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/2.0/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"api-token\",\"token_type\":\"bearer\",\"expires_in\":1000000000000}",
			);
		})
		.await;
	let (provider, cache) = provider(ConnectorOptions::default());
	let err = provider
		.acquire_token(&common::config(&server.base_url()))
		.await
		.expect_err("An expiry past the representable range should fail.");

	assert!(matches!(err, Error::Config(ConfigError::ExpiresInOutOfRange)));
	assert!(cache.is_empty());
}
