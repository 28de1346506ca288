//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
// self
use brand_central_connector::{
	auth::{ClientCredentialsTokenProvider, MemoryTokenCache, TokenCache, TokenProvider},
	config::{ConnectorConfig, ConnectorOptions, FormFields},
	connector::BrandCentralConnector,
	host::{FileHost, MemoryHost},
	http::ReqwestHttpClient,
};

pub const CLIENT_ID: &str = "brand-central-client";
pub const CLIENT_SECRET: &str = "brand-central-secret";
pub const ACCESS_TOKEN: &str = "api-token";
pub const BEARER: &str = "Bearer api-token";

pub fn form(endpoint: &str) -> FormFields {
	[("endpoint", endpoint), ("clientId", CLIENT_ID), ("clientSecret", CLIENT_SECRET)]
		.into_iter()
		.map(|(key, value)| (key.to_owned(), value.to_owned()))
		.collect()
}

pub fn config(endpoint: &str) -> ConnectorConfig {
	ConnectorConfig::new(endpoint, CLIENT_ID, CLIENT_SECRET)
}

/// Connector wired to an in-memory host and token cache, loaded with `endpoint`.
pub fn build_connector(
	endpoint: &str,
	options: ConnectorOptions,
) -> (BrandCentralConnector, Arc<MemoryHost>, Arc<MemoryTokenCache>) {
	let http_client = ReqwestHttpClient::default();
	let cache_backend = Arc::new(MemoryTokenCache::default());
	let cache: Arc<dyn TokenCache> = cache_backend.clone();
	let tokens: Arc<dyn TokenProvider> = Arc::new(ClientCredentialsTokenProvider::new(
		http_client.clone(),
		cache,
		options.clone(),
	));
	let host_backend = Arc::new(MemoryHost::default());
	let host: Arc<dyn FileHost> = host_backend.clone();
	let connector = BrandCentralConnector::with_parts(http_client, tokens, host, options)
		.with_config(config(endpoint));

	(connector, host_backend, cache_backend)
}

/// Token endpoint answering with [`ACCESS_TOKEN`] valid for 30 minutes.
pub async fn mock_token_endpoint(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/2.0/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"api-token\",\"token_type\":\"bearer\",\"expires_in\":1800}",
			);
		})
		.await
}

/// GET `path` with the bearer token, answering `status` with a JSON `body`.
pub async fn mock_api<'a>(
	server: &'a MockServer,
	path: &str,
	status: u16,
	body: serde_json::Value,
) -> httpmock::Mock<'a> {
	let path = path.to_owned();

	server
		.mock_async(move |when, then| {
			when.method(GET).path(path).header("authorization", BEARER);
			then.status(status).header("content-type", "application/json").body(body.to_string());
		})
		.await
}
