//! Walks a Brand Central connector through settings validation, search, and import against a
//! local mock of the remote service, landing the file in an in-memory host.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use brand_central_connector::{
	config::{ConnectorOptions, FormFields},
	connector::{BrandCentralConnector, ExternalFileProvider},
	host::{ASSET_ATTRIBUTE, FileHost, MemoryHost},
	model::SearchRequest,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/2.0/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":900}",
			);
		})
		.await;
	let _search_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/public_api/v1/assets/search")
				.header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", "application/json").body(
				"{\"assets\":[{\"id\":7,\"thumbnail\":null,\"name\":\"Primary logo\"}],\"total\":1}",
			);
		})
		.await;
	let download_url = server.url("/cdn/7/logo.svg");
	let _get_file_mock = server
		.mock_async(move |when, then| {
			when.method(GET)
				.path("/public_api/v1/assets/get_file/7")
				.header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"downloadUrl\":\"{download_url}\",\"originalFileName\":\"logo.svg\",\"assetId\":7}}"
			));
		})
		.await;
	let _download_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cdn/7/logo.svg");
			then.status(200).header("content-type", "image/svg+xml").body("<svg/>");
		})
		.await;
	let host = Arc::new(MemoryHost::default());
	let folder = host.add_folder("brand", "Brand assets");
	let shared_host: Arc<dyn FileHost> = host.clone();
	let mut connector = BrandCentralConnector::new(shared_host, ConnectorOptions::default());
	let form = FormFields::from([
		("endpoint".to_owned(), server.base_url()),
		("clientId".to_owned(), "demo-client".to_owned()),
		("clientSecret".to_owned(), "super-secret".to_owned()),
	]);

	assert!(connector.validate_request(&form).is_empty());

	connector.load_from_request(&form)?;

	let results = connector
		.search_files(&SearchRequest::default().with_search_term("logo"))
		.await?
		.into_data_or_default();

	println!("Search matched {} asset(s).", results.total_files);

	for entry in &results.files {
		let Some(version) = connector.import_file(&entry.id, &folder.id).await?.data() else {
			println!("Asset {} could not be imported.", entry.id);

			continue;
		};
		let file = host.file(&version.file).unwrap_or_default();

		println!(
			"Imported {} into {} (asset {}).",
			file.filename,
			folder.name,
			file.attributes.get(ASSET_ATTRIBUTE).map(String::as_str).unwrap_or("?"),
		);
	}

	token_mock.assert_async().await;

	Ok(())
}
