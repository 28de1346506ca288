//! Host-facing file provider backed by the Brand Central public API.

// self
use crate::{
	_prelude::*,
	auth::{ClientCredentialsTokenProvider, TokenProvider},
	config::{self, ConnectorConfig, ConnectorOptions, FormFields, ValidationError},
	gateway::{ApiGateway, Fetched},
	host::{FileHost, FileVersion, FolderId},
	http::ReqwestHttpClient,
	import::FileImport,
	model::{
		self, AssetDetails, AssetPayload, ExternalFileList, FileTypePayload, FileTypes,
		SearchPayload, SearchRequest,
	},
	obs::{self, Operation},
};

/// Boxed future returned by [`ExternalFileProvider`] methods.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Operations a host expects from an external file provider.
pub trait ExternalFileProvider
where
	Self: Send + Sync,
{
	/// Replaces the provider settings with the submitted form, copied verbatim.
	fn load_from_request(&mut self, form: &FormFields) -> Result<()>;

	/// Validates a submitted settings form without loading it.
	fn validate_request(&self, form: &FormFields) -> Vec<ValidationError>;

	/// Fetches title, description, thumbnail, and file list of an asset.
	fn asset_details<'a>(&'a self, asset_id: &'a str) -> ProviderFuture<'a, Fetched<AssetDetails>>;

	/// Downloads a remote file and imports it into `destination`.
	fn import_file<'a>(
		&'a self,
		file_id: &'a str,
		destination: &'a FolderId,
	) -> ProviderFuture<'a, Fetched<FileVersion>>;

	/// Runs a paged asset search.
	fn search_files<'a>(
		&'a self,
		request: &'a SearchRequest,
	) -> ProviderFuture<'a, Fetched<ExternalFileList>>;

	/// Whether the provider can filter searches by file type.
	fn supports_file_types(&self) -> bool;

	/// Lists the file types searches can be filtered by.
	fn file_types(&self) -> ProviderFuture<'_, Fetched<FileTypes>>;

	/// Whether the host should render the provider's own picker instead of a generic browser.
	fn has_custom_import_handler(&self) -> bool;
}

/// Brand Central implementation of [`ExternalFileProvider`].
///
/// Settings are an immutable [`ConnectorConfig`] replaced as a whole on every load. Until a
/// configuration is loaded every remote operation returns [`Fetched::Unconfigured`].
#[derive(Clone)]
pub struct BrandCentralConnector {
	http_client: ReqwestHttpClient,
	tokens: Arc<dyn TokenProvider>,
	host: Arc<dyn FileHost>,
	options: ConnectorOptions,
	gateway: Option<ApiGateway>,
}
impl BrandCentralConnector {
	/// Creates a connector with the default reqwest transport and an in-memory token cache.
	pub fn new(host: Arc<dyn FileHost>, options: ConnectorOptions) -> Self {
		let http_client = ReqwestHttpClient::default();
		let tokens =
			Arc::new(ClientCredentialsTokenProvider::in_memory(http_client.clone(), options.clone()));

		Self::with_parts(http_client, tokens, host, options)
	}

	/// Creates a connector from caller-provided collaborators.
	pub fn with_parts(
		http_client: ReqwestHttpClient,
		tokens: Arc<dyn TokenProvider>,
		host: Arc<dyn FileHost>,
		options: ConnectorOptions,
	) -> Self {
		Self { http_client, tokens, host, options, gateway: None }
	}

	/// Installs an already-built configuration.
	pub fn with_config(mut self, config: ConnectorConfig) -> Self {
		self.install(config);

		self
	}

	/// Currently loaded configuration, if any.
	pub fn config(&self) -> Option<&ConnectorConfig> {
		self.gateway.as_ref().map(ApiGateway::config)
	}

	fn install(&mut self, config: ConnectorConfig) {
		self.gateway =
			Some(ApiGateway::new(Arc::new(config), self.http_client.clone(), self.tokens.clone()));
	}

	async fn fetch<T>(&self, path: &str, query: &[(&str, String)]) -> Result<Fetched<T>>
	where
		T: DeserializeOwned,
	{
		match &self.gateway {
			Some(gateway) => gateway.fetch(path, query).await,
			None => Ok(Fetched::Unconfigured),
		}
	}
}
impl ExternalFileProvider for BrandCentralConnector {
	fn load_from_request(&mut self, form: &FormFields) -> Result<()> {
		let config = ConnectorConfig::from_form(form)?;

		self.install(config);

		Ok(())
	}

	fn validate_request(&self, form: &FormFields) -> Vec<ValidationError> {
		config::validate_request(form)
	}

	fn asset_details<'a>(&'a self, asset_id: &'a str) -> ProviderFuture<'a, Fetched<AssetDetails>> {
		observed(Operation::AssetDetails, "asset_details", async move {
			let path = format!("/public_api/v1/assets/{asset_id}");
			let fetched = self.fetch::<AssetPayload>(&path, &[]).await?;

			Ok(fetched.map(AssetDetails::from))
		})
	}

	fn import_file<'a>(
		&'a self,
		file_id: &'a str,
		destination: &'a FolderId,
	) -> ProviderFuture<'a, Fetched<FileVersion>> {
		observed(Operation::Import, "import_file", async move {
			let Some(gateway) = &self.gateway else {
				return Ok(Fetched::Unconfigured);
			};
			let import = FileImport {
				gateway,
				http_client: &self.http_client,
				host: self.host.as_ref(),
				scratch_root: self.options.scratch_root.as_deref(),
			};

			import.run(file_id, destination).await
		})
	}

	fn search_files<'a>(
		&'a self,
		request: &'a SearchRequest,
	) -> ProviderFuture<'a, Fetched<ExternalFileList>> {
		observed(Operation::Search, "search_files", async move {
			let query = request.query_pairs();
			let fetched =
				self.fetch::<SearchPayload>("/public_api/v1/assets/search", &query).await?;

			Ok(fetched.map(ExternalFileList::from))
		})
	}

	fn supports_file_types(&self) -> bool {
		true
	}

	fn file_types(&self) -> ProviderFuture<'_, Fetched<FileTypes>> {
		observed(Operation::FileTypes, "file_types", async move {
			let fetched =
				self.fetch::<Vec<FileTypePayload>>("/public_api/v1/file_types", &[]).await?;

			Ok(fetched.map(model::file_types))
		})
	}

	fn has_custom_import_handler(&self) -> bool {
		true
	}
}
impl Debug for BrandCentralConnector {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BrandCentralConnector")
			.field("config", &self.config())
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}

fn observed<'a, T>(
	operation: Operation,
	stage: &'static str,
	fut: impl 'a + Send + Future<Output = Result<T>>,
) -> ProviderFuture<'a, T>
where
	T: 'a + Send,
{
	Box::pin(obs::observe(operation, stage, fut))
}
