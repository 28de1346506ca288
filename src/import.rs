//! Remote file import: download, hand to the host importer, relocate, tag.
//!
//! The downloaded bytes live in a scratch directory owned by the import call; it is removed
//! when [`FileImport::run`] returns, whatever the outcome. Partial host work is not rolled back.

// std
use std::{ffi::OsStr, fs};
// crates.io
use tempfile::TempDir;
// self
use crate::{
	_prelude::*,
	error::TransportError,
	gateway::{ApiGateway, Fetched},
	host::{ASSET_ATTRIBUTE, FileHost, FileVersion, FolderId},
	http::ReqwestHttpClient,
	model::FileDownload,
};

const DOWNLOAD_TARGET: &str = "the asset download URL";
const SCRATCH_PREFIX: &str = "brand-central-";

/// One import run bound to a gateway, a download client, and a host.
#[derive(Clone, Copy)]
pub struct FileImport<'a> {
	/// Gateway resolving the remote file.
	pub gateway: &'a ApiGateway,
	/// Unauthenticated client used for the download itself.
	pub http_client: &'a ReqwestHttpClient,
	/// Host receiving the file.
	pub host: &'a dyn FileHost,
	/// Parent of the scratch directory; the system temp dir when `None`.
	pub scratch_root: Option<&'a Path>,
}
impl FileImport<'_> {
	/// Imports remote file `file_id` into `destination`.
	pub async fn run(&self, file_id: &str, destination: &FolderId) -> Result<Fetched<FileVersion>> {
		let path = format!("/public_api/v1/assets/get_file/{file_id}");
		let download = match self.gateway.fetch::<FileDownload>(&path, &[]).await? {
			Fetched::Data(download) => download,
			Fetched::Empty => return Ok(Fetched::Empty),
			Fetched::Unconfigured => return Ok(Fetched::Unconfigured),
			Fetched::Rejected { status } => return Ok(Fetched::Rejected { status }),
		};
		let file_name = scratch_file_name(&download.original_file_name)?;
		let bytes = self.download(&download.download_url).await?;
		let scratch = scratch_dir(self.scratch_root)?;
		let local_path = scratch.path().join(file_name);

		// Blocking write on the caller's executor; the file is request-scoped and already in memory.
		fs::write(&local_path, &bytes).map_err(TransportError::from)?;

		let version = self.host.import_local_file(&local_path).await?;
		let folder = self.host.folder(destination).await?;

		self.host.set_file_folder(&version.file, &folder).await?;
		self.host.move_file_node(&version.file, &folder).await?;
		self.host.set_file_attribute(&version.file, ASSET_ATTRIBUTE, &download.asset_id).await?;

		#[cfg(feature = "tracing")]
		tracing::info!(
			file_id,
			asset_id = %download.asset_id,
			host_file = %version.file,
			folder = %folder.id,
			"imported remote file"
		);

		Ok(Fetched::Data(version))
	}

	async fn download(&self, url: &str) -> Result<Vec<u8>> {
		let response = self.http_client.send_get(url, None, DOWNLOAD_TARGET).await?;

		if response.status != StatusCode::OK {
			return Err(Error::Download {
				url: url.to_owned(),
				status: response.status.as_u16(),
				reason: response.status.canonical_reason().unwrap_or("Unknown").to_owned(),
			});
		}

		Ok(response.body)
	}
}
impl Debug for FileImport<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FileImport")
			.field("gateway", self.gateway)
			.field("scratch_root", &self.scratch_root)
			.finish_non_exhaustive()
	}
}

/// Keeps only the final path component so remote names cannot escape the scratch directory.
fn scratch_file_name(name: &str) -> Result<&OsStr> {
	Path::new(name)
		.file_name()
		.filter(|component| !component.is_empty())
		.ok_or_else(|| Error::InvalidFileName { name: name.to_owned() })
}

fn scratch_dir(root: Option<&Path>) -> Result<TempDir> {
	let mut builder = tempfile::Builder::new();

	builder.prefix(SCRATCH_PREFIX);

	let dir = match root {
		Some(root) => builder.tempdir_in(root),
		None => builder.tempdir(),
	};

	Ok(dir.map_err(TransportError::from)?)
}
