//! Host file-store contract consumed by the import pipeline, plus an in-memory host.

// std
use std::fs;
// self
use crate::_prelude::*;

/// Attribute key tagging imported files with their source asset.
pub const ASSET_ATTRIBUTE: &str = "brand_central_asset_file_id";

/// Boxed future returned by [`FileHost`] methods.
pub type HostFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, HostError>> + 'a + Send>>;

/// Services the host exposes to file providers.
pub trait FileHost
where
	Self: Send + Sync,
{
	/// Ingests a local file into the host's version store.
	fn import_local_file<'a>(&'a self, path: &'a Path) -> HostFuture<'a, FileVersion>;

	/// Resolves a folder by id.
	fn folder<'a>(&'a self, id: &'a FolderId) -> HostFuture<'a, Folder>;

	/// Sets the logical folder attribute of `file`.
	fn set_file_folder<'a>(&'a self, file: &'a FileId, folder: &'a Folder) -> HostFuture<'a, ()>;

	/// Moves the file-tree node of `file` under `folder`.
	fn move_file_node<'a>(&'a self, file: &'a FileId, folder: &'a Folder) -> HostFuture<'a, ()>;

	/// Sets a custom attribute on `file`.
	fn set_file_attribute<'a>(
		&'a self,
		file: &'a FileId,
		key: &'a str,
		value: &'a str,
	) -> HostFuture<'a, ()>;
}

/// Error type produced by [`FileHost`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
#[error("Host file store failure: {message}.")]
pub struct HostError {
	/// Human-readable error payload.
	pub message: String,
}
impl HostError {
	/// Creates an error carrying `message`.
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}
}

/// Host identifier of a file record.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileId(pub u64);
impl Display for FileId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}", self.0)
	}
}

/// Host identifier of a folder.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FolderId(pub String);
impl From<&str> for FolderId {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}
impl Display for FolderId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Resolved host folder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
	/// Folder id.
	pub id: FolderId,
	/// Display name.
	pub name: String,
}

/// Handle to an imported file version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileVersion {
	/// File the version belongs to.
	pub file: FileId,
	/// 1-based version number.
	pub version: u32,
	/// Filename recorded by the host.
	pub filename: String,
}

/// Snapshot of a file held by [`MemoryHost`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryFile {
	/// Filename at import time.
	pub filename: String,
	/// Imported bytes.
	pub contents: Vec<u8>,
	/// Logical folder attribute.
	pub folder: Option<FolderId>,
	/// Folder the file-tree node lives under.
	pub node_parent: Option<FolderId>,
	/// Custom attributes.
	pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct MemoryHostState {
	folders: BTreeMap<FolderId, Folder>,
	files: BTreeMap<FileId, MemoryFile>,
	next_file: u64,
}

/// Thread-safe host used by tests and demos.
///
/// Imported bytes are copied into memory so they outlive the caller's scratch directory.
#[derive(Clone, Debug, Default)]
pub struct MemoryHost(Arc<RwLock<MemoryHostState>>);
impl MemoryHost {
	/// Registers a folder that imports can target.
	pub fn add_folder(&self, id: impl Into<String>, name: impl Into<String>) -> Folder {
		let folder = Folder { id: FolderId(id.into()), name: name.into() };

		self.0.write().folders.insert(folder.id.clone(), folder.clone());

		folder
	}

	/// Returns a snapshot of the file stored under `id`.
	pub fn file(&self, id: &FileId) -> Option<MemoryFile> {
		self.0.read().files.get(id).cloned()
	}

	/// Number of imported files.
	pub fn file_count(&self) -> usize {
		self.0.read().files.len()
	}

	fn with_file<T>(
		&self,
		id: &FileId,
		f: impl FnOnce(&mut MemoryFile) -> T,
	) -> Result<T, HostError> {
		let mut state = self.0.write();
		let file =
			state.files.get_mut(id).ok_or_else(|| HostError::new(format!("file {id} not found")))?;

		Ok(f(file))
	}
}
impl FileHost for MemoryHost {
	fn import_local_file<'a>(&'a self, path: &'a Path) -> HostFuture<'a, FileVersion> {
		Box::pin(async move {
			let contents = fs::read(path).map_err(|e| {
				HostError::new(format!("failed to read {}: {e}", path.display()))
			})?;
			let filename = path
				.file_name()
				.map(|name| name.to_string_lossy().into_owned())
				.ok_or_else(|| HostError::new(format!("{} has no filename", path.display())))?;
			let mut state = self.0.write();

			state.next_file += 1;

			let file = FileId(state.next_file);

			state.files.insert(
				file.clone(),
				MemoryFile { filename: filename.clone(), contents, ..Default::default() },
			);

			Ok(FileVersion { file, version: 1, filename })
		})
	}

	fn folder<'a>(&'a self, id: &'a FolderId) -> HostFuture<'a, Folder> {
		Box::pin(async move {
			self.0
				.read()
				.folders
				.get(id)
				.cloned()
				.ok_or_else(|| HostError::new(format!("folder {id} not found")))
		})
	}

	fn set_file_folder<'a>(&'a self, file: &'a FileId, folder: &'a Folder) -> HostFuture<'a, ()> {
		Box::pin(async move { self.with_file(file, |record| record.folder = Some(folder.id.clone())) })
	}

	fn move_file_node<'a>(&'a self, file: &'a FileId, folder: &'a Folder) -> HostFuture<'a, ()> {
		Box::pin(async move {
			self.with_file(file, |record| record.node_parent = Some(folder.id.clone()))
		})
	}

	fn set_file_attribute<'a>(
		&'a self,
		file: &'a FileId,
		key: &'a str,
		value: &'a str,
	) -> HostFuture<'a, ()> {
		Box::pin(async move {
			self.with_file(file, |record| {
				record.attributes.insert(key.to_owned(), value.to_owned());
			})
		})
	}
}
