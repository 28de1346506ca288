//! File-type catalog shapes.

// self
use crate::_prelude::*;

/// File-type key → display label, in key order.
pub type FileTypes = BTreeMap<String, String>;

/// One `{key, value}` pair from `GET /public_api/v1/file_types`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FileTypePayload {
	/// Machine key used as the search `fileType` filter.
	pub key: String,
	/// Display label.
	pub value: String,
}

/// Collects catalog entries; later duplicate keys overwrite earlier ones.
pub fn file_types(entries: Vec<FileTypePayload>) -> FileTypes {
	entries.into_iter().map(|entry| (entry.key, entry.value)).collect()
}
