//! Asset detail and file download shapes.

// self
use crate::{_prelude::*, model::RemoteId};

/// Asset details returned to the host picker.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDetails {
	/// Asset title (`name` upstream).
	pub title: Option<String>,
	/// Asset description (`desc` upstream).
	pub description: Option<String>,
	/// Thumbnail URL.
	pub thumbnail_url: Option<String>,
	/// Remote file id → filename; later duplicates overwrite earlier ones.
	pub files: BTreeMap<RemoteId, String>,
}
impl From<AssetPayload> for AssetDetails {
	fn from(payload: AssetPayload) -> Self {
		let files = payload
			.files
			.unwrap_or_default()
			.into_iter()
			.map(|file| (file.id, file.filename))
			.collect();

		Self { title: payload.name, description: payload.desc, thumbnail_url: payload.thumbnail, files }
	}
}

/// `GET /public_api/v1/assets/{id}` response body.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AssetPayload {
	/// Asset name.
	pub name: Option<String>,
	/// Asset description.
	pub desc: Option<String>,
	/// Thumbnail URL.
	pub thumbnail: Option<String>,
	/// Files attached to the asset.
	pub files: Option<Vec<AssetFilePayload>>,
}

/// One file attached to an asset.
#[derive(Clone, Debug, Deserialize)]
pub struct AssetFilePayload {
	/// Remote file id.
	pub id: RemoteId,
	/// Original filename.
	#[serde(default)]
	pub filename: String,
}

/// `GET /public_api/v1/assets/get_file/{id}` response body.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDownload {
	/// Unauthenticated URL serving the file bytes.
	pub download_url: String,
	/// Filename the asset was uploaded with.
	pub original_file_name: String,
	/// Asset the file belongs to.
	pub asset_id: RemoteId,
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::model::decode;

	#[test]
	fn payload_maps_into_details() {
		let payload: AssetPayload = decode(json!({
			"name": "A",
			"desc": "B",
			"thumbnail": "T",
			"files": [{ "id": 1, "filename": "x" }, { "id": 2, "filename": "y" }],
		}))
		.expect("Asset payload should decode.");
		let details = AssetDetails::from(payload);

		assert_eq!(details.title.as_deref(), Some("A"));
		assert_eq!(details.description.as_deref(), Some("B"));
		assert_eq!(details.thumbnail_url.as_deref(), Some("T"));
		assert_eq!(details.files.get("1").map(String::as_str), Some("x"));
		assert_eq!(details.files.get("2").map(String::as_str), Some("y"));
	}

	#[test]
	fn duplicate_file_ids_keep_the_last_filename() {
		let payload: AssetPayload = decode(json!({
			"files": [{ "id": "7", "filename": "first" }, { "id": 7, "filename": "second" }],
		}))
		.expect("Asset payload should decode.");
		let details = AssetDetails::from(payload);

		assert_eq!(details.files.len(), 1);
		assert_eq!(details.files.get("7").map(String::as_str), Some("second"));
		assert_eq!(details.title, None);
	}

	#[test]
	fn non_array_files_are_malformed() {
		let err = decode::<AssetPayload>(json!({ "files": "nope" }))
			.expect_err("A string `files` field should be rejected.");

		match err {
			Error::MalformedResponse { path, .. } => assert_eq!(path, "files"),
			other => panic!("Unexpected error: {other:?}."),
		}
	}

	#[test]
	fn download_payload_uses_camel_case() {
		let download: FileDownload = decode(json!({
			"downloadUrl": "https://cdn.example.com/x.png",
			"originalFileName": "x.png",
			"assetId": 99,
		}))
		.expect("Download payload should decode.");

		assert_eq!(download.asset_id, RemoteId::from(99_u64));
		assert_eq!(download.original_file_name, "x.png");
	}
}
