//! Asset search request and paged result shapes.

// self
use crate::{_prelude::*, model::RemoteId};

/// Search query supplied by the host picker.
///
/// Unset fields are left out of the query string entirely.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
	/// Free-text keywords.
	pub search_term: Option<String>,
	/// File-type key from the catalog.
	pub file_type: Option<String>,
	/// Sort column.
	pub order_by: Option<String>,
	/// Sort direction (`asc`/`desc`).
	pub order_by_direction: Option<String>,
	/// 1-based page number.
	pub current_page: Option<u32>,
	/// Page size.
	pub items_per_page: Option<u32>,
}
impl SearchRequest {
	/// Sets the free-text keywords.
	pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
		self.search_term = Some(term.into());

		self
	}

	/// Restricts results to one file type.
	pub fn with_file_type(mut self, file_type: impl Into<String>) -> Self {
		self.file_type = Some(file_type.into());

		self
	}

	/// Sets the sort column and direction.
	pub fn with_order(mut self, column: impl Into<String>, direction: impl Into<String>) -> Self {
		self.order_by = Some(column.into());
		self.order_by_direction = Some(direction.into());

		self
	}

	/// Sets the page number and page size.
	pub fn with_page(mut self, page: u32, items_per_page: u32) -> Self {
		self.current_page = Some(page);
		self.items_per_page = Some(items_per_page);

		self
	}

	/// Query pairs in the order the remote service documents them.
	pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
		let numeric = |value: Option<u32>| value.map(|v| v.to_string());

		[
			("keywords", self.search_term.clone()),
			("fileType", self.file_type.clone()),
			("orderBy", self.order_by.clone()),
			("orderByDirection", self.order_by_direction.clone()),
			("ccm_paging_p", numeric(self.current_page)),
			("ipp", numeric(self.items_per_page)),
		]
		.into_iter()
		.filter_map(|(key, value)| value.map(|value| (key, value)))
		.collect()
	}
}

/// One search result row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalFileEntry {
	/// Remote asset id.
	pub id: RemoteId,
	/// Thumbnail URL.
	pub thumbnail_url: Option<String>,
	/// Asset title.
	pub title: Option<String>,
}

/// One page of search results.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalFileList {
	/// Entries on this page, in remote order.
	pub files: Vec<ExternalFileEntry>,
	/// Total matches across every page.
	pub total_files: u64,
}
impl From<SearchPayload> for ExternalFileList {
	fn from(payload: SearchPayload) -> Self {
		let files = payload
			.assets
			.into_iter()
			.map(|asset| ExternalFileEntry {
				id: asset.id,
				thumbnail_url: asset.thumbnail,
				title: asset.name,
			})
			.collect();

		Self { files, total_files: payload.total }
	}
}

/// `GET /public_api/v1/assets/search` response body.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchPayload {
	/// Assets on the requested page.
	pub assets: Vec<SearchAssetPayload>,
	/// Total matches.
	pub total: u64,
}

/// One asset in a search response.
#[derive(Clone, Debug, Deserialize)]
pub struct SearchAssetPayload {
	/// Remote asset id.
	pub id: RemoteId,
	/// Thumbnail URL.
	#[serde(default)]
	pub thumbnail: Option<String>,
	/// Asset name.
	#[serde(default)]
	pub name: Option<String>,
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::model::decode;

	#[test]
	fn query_pairs_skip_unset_fields() {
		let request = SearchRequest::default().with_search_term("logo").with_page(2, 25);

		assert_eq!(
			request.query_pairs(),
			vec![
				("keywords", "logo".to_owned()),
				("ccm_paging_p", "2".to_owned()),
				("ipp", "25".to_owned()),
			],
		);
		assert!(SearchRequest::default().query_pairs().is_empty());
	}

	#[test]
	fn payload_maps_into_list() {
		let payload: SearchPayload = decode(json!({
			"assets": [{ "id": 1, "thumbnail": "t", "name": "n" }],
			"total": 5,
		}))
		.expect("Search payload should decode.");
		let list = ExternalFileList::from(payload);

		assert_eq!(list.total_files, 5);
		assert_eq!(
			list.files,
			vec![ExternalFileEntry {
				id: RemoteId::from(1),
				thumbnail_url: Some("t".into()),
				title: Some("n".into()),
			}],
		);
	}

	#[test]
	fn missing_fields_yield_an_empty_page() {
		let payload: SearchPayload = decode(json!({})).expect("Empty object should decode.");

		assert_eq!(ExternalFileList::from(payload), ExternalFileList::default());
	}

	#[test]
	fn non_array_assets_are_malformed() {
		let err = decode::<SearchPayload>(json!({ "assets": "not-an-array" }))
			.expect_err("String assets should be rejected.");

		assert!(matches!(err, Error::MalformedResponse { ref path, .. } if path == "assets"));
	}
}
