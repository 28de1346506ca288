//! Remote wire schemas and the host-facing shapes they adapt into.
//!
//! Each remote endpoint has an explicit schema struct; decoding fails with
//! [`Error::MalformedResponse`] on a shape mismatch. Fields the remote service may omit
//! default to empty values.

pub mod asset;
pub mod file_type;
pub mod id;
pub mod search;

pub use asset::*;
pub use file_type::*;
pub use id::*;
pub use search::*;

// self
use crate::_prelude::*;

/// Decodes a JSON value into `T`, reporting the failing path on mismatch.
pub fn decode<T>(value: serde_json::Value) -> Result<T>
where
	T: DeserializeOwned,
{
	serde_path_to_error::deserialize(value).map_err(Error::malformed)
}
