//! Remote identifiers.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

/// Identifier issued by the remote service.
///
/// The service emits ids as JSON numbers or strings; both decode to the same string form.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawRemoteId", into = "String")]
pub struct RemoteId(String);
impl RemoteId {
	/// Wraps an identifier string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}
}
impl Deref for RemoteId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for RemoteId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for RemoteId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<RemoteId> for String {
	fn from(value: RemoteId) -> Self {
		value.0
	}
}
impl From<&str> for RemoteId {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<u64> for RemoteId {
	fn from(value: u64) -> Self {
		Self(value.to_string())
	}
}
impl From<RawRemoteId> for RemoteId {
	fn from(raw: RawRemoteId) -> Self {
		match raw {
			RawRemoteId::Text(text) => Self(text),
			RawRemoteId::Number(number) => Self(number.to_string()),
		}
	}
}
impl Debug for RemoteId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "RemoteId({})", self.0)
	}
}
impl Display for RemoteId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRemoteId {
	Text(String),
	Number(serde_json::Number),
}
