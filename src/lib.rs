//! Brand Central connector—search, browse, and import assets from a remote digital-asset-management
//! service into a host file store, authenticated with OAuth 2.0 client credentials.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod connector;
pub mod error;
pub mod gateway;
pub mod host;
pub mod http;
pub mod import;
pub mod model;
pub mod oauth;
pub mod obs;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and settings fixtures for tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::config::{ConnectorConfig, FormFields};

	/// Client identifier used by test fixtures.
	pub const TEST_CLIENT_ID: &str = "brand-central-client";
	/// Client secret used by test fixtures.
	pub const TEST_CLIENT_SECRET: &str = "brand-central-secret";

	/// Builds the three form fields the host posts when saving provider settings.
	pub fn test_form(endpoint: &str) -> FormFields {
		let mut form = FormFields::new();

		form.insert("endpoint".into(), endpoint.into());
		form.insert("clientId".into(), TEST_CLIENT_ID.into());
		form.insert("clientSecret".into(), TEST_CLIENT_SECRET.into());

		form
	}

	/// Builds a configuration pointing at `endpoint` with the fixture credentials.
	pub fn test_config(endpoint: &str) -> ConnectorConfig {
		ConnectorConfig::new(endpoint, TEST_CLIENT_ID, TEST_CLIENT_SECRET)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		hash::Hash,
		path::{Path, PathBuf},
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError, StatusCode};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
