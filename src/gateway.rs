//! Authenticated GET gateway for the remote public API.
//!
//! [`ApiGateway::fetch`] is the only place that talks to `/public_api/v1/*`. It reports
//! non-failure outcomes through [`Fetched`] so callers can tell an unconfigured provider or
//! a rejected request apart from an empty result.

// self
use crate::{
	_prelude::*,
	auth::TokenProvider,
	config::ConnectorConfig,
	http::{BufferedResponse, ReqwestHttpClient},
	model,
};

const API_TARGET: &str = "the remote API";

/// Outcome of a gateway call that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fetched<T> {
	/// Decoded response data.
	Data(T),
	/// Remote service answered 200 with an empty or `null` body.
	Empty,
	/// Endpoint is not a usable URL; no request was sent.
	Unconfigured,
	/// Remote service answered 4xx without an error envelope.
	Rejected {
		/// HTTP status code of the rejection.
		status: u16,
	},
}
impl<T> Fetched<T> {
	/// Returns the data, if any.
	pub fn data(self) -> Option<T> {
		match self {
			Self::Data(data) => Some(data),
			_ => None,
		}
	}

	/// Returns `true` for [`Fetched::Data`].
	pub fn is_data(&self) -> bool {
		matches!(self, Self::Data(_))
	}

	/// Maps the data, keeping non-data outcomes as they are.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
		match self {
			Self::Data(data) => Fetched::Data(f(data)),
			Self::Empty => Fetched::Empty,
			Self::Unconfigured => Fetched::Unconfigured,
			Self::Rejected { status } => Fetched::Rejected { status },
		}
	}

	/// Returns the data, or `T::default()` for any non-data outcome.
	pub fn into_data_or_default(self) -> T
	where
		T: Default,
	{
		self.data().unwrap_or_default()
	}
}

/// Issues authenticated GET requests against one configuration.
#[derive(Clone)]
pub struct ApiGateway {
	config: Arc<ConnectorConfig>,
	http_client: ReqwestHttpClient,
	tokens: Arc<dyn TokenProvider>,
}
impl ApiGateway {
	/// Creates a gateway for `config`.
	pub fn new(
		config: Arc<ConnectorConfig>,
		http_client: ReqwestHttpClient,
		tokens: Arc<dyn TokenProvider>,
	) -> Self {
		Self { config, http_client, tokens }
	}

	/// Configuration this gateway sends requests for.
	pub fn config(&self) -> &ConnectorConfig {
		&self.config
	}

	/// GETs `path` with `query` and decodes the body into `T`.
	pub async fn fetch<T>(&self, path: &str, query: &[(&str, String)]) -> Result<Fetched<T>>
	where
		T: DeserializeOwned,
	{
		Ok(match self.fetch_json(path, query).await? {
			Fetched::Data(value) => Fetched::Data(model::decode(value)?),
			Fetched::Empty => Fetched::Empty,
			Fetched::Unconfigured => Fetched::Unconfigured,
			Fetched::Rejected { status } => Fetched::Rejected { status },
		})
	}

	/// GETs `path` with `query` and returns the raw JSON body.
	pub async fn fetch_json(
		&self,
		path: &str,
		query: &[(&str, String)],
	) -> Result<Fetched<serde_json::Value>> {
		if self.config.endpoint_url().is_none() {
			#[cfg(feature = "tracing")]
			tracing::debug!(path, "endpoint is not a usable URL; skipping request");

			return Ok(Fetched::Unconfigured);
		}

		let mut url = self.config.join(path)?;

		if !query.is_empty() {
			url.query_pairs_mut().extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
		}

		let token = self.tokens.acquire_token(&self.config).await?;
		let BufferedResponse { status, body } =
			self.http_client.send_get(url, Some(&token.secret), API_TARGET).await?;

		if status == StatusCode::UNAUTHORIZED {
			self.tokens.invalidate(&self.config).await?;
		}
		if status != StatusCode::OK && !status.is_client_error() {
			return Err(Error::UnexpectedStatus { status: status.as_u16() });
		}

		if status == StatusCode::OK {
			if body.iter().all(u8::is_ascii_whitespace) {
				return Ok(Fetched::Empty);
			}

			let value = serde_json::from_slice(&body).map_err(|source| {
				Error::MalformedResponse { path: String::from("."), source }
			})?;

			check_error_envelope(&value)?;

			if value.is_null() {
				return Ok(Fetched::Empty);
			}

			return Ok(Fetched::Data(value));
		}

		if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&body) {
			check_error_envelope(&value)?;
		}

		#[cfg(feature = "tracing")]
		tracing::debug!(path, status = status.as_u16(), "remote service rejected the request");

		Ok(Fetched::Rejected { status: status.as_u16() })
	}
}
impl Debug for ApiGateway {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiGateway").field("config", &self.config).finish_non_exhaustive()
	}
}

/// Surfaces the first message of an `{error, errors: [...]}` envelope.
///
/// Only the first entry is reported. An envelope with no string entries is not an error.
pub fn check_error_envelope(value: &serde_json::Value) -> Result<()> {
	let Some(object) = value.as_object() else {
		return Ok(());
	};

	if object.get("error").is_none_or(serde_json::Value::is_null) {
		return Ok(());
	}

	let first = object
		.get("errors")
		.and_then(serde_json::Value::as_array)
		.and_then(|errors| errors.first())
		.map(|error| match error.as_str() {
			Some(text) => text.to_owned(),
			None => error.to_string(),
		});

	match first {
		Some(message) => Err(Error::Remote { message }),
		None => Ok(()),
	}
}
