//! Connector-level error types shared across the gateway, token provider, and import pipeline.

// self
use crate::{_prelude::*, auth::CacheError, host::HostError};

/// Connector-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical connector error exposed by public APIs.
///
/// Outcomes that are not failures (an unconfigured endpoint, a 4xx without an error envelope)
/// are reported through [`Fetched`](crate::gateway::Fetched) instead.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Host-side import, lookup, or move failure.
	#[error("{0}")]
	Host(
		#[from]
		#[source]
		HostError,
	),
	/// Token cache failure.
	#[error("{0}")]
	Cache(
		#[from]
		#[source]
		CacheError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Remote service answered with an `{error, errors}` envelope; carries the first message.
	#[error("{message}")]
	Remote {
		/// First entry of the remote `errors` array.
		message: String,
	},
	/// Remote service answered with a status the connector does not handle.
	#[error("Invalid status code: {status}.")]
	UnexpectedStatus {
		/// HTTP status code returned by the remote service.
		status: u16,
	},
	/// Response body did not match the expected schema.
	#[error("Remote service returned a malformed response at `{path}`.")]
	MalformedResponse {
		/// JSON path where decoding failed.
		path: String,
		/// Structured decoding failure.
		#[source]
		source: serde_json::Error,
	},
	/// Asset download returned a non-200 status.
	#[error("There was an error downloading \"{url}\": {reason} ({status})")]
	Download {
		/// Download URL supplied by the remote service.
		url: String,
		/// HTTP status code returned by the download host.
		status: u16,
		/// Canonical reason phrase for the status.
		reason: String,
	},
	/// Remote filename has no usable final path component.
	#[error("Remote file name `{name}` cannot be stored locally.")]
	InvalidFileName {
		/// Filename as sent by the remote service.
		name: String,
	},
	/// Client authentication failed or credentials are malformed.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Token endpoint returned an error or an unusable response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Provider- or connector-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}
impl Error {
	pub(crate) fn malformed(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
		let path = err.path().to_string();

		Self::MalformedResponse { path, source: err.into_inner() }
	}
}

/// Configuration failures raised while loading settings or building requests.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A required form field was absent.
	#[error("Form field `{field}` is missing.")]
	MissingField {
		/// Name of the missing form field.
		field: &'static str,
	},
	/// Form fields failed validation.
	#[error("Provider settings are invalid: {}.", join_validation(.errors))]
	Invalid {
		/// Every validation failure, in field order.
		errors: Vec<crate::config::ValidationError>,
	},
	/// Derived URL (token endpoint or API path) could not be parsed.
	#[error("URL `{url}` is invalid.")]
	InvalidUrl {
		/// Offending URL string.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {target}.")]
	Network {
		/// Human-readable label of the remote target.
		target: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport or scratch writes.
	#[error("I/O error occurred while handling a remote payload.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(target: &'static str, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { target, source: Box::new(src) }
	}
}

fn join_validation(errors: &[crate::config::ValidationError]) -> String {
	errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::config::ValidationError;

	#[test]
	fn download_error_names_url_and_status() {
		let err = Error::Download {
			url: "https://cdn.example.com/a.png".into(),
			status: 404,
			reason: "Not Found".into(),
		};
		let message = err.to_string();

		assert!(message.contains("https://cdn.example.com/a.png"));
		assert!(message.contains("404"));
		assert!(message.contains("Not Found"));
	}

	#[test]
	fn remote_error_displays_message_verbatim() {
		let err = Error::Remote { message: "bad token".into() };

		assert_eq!(err.to_string(), "bad token");
	}

	#[test]
	fn host_error_converts_with_source() {
		let host = HostError::new("folder 7 not found");
		let err: Error = host.clone().into();

		assert!(matches!(err, Error::Host(_)));

		let source = StdError::source(&err).expect("Host errors should expose their source.");

		assert_eq!(source.to_string(), host.to_string());
	}

	#[test]
	fn invalid_config_lists_every_field() {
		let err = ConfigError::Invalid {
			errors: vec![
				ValidationError::required("endpoint"),
				ValidationError::required("clientSecret"),
			],
		};
		let message = err.to_string();

		assert!(message.contains("endpoint"));
		assert!(message.contains("clientSecret"));
	}
}
