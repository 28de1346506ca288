//! Provider settings: form loading, validation, and connector options.
//!
//! The host posts three plain-text fields (`endpoint`, `clientId`, `clientSecret`) when an
//! administrator saves the provider. [`validate_request`] and [`ConnectorConfig::from_form`]
//! are deliberately independent; [`ConnectorConfig::validated`] runs both in the right order.

// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Untyped key/value form fields as submitted by the host.
pub type FormFields = BTreeMap<String, String>;

/// Form key carrying the remote base URL.
pub const FIELD_ENDPOINT: &str = "endpoint";
/// Form key carrying the OAuth client identifier.
pub const FIELD_CLIENT_ID: &str = "clientId";
/// Form key carrying the OAuth client secret.
pub const FIELD_CLIENT_SECRET: &str = "clientSecret";

const REQUIRED_FIELDS: [&str; 3] = [FIELD_ENDPOINT, FIELD_CLIENT_ID, FIELD_CLIENT_SECRET];
const TOKEN_PATH: &str = "oauth/2.0/token";

/// Single form validation failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
	/// Form key that failed validation.
	pub field: String,
	/// Human-readable message.
	pub message: String,
}
impl ValidationError {
	/// Builds the "field is required" failure for `field`.
	pub fn required(field: &str) -> Self {
		Self { field: field.to_owned(), message: format!("Field \"{field}\" is required.") }
	}
}
impl Display for ValidationError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.message)
	}
}

/// Checks that every required field is present and non-blank.
///
/// Returns one [`ValidationError`] per failing field; an empty list means the form is valid.
pub fn validate_request(form: &FormFields) -> Vec<ValidationError> {
	REQUIRED_FIELDS
		.iter()
		.filter(|field| form.get(**field).is_none_or(|value| value.trim().is_empty()))
		.map(|field| ValidationError::required(field))
		.collect()
}

/// Immutable provider settings.
///
/// The endpoint is kept verbatim; whether it is usable is decided at request time by
/// [`ConnectorConfig::endpoint_url`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorConfig {
	/// Remote base URL as entered by the administrator.
	pub endpoint: String,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: Secret,
}
impl ConnectorConfig {
	/// Creates a configuration from raw values.
	pub fn new(
		endpoint: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Self {
		Self {
			endpoint: endpoint.into(),
			client_id: client_id.into(),
			client_secret: Secret::new(client_secret),
		}
	}

	/// Copies the three fields verbatim without validating their contents.
	pub fn from_form(form: &FormFields) -> Result<Self> {
		let field = |name: &'static str| {
			form.get(name).cloned().ok_or(ConfigError::MissingField { field: name })
		};

		Ok(Self::new(field(FIELD_ENDPOINT)?, field(FIELD_CLIENT_ID)?, field(FIELD_CLIENT_SECRET)?))
	}

	/// Validates the form and loads it when every field passes.
	pub fn validated(form: &FormFields) -> Result<Self> {
		let errors = validate_request(form);

		if !errors.is_empty() {
			return Err(ConfigError::Invalid { errors }.into());
		}

		Self::from_form(form)
	}

	/// Returns the endpoint as an absolute URL with a host, or `None` when misconfigured.
	pub fn endpoint_url(&self) -> Option<Url> {
		Url::parse(self.endpoint.trim()).ok().filter(Url::has_host)
	}

	/// Token endpoint derived from the configured base URL.
	pub fn token_url(&self) -> Result<Url> {
		self.join(TOKEN_PATH)
	}

	/// Joins `path` onto the endpoint, trimming slashes on both sides of the seam.
	pub fn join(&self, path: &str) -> Result<Url> {
		let raw = format!(
			"{}/{}",
			self.endpoint.trim().trim_end_matches('/'),
			path.trim_start_matches('/')
		);

		Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { url: raw, source }.into())
	}
}

/// How client credentials are presented to the token endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	#[default]
	/// HTTP Basic with `client_id`/`client_secret`.
	ClientSecretBasic,
	/// Form POST body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
}

/// Tunables shared by the token provider and the import pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectorOptions {
	/// Client authentication mode for the token endpoint.
	pub client_auth: ClientAuthMethod,
	/// Cached tokens are refreshed once they are this close to expiry.
	pub preemptive_window: Duration,
	/// Directory under which per-import scratch directories are created.
	pub scratch_root: Option<PathBuf>,
}
impl ConnectorOptions {
	const DEFAULT_PREEMPTIVE_WINDOW: Duration = Duration::seconds(60);

	/// Overrides the client authentication mode.
	pub fn with_client_auth(mut self, method: ClientAuthMethod) -> Self {
		self.client_auth = method;

		self
	}

	/// Overrides the preemptive refresh window (defaults to 60 seconds).
	pub fn with_preemptive_window(mut self, window: Duration) -> Self {
		self.preemptive_window = if window.is_negative() { Duration::ZERO } else { window };

		self
	}

	/// Places scratch directories under `root` instead of the system temp dir.
	pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
		self.scratch_root = Some(root.into());

		self
	}
}
impl Default for ConnectorOptions {
	fn default() -> Self {
		Self {
			client_auth: ClientAuthMethod::default(),
			preemptive_window: Self::DEFAULT_PREEMPTIVE_WINDOW,
			scratch_root: None,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn form(endpoint: &str, client_id: &str, secret: &str) -> FormFields {
		[(FIELD_ENDPOINT, endpoint), (FIELD_CLIENT_ID, client_id), (FIELD_CLIENT_SECRET, secret)]
			.into_iter()
			.map(|(k, v)| (k.to_owned(), v.to_owned()))
			.collect()
	}

	#[test]
	fn complete_form_has_no_validation_errors() {
		let form = form("https://dam.example.com", "id", "secret");

		assert!(validate_request(&form).is_empty());
	}

	#[test]
	fn each_missing_field_is_named() {
		for field in REQUIRED_FIELDS {
			let mut missing = form("https://dam.example.com", "id", "secret");

			missing.remove(field);

			let errors = validate_request(&missing);

			assert_eq!(errors.len(), 1);
			assert_eq!(errors[0].field, field);
			assert!(errors[0].message.contains(field));

			let mut blank = form("https://dam.example.com", "id", "secret");

			blank.insert(field.to_owned(), "  ".into());

			assert_eq!(validate_request(&blank)[0].field, field);
		}
	}

	#[test]
	fn from_form_copies_verbatim_and_reports_missing_keys() {
		let config = ConnectorConfig::from_form(&form(" not a url ", "", "s"))
			.expect("Loading should not validate contents.");

		assert_eq!(config.endpoint, " not a url ");
		assert_eq!(config.client_id, "");
		assert_eq!(config.client_secret.expose(), "s");

		let mut partial = form("https://dam.example.com", "id", "secret");

		partial.remove(FIELD_CLIENT_ID);

		let err = ConnectorConfig::from_form(&partial).expect_err("Missing keys should fail.");

		assert!(matches!(err, Error::Config(ConfigError::MissingField { field: "clientId" })));
	}

	#[test]
	fn validated_rejects_blank_fields() {
		let err = ConnectorConfig::validated(&form("https://dam.example.com", "", "secret"))
			.expect_err("Blank client id should be rejected.");

		match err {
			Error::Config(ConfigError::Invalid { errors }) => {
				assert_eq!(errors, vec![ValidationError::required(FIELD_CLIENT_ID)]);
			},
			other => panic!("Unexpected error: {other:?}."),
		}
	}

	#[test]
	fn endpoint_url_requires_host() {
		assert!(ConnectorConfig::new("https://dam.example.com/", "a", "b").endpoint_url().is_some());
		assert!(ConnectorConfig::new("not-a-url", "a", "b").endpoint_url().is_none());
		assert!(ConnectorConfig::new("mailto:ops@example.com", "a", "b").endpoint_url().is_none());
		assert!(ConnectorConfig::new("", "a", "b").endpoint_url().is_none());
	}

	#[test]
	fn join_trims_slashes_at_the_seam() {
		let config = ConnectorConfig::new("https://dam.example.com/base/", "a", "b");

		assert_eq!(
			config.join("/public_api/v1/file_types").expect("Join should succeed.").as_str(),
			"https://dam.example.com/base/public_api/v1/file_types",
		);
		assert_eq!(
			config.token_url().expect("Token URL should parse.").as_str(),
			"https://dam.example.com/base/oauth/2.0/token",
		);
	}

	#[test]
	fn config_serializes_with_camel_case_keys() {
		let config = ConnectorConfig::new("https://dam.example.com", "id", "secret");
		let value = serde_json::to_value(&config).expect("Config should serialize.");

		assert_eq!(value["clientId"], "id");
		assert_eq!(value["clientSecret"], "secret");
		assert!(!format!("{config:?}").contains("\"secret\""));
	}

	#[test]
	fn negative_preemptive_window_clamps_to_zero() {
		let options = ConnectorOptions::default().with_preemptive_window(Duration::seconds(-5));

		assert_eq!(options.preemptive_window, Duration::ZERO);
	}
}
