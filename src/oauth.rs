//! `oauth2` crate facade for the client-credentials exchange.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, HttpClientError,
	RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicErrorResponseType, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	config::{ClientAuthMethod, ConnectorConfig},
	error::{ConfigError, TransportError},
	http::{ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot},
};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

const TOKEN_TARGET: &str = "the token endpoint";

/// Client-credentials exchange bound to one configuration.
pub(crate) struct ClientCredentialsExchange {
	oauth_client: ConfiguredBasicClient,
	http_client: ReqwestHttpClient,
}
impl ClientCredentialsExchange {
	pub(crate) fn new(
		config: &ConnectorConfig,
		auth: ClientAuthMethod,
		http_client: ReqwestHttpClient,
	) -> Result<Self> {
		let token_url = config.token_url()?;
		let token_url = TokenUrl::from_url(token_url);
		let mut oauth_client = BasicClient::new(ClientId::new(config.client_id.clone()))
			.set_client_secret(ClientSecret::new(config.client_secret.expose().to_owned()))
			.set_token_uri(token_url);

		if matches!(auth, ClientAuthMethod::ClientSecretPost) {
			oauth_client = oauth_client.set_auth_type(AuthType::RequestBody);
		}

		Ok(Self { oauth_client, http_client })
	}

	/// Requests a fresh token; a response without `expires_in` yields a single-use token.
	pub(crate) async fn exchange(&self) -> Result<AccessToken> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.instrumented(meta.clone());
		let response = self
			.oauth_client
			.exchange_client_credentials()
			.request_async(&instrumented)
			.await
			.map_err(|err| map_request_error(meta.take(), err))?;
		let lifetime = match response.expires_in() {
			Some(expires_in) => Duration::seconds(
				i64::try_from(expires_in.as_secs()).map_err(|_| ConfigError::ExpiresInOutOfRange)?,
			),
			None => Duration::ZERO,
		};

		let token = AccessToken::try_new(
			response.access_token().secret().to_owned(),
			OffsetDateTime::now_utc(),
			lifetime,
		)
		.ok_or(ConfigError::ExpiresInOutOfRange)?;

		Ok(token)
	}
}

fn map_request_error(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<ReqwestError>>,
) -> Error {
	let status = meta.and_then(|value| value.status);

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(response, status),
		RequestTokenError::Request(error) => map_transport_error(error, status),
		RequestTokenError::Parse(error, _body) => Error::TokenEndpoint {
			message: format!("Token response could not be parsed at `{}`", error.path()),
			status,
		},
		RequestTokenError::Other(message) => Error::TokenEndpoint { message, status },
	}
}

fn map_server_response_error(response: BasicErrorResponse, status: Option<u16>) -> Error {
	let message = match response.error_description() {
		Some(description) => description.clone(),
		None => response.error().as_ref().to_owned(),
	};

	if matches!(response.error(), BasicErrorResponseType::InvalidClient) || status == Some(401) {
		return Error::InvalidClient { reason: message };
	}

	Error::TokenEndpoint { message, status }
}

fn map_transport_error(err: HttpClientError<ReqwestError>, status: Option<u16>) -> Error {
	match err {
		HttpClientError::Reqwest(inner) => {
			if inner.is_builder() {
				return ConfigError::from(*inner).into();
			}
			if inner.is_timeout() {
				return Error::TokenEndpoint {
					message: "Request timed out while calling the token endpoint".into(),
					status: status.or_else(|| inner.status().map(|code| code.as_u16())),
				};
			}

			TransportError::network(TOKEN_TARGET, *inner).into()
		},
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => Error::TokenEndpoint { message, status },
		_ => Error::TokenEndpoint { message: "HTTP client error".into(), status },
	}
}
