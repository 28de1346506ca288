//! HTTP plumbing shared by the token provider, the API gateway, and asset downloads.
//!
//! API calls and downloads go through [`ReqwestHttpClient::send_get`], which buffers the body
//! and leaves status interpretation to the caller. Token exchanges run through
//! [`InstrumentedHandle`], an [`AsyncHttpClient`] adapter that remembers the status of the
//! token endpoint's answer in a [`ResponseMetadataSlot`] for error classification.

// std
use std::ops::Deref;
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
// self
use crate::{_prelude::*, auth::Secret, error::TransportError};

/// Status observed on the most recent token endpoint response.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadata {
	/// HTTP status code, when the endpoint answered at all.
	pub status: Option<u16>,
}

/// Shared cell the token transport writes [`ResponseMetadata`] into.
///
/// One slot is created per token exchange.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Replaces the stored metadata.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Moves the stored metadata out, leaving the slot empty.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// Buffered response of a GET issued through [`ReqwestHttpClient::send_get`].
#[derive(Clone, Debug)]
pub struct BufferedResponse {
	/// Response status.
	pub status: StatusCode,
	/// Full response body.
	pub body: Vec<u8>,
}

/// The connector's reqwest client.
///
/// The same client serves token exchanges, authenticated API calls, and plain downloads. A
/// custom [`ReqwestClient`] passed to [`ReqwestHttpClient::with_client`] should not follow
/// redirects on the token endpoint.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that identifies itself with `user_agent`.
	pub fn with_user_agent(user_agent: &str) -> Result<Self> {
		let client = ReqwestClient::builder()
			.user_agent(user_agent)
			.build()
			.map_err(crate::error::ConfigError::from)?;

		Ok(Self(client))
	}

	/// GETs `url`, optionally with a bearer token, and buffers the body whatever the status.
	///
	/// `target` labels transport failures.
	pub async fn send_get(
		&self,
		url: impl reqwest::IntoUrl,
		bearer: Option<&Secret>,
		target: &'static str,
	) -> Result<BufferedResponse> {
		let mut request = self.0.get(url);

		if let Some(token) = bearer {
			request = request.bearer_auth(token.expose());
		}

		let response = request.send().await.map_err(|e| TransportError::network(target, e))?;
		let status = response.status();
		let body = response.bytes().await.map_err(|e| TransportError::network(target, e))?;

		Ok(BufferedResponse { status, body: body.to_vec() })
	}

	/// Returns an [`AsyncHttpClient`] handle for `oauth2` that reports into `slot`.
	pub fn instrumented(&self, slot: ResponseMetadataSlot) -> InstrumentedHandle {
		InstrumentedHandle(Arc::new(TokenTransport { client: self.0.clone(), slot }))
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

struct TokenTransport {
	client: ReqwestClient,
	slot: ResponseMetadataSlot,
}
impl TokenTransport {
	async fn execute(
		&self,
		request: HttpRequest,
	) -> Result<HttpResponse, HttpClientError<ReqwestError>> {
		self.slot.take();

		let request = reqwest::Request::try_from(request).map_err(Box::new)?;
		let response = self.client.execute(request).await.map_err(Box::new)?;
		let status = response.status();

		self.slot.store(ResponseMetadata { status: Some(status.as_u16()) });

		let headers = response.headers().clone();
		let body = response.bytes().await.map_err(Box::new)?;
		let mut converted = HttpResponse::new(body.to_vec());

		*converted.status_mut() = status;
		*converted.headers_mut() = headers;

		Ok(converted)
	}
}

/// Handle returned by [`ReqwestHttpClient::instrumented`].
#[derive(Clone)]
pub struct InstrumentedHandle(Arc<TokenTransport>);
impl<'c> AsyncHttpClient<'c> for InstrumentedHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let transport = Arc::clone(&self.0);

		Box::pin(async move { transport.execute(request).await })
	}
}
impl Debug for InstrumentedHandle {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("InstrumentedHandle(..)")
	}
}
