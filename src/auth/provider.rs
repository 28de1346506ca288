//! Token acquisition contract and the client-credentials implementation.
//!
//! [`ClientCredentialsTokenProvider`] reuses cached tokens until they fall inside the
//! preemptive window, then calls `{endpoint}/oauth/2.0/token`. A per-[`CacheKey`]
//! singleflight guard makes concurrent callers share one in-flight exchange.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, CacheKey, MemoryTokenCache, TokenCache},
	config::{ConnectorConfig, ConnectorOptions},
	http::ReqwestHttpClient,
	oauth::ClientCredentialsExchange,
	obs::{self, Operation},
};

/// Boxed future returned by [`TokenProvider`] methods.
pub type TokenFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Supplies bearer tokens for a configuration.
pub trait TokenProvider
where
	Self: Send + Sync,
{
	/// Returns a token usable for the next API call.
	fn acquire_token<'a>(&'a self, config: &'a ConnectorConfig) -> TokenFuture<'a, AccessToken>;

	/// Forgets any cached token so the next acquisition re-authenticates.
	fn invalidate<'a>(&'a self, config: &'a ConnectorConfig) -> TokenFuture<'a, ()>;
}

/// Client-credentials token provider with caching and singleflight guards.
#[derive(Clone)]
pub struct ClientCredentialsTokenProvider {
	http_client: ReqwestHttpClient,
	cache: Arc<dyn TokenCache>,
	options: ConnectorOptions,
	guards: Arc<Mutex<HashMap<CacheKey, Arc<AsyncMutex<()>>>>>,
}
impl ClientCredentialsTokenProvider {
	/// Creates a provider that stores tokens in `cache`.
	pub fn new(
		http_client: ReqwestHttpClient,
		cache: Arc<dyn TokenCache>,
		options: ConnectorOptions,
	) -> Self {
		Self { http_client, cache, options, guards: Default::default() }
	}

	/// Creates a provider backed by a private [`MemoryTokenCache`].
	pub fn in_memory(http_client: ReqwestHttpClient, options: ConnectorOptions) -> Self {
		Self::new(http_client, Arc::new(MemoryTokenCache::default()), options)
	}

	fn guard(&self, key: &CacheKey) -> Arc<AsyncMutex<()>> {
		let mut guards = self.guards.lock();

		guards.entry(key.clone()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
	}

	/// Drops the guard for `key` unless another caller still holds or awaits it.
	fn release(&self, key: &CacheKey, guard: Arc<AsyncMutex<()>>) {
		let mut guards = self.guards.lock();

		// One reference lives in the map, one is `guard`.
		if Arc::strong_count(&guard) <= 2 {
			guards.remove(key);
		}
	}

	async fn acquire(&self, config: &ConnectorConfig) -> Result<AccessToken> {
		let key = CacheKey::new(config)?;
		let guard = self.guard(&key);
		let result = {
			let _singleflight = guard.lock().await;

			self.cached_or_exchange(config, &key).await
		};

		self.release(&key, guard);

		result
	}

	async fn cached_or_exchange(
		&self,
		config: &ConnectorConfig,
		key: &CacheKey,
	) -> Result<AccessToken> {
		let now = OffsetDateTime::now_utc();

		if let Some(current) = self
			.cache
			.fetch(key)
			.await?
			.filter(|token| !token.needs_refresh(now, self.options.preemptive_window))
		{
			return Ok(current);
		}

		let exchange = ClientCredentialsExchange::new(
			config,
			self.options.client_auth,
			self.http_client.clone(),
		)?;
		let token = exchange.exchange().await?;

		self.cache.save(key, token.clone()).await?;

		Ok(token)
	}
}
impl TokenProvider for ClientCredentialsTokenProvider {
	fn acquire_token<'a>(&'a self, config: &'a ConnectorConfig) -> TokenFuture<'a, AccessToken> {
		Box::pin(obs::observe(Operation::Token, "acquire_token", self.acquire(config)))
	}

	fn invalidate<'a>(&'a self, config: &'a ConnectorConfig) -> TokenFuture<'a, ()> {
		Box::pin(async move {
			let key = CacheKey::new(config)?;

			self.cache.remove(&key).await?;

			#[cfg(feature = "tracing")]
			tracing::debug!(client_id = %key.client_id, "dropped cached token");

			Ok(())
		})
	}
}
impl Debug for ClientCredentialsTokenProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientCredentialsTokenProvider")
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}
