//! Token cache contract and the in-memory implementation used by default.

// self
use crate::{_prelude::*, auth::AccessToken, config::ConnectorConfig};

/// Boxed future returned by [`TokenCache`] methods.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CacheError>> + 'a + Send>>;

/// Storage backend for access tokens issued to one or more connector configurations.
pub trait TokenCache
where
	Self: Send + Sync,
{
	/// Persists or replaces the token for `key`.
	fn save<'a>(&'a self, key: &'a CacheKey, token: AccessToken) -> CacheFuture<'a, ()>;

	/// Fetches the token stored for `key`, if present.
	fn fetch<'a>(&'a self, key: &'a CacheKey) -> CacheFuture<'a, Option<AccessToken>>;

	/// Drops the token stored for `key`, returning it when one existed.
	fn remove<'a>(&'a self, key: &'a CacheKey) -> CacheFuture<'a, Option<AccessToken>>;
}

/// Error type produced by [`TokenCache`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CacheError {
	/// Backend-level failure for the cache engine.
	#[error("Token cache failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Identifies the credentials a cached token was issued for.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
	/// Token endpoint the token came from.
	pub token_url: String,
	/// Client identifier the token was issued to.
	pub client_id: String,
}
impl CacheKey {
	/// Builds the key for `config`, normalizing the token endpoint.
	pub fn new(config: &ConnectorConfig) -> Result<Self> {
		Ok(Self { token_url: config.token_url()?.to_string(), client_id: config.client_id.clone() })
	}
}

type CacheMap = Arc<RwLock<HashMap<CacheKey, AccessToken>>>;

/// Thread-safe in-process token cache.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenCache(CacheMap);
impl MemoryTokenCache {
	/// Number of cached tokens.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl TokenCache for MemoryTokenCache {
	fn save<'a>(&'a self, key: &'a CacheKey, token: AccessToken) -> CacheFuture<'a, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().insert(key.clone(), token);

			Ok(())
		})
	}

	fn fetch<'a>(&'a self, key: &'a CacheKey) -> CacheFuture<'a, Option<AccessToken>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(key).cloned()) })
	}

	fn remove<'a>(&'a self, key: &'a CacheKey) -> CacheFuture<'a, Option<AccessToken>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.write().remove(key)) })
	}
}
