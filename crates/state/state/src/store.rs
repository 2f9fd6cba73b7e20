use std::time::Duration;

use async_trait::async_trait;

use crate::error::StateError;
use crate::key::StoreKey;

/// Trait for persisting pipeline records as JSON strings.
///
/// Implementations must be `Send + Sync` and safe for concurrent access.
/// Single-key put/get are atomic; no multi-key transactions are assumed.
/// Writes are last-writer-wins.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get the value for a key. Returns `None` if not found or expired.
    async fn get(&self, key: &StoreKey) -> Result<Option<String>, StateError>;

    /// Set a value with an optional TTL, overwriting any previous value.
    async fn put(&self, key: &StoreKey, value: &str, ttl: Option<Duration>) -> Result<(), StateError>;

    /// Delete a key. Returns `true` if the key existed.
    async fn delete(&self, key: &StoreKey) -> Result<bool, StateError>;
}

/// Extension helpers shared by all stores.
#[async_trait]
pub trait SessionStoreExt: SessionStore {
    /// Serialize `value` and store it under `key`.
    async fn put_json<T: serde::Serialize + Sync>(
        &self,
        key: &StoreKey,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<(), StateError> {
        let json = serde_json::to_string(value)
            .map_err(|e| StateError::Serialization(e.to_string()))?;
        self.put(key, &json, ttl).await
    }

    /// Fetch and deserialize the value under `key`, if any.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        key: &StoreKey,
    ) -> Result<Option<T>, StateError> {
        match self.get(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StateError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<S: SessionStore + ?Sized> SessionStoreExt for S {}
