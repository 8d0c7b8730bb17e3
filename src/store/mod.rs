//! JSON blob persistence.
//!
//! Every record set lives as one JSON document under a string key, the same
//! shape the storefront always used. `Collection` gives a typed view over a
//! key and serializes writers per key.

mod collection;
#[cfg(test)]
mod memory;
mod pg;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::OwnedMutexGuard;

pub use collection::Collection;
#[cfg(test)]
pub use memory::MemoryBlobStore;
pub use pg::PgBlobStore;

pub mod keys {
    use uuid::Uuid;

    pub const USERS: &str = "users";
    pub const REVIEWS: &str = "reviews";
    pub const RECOVERY_CODES: &str = "recovery_codes";
    pub const CART_PREFIX: &str = "cart:";
    pub const ORDERS_PREFIX: &str = "orders:";

    pub fn cart(user_id: Uuid) -> String {
        format!("{CART_PREFIX}{user_id}")
    }

    pub fn orders(user_id: Uuid) -> String {
        format!("{ORDERS_PREFIX}{user_id}")
    }
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>>;
    async fn put(&self, key: &str, value: Value) -> anyhow::Result<()>;
    /// Returns whether the key existed.
    async fn delete(&self, key: &str) -> anyhow::Result<bool>;
    /// Returns the number of deleted keys.
    async fn delete_prefix(&self, prefix: &str) -> anyhow::Result<u64>;
}

/// One async mutex per key, created on first use and dropped once nobody
/// holds or waits on it.
#[derive(Default)]
pub struct KeyLocks {
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl KeyLocks {
    pub async fn lock(&self, key: &str) -> KeyGuard<'_> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(key.to_string()).or_default().clone()
        };
        KeyGuard {
            locks: self,
            key: key.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

pub struct KeyGuard<'a> {
    locks: &'a KeyLocks,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        // release first so our own reference is gone from the count
        drop(self.guard.take());
        let mut map = self.locks.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(lock) = map.get(&self.key) {
            if Arc::strong_count(lock) == 1 {
                map.remove(&self.key);
            }
        }
    }
}

/// Shared handle used to open typed collections.
#[derive(Clone)]
pub struct Blobs {
    store: Arc<dyn BlobStore>,
    locks: Arc<KeyLocks>,
}

impl Blobs {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            locks: Arc::new(KeyLocks::default()),
        }
    }

    #[cfg(test)]
    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryBlobStore::default()))
    }

    pub fn collection<T>(&self, key: impl Into<String>) -> Collection<T>
    where
        T: Serialize + DeserializeOwned,
    {
        Collection::new(self.store.clone(), self.locks.clone(), key.into())
    }

    pub fn raw(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }
}
