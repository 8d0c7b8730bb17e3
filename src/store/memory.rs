use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::BlobStore;

/// Process-local store backing the test suite.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Value>>,
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>> {
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> anyhow::Result<()> {
        self.blobs.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<bool> {
        Ok(self.blobs.write().await.remove(key).is_some())
    }

    async fn delete_prefix(&self, prefix: &str) -> anyhow::Result<u64> {
        let mut blobs = self.blobs.write().await;
        let before = blobs.len();
        blobs.retain(|k, _| !k.starts_with(prefix));
        Ok((before - blobs.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn put_get_delete() {
        let store = MemoryBlobStore::default();
        assert!(store.get("users").await.unwrap().is_none());

        store.put("users", json!([{"id": 1}])).await.unwrap();
        assert_eq!(store.get("users").await.unwrap(), Some(json!([{"id": 1}])));

        assert!(store.delete("users").await.unwrap());
        assert!(!store.delete("users").await.unwrap());
    }

    #[tokio::test]
    async fn delete_prefix_only_touches_matching_keys() {
        let store = MemoryBlobStore::default();
        store.put("cart:a", json!([])).await.unwrap();
        store.put("cart:b", json!([])).await.unwrap();
        store.put("reviews", json!([])).await.unwrap();

        assert_eq!(store.delete_prefix("cart:").await.unwrap(), 2);
        assert!(store.get("reviews").await.unwrap().is_some());
    }
}
