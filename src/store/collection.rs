use std::{marker::PhantomData, sync::Arc};

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};

use super::{BlobStore, KeyLocks};
use crate::error::AppResult;

/// A JSON array of `T` stored under a single key.
pub struct Collection<T> {
    store: Arc<dyn BlobStore>,
    locks: Arc<KeyLocks>,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub(super) fn new(store: Arc<dyn BlobStore>, locks: Arc<KeyLocks>, key: String) -> Self {
        Self {
            store,
            locks,
            key,
            _marker: PhantomData,
        }
    }

    /// Missing key reads as an empty collection. A blob that does not decode
    /// is an error and is left untouched.
    pub async fn load(&self) -> anyhow::Result<Vec<T>> {
        match self.store.get(&self.key).await? {
            None => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value)
                .with_context(|| format!("decode blob {}", self.key)),
        }
    }

    async fn save(&self, items: &[T]) -> anyhow::Result<()> {
        let value = serde_json::to_value(items)
            .with_context(|| format!("encode blob {}", self.key))?;
        self.store.put(&self.key, value).await
    }

    /// Read-modify-write under the key's lock. Nothing is written when `f`
    /// returns an error.
    pub async fn modify<R, F>(&self, f: F) -> AppResult<R>
    where
        F: FnOnce(&mut Vec<T>) -> AppResult<R>,
    {
        self.modify_and(f, |_| {}).await
    }

    /// Like `modify`, then runs `committed` after the write while the key is
    /// still locked. Writers of the same key see their hooks run in commit
    /// order.
    pub async fn modify_and<R, F, C>(&self, f: F, committed: C) -> AppResult<R>
    where
        F: FnOnce(&mut Vec<T>) -> AppResult<R>,
        C: FnOnce(&R),
    {
        let _guard = self.locks.lock(&self.key).await;
        let mut items = self.load().await?;
        let out = f(&mut items)?;
        self.save(&items).await?;
        committed(&out);
        Ok(out)
    }

    pub async fn clear(&self) -> anyhow::Result<()> {
        let _guard = self.locks.lock(&self.key).await;
        self.store.delete(&self.key).await?;
        Ok(())
    }
}
