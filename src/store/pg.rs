use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use super::BlobStore;

/// Blobs kept in the `kv_blobs` table as `jsonb`.
#[derive(Clone)]
pub struct PgBlobStore {
    db: PgPool,
}

impl PgBlobStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BlobStore for PgBlobStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>> {
        let value = sqlx::query_scalar::<_, Value>(
            r#"
            SELECT value
              FROM kv_blobs
             WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.db)
        .await
        .with_context(|| format!("get blob {key}"))?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: Value) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_blobs (key, value, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (key) DO UPDATE
               SET value = EXCLUDED.value,
                   updated_at = now()
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.db)
        .await
        .with_context(|| format!("put blob {key}"))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM kv_blobs WHERE key = $1"#)
            .bind(key)
            .execute(&self.db)
            .await
            .with_context(|| format!("delete blob {key}"))?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_prefix(&self, prefix: &str) -> anyhow::Result<u64> {
        let res = sqlx::query(r#"DELETE FROM kv_blobs WHERE starts_with(key, $1)"#)
            .bind(prefix)
            .execute(&self.db)
            .await
            .with_context(|| format!("delete blobs with prefix {prefix}"))?;
        Ok(res.rows_affected())
    }
}
