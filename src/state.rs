use std::sync::Arc;

use crate::{
    auth::{jwt::JwtKeys, recovery::RecoveryCodes},
    cart::CartStore,
    config::AppConfig,
    notify::{LogNotifier, Notifier},
    reviews::ReviewStore,
    storage::{DocumentStorage, S3DocumentStorage},
    store::{Blobs, PgBlobStore},
    users::UserStore,
    verification::VerificationEvents,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub blobs: Blobs,
    pub users: UserStore,
    pub reviews: ReviewStore,
    pub carts: CartStore,
    pub recovery: RecoveryCodes,
    pub documents: Arc<dyn DocumentStorage>,
    pub notifier: Arc<dyn Notifier>,
    pub verification_events: VerificationEvents,
}

impl AppState {
    /// Connects to Postgres and MinIO and returns the state plus the pool
    /// so the caller can run migrations.
    pub async fn init() -> anyhow::Result<(Self, sqlx::PgPool)> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await?;

        let documents =
            Arc::new(S3DocumentStorage::new(&config.documents).await?) as Arc<dyn DocumentStorage>;

        let blobs = Blobs::new(Arc::new(PgBlobStore::new(db.clone())));
        let state = Self::from_parts(config, blobs, documents, Arc::new(LogNotifier));
        Ok((state, db))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        blobs: Blobs,
        documents: Arc<dyn DocumentStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            jwt: JwtKeys::from(&config.jwt),
            users: UserStore::new(blobs.clone()),
            reviews: ReviewStore::new(blobs.clone()),
            carts: CartStore::new(blobs.clone(), config.shop.clone()),
            recovery: RecoveryCodes::new(blobs.clone(), config.recovery_code_ttl_minutes),
            verification_events: VerificationEvents::default(),
            blobs,
            documents,
            notifier,
            config,
        }
    }
}


#[cfg(test)]
pub use fake::{Fakes, ADMIN_TOKEN};
