use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// S3-compatible bucket holding student verification documents.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentsConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

/// Checkout pricing rules, amounts in COP.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopConfig {
    pub shipping_fee: i64,
    pub free_shipping_threshold: i64,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            shipping_fee: 15_000,
            free_shipping_threshold: 200_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub admin_token: String,
    pub documents: DocumentsConfig,
    pub shop: ShopConfig,
    pub recovery_code_ttl_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "imperius".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "imperius-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_or("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        let documents = DocumentsConfig {
            endpoint: std::env::var("MINIO_ENDPOINT").context("MINIO_ENDPOINT")?,
            bucket: std::env::var("MINIO_BUCKET").context("MINIO_BUCKET")?,
            access_key: std::env::var("MINIO_ACCESS_KEY").context("MINIO_ACCESS_KEY")?,
            secret_key: std::env::var("MINIO_SECRET_KEY").context("MINIO_SECRET_KEY")?,
            region: std::env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".into()),
        };
        let defaults = ShopConfig::default();
        let shop = ShopConfig {
            shipping_fee: env_or("SHIPPING_FEE", defaults.shipping_fee),
            free_shipping_threshold: env_or(
                "FREE_SHIPPING_THRESHOLD",
                defaults.free_shipping_threshold,
            ),
        };
        Ok(Self {
            database_url,
            jwt,
            admin_token: std::env::var("ADMIN_TOKEN").context("ADMIN_TOKEN")?,
            documents,
            shop,
            recovery_code_ttl_minutes: env_or("RECOVERY_CODE_TTL_MINUTES", 15),
        })
    }
}

fn env_or(name: &str, default: i64) -> i64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default)
}
