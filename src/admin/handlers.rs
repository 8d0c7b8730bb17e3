use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::AdminAuth,
    error::AppResult,
    state::AppState,
    store::keys,
    users::{model::UserStats, PublicUser},
    verification::services::{self, DocumentLink},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/stats", get(stats))
        .route("/admin/users", get(export_users))
        .route("/admin/verification/:id/approve", post(approve))
        .route("/admin/verification/:id/reject", post(reject))
        .route("/admin/verification/:id/documents", get(documents))
        .route("/admin/reset-verifications", post(reset_verifications))
        .route("/admin/clear", post(clear))
}

#[derive(Debug, Default, Deserialize)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub documents_removed: usize,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub carts_removed: u64,
    pub order_histories_removed: u64,
}

#[instrument(skip(state, _admin))]
pub async fn stats(State(state): State<AppState>, _admin: AdminAuth) -> AppResult<Json<UserStats>> {
    Ok(Json(state.users.stats().await?))
}

#[instrument(skip(state, _admin))]
pub async fn export_users(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> AppResult<Json<Vec<PublicUser>>> {
    Ok(Json(state.users.export().await?))
}

#[instrument(skip(state, _admin))]
pub async fn approve(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<PublicUser>> {
    Ok(Json(services::approve(&state, user_id).await?))
}

/// Body is optional: `{ "reason": "..." }`.
#[instrument(skip(state, _admin, payload))]
pub async fn reject(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(user_id): Path<Uuid>,
    payload: Option<Json<RejectRequest>>,
) -> AppResult<Json<PublicUser>> {
    let reason = payload.and_then(|Json(p)| p.reason);
    Ok(Json(services::reject(&state, user_id, reason).await?))
}

#[instrument(skip(state, _admin))]
pub async fn documents(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<DocumentLink>>> {
    Ok(Json(services::documents(&state, user_id).await?))
}

#[instrument(skip(state, _admin))]
pub async fn reset_verifications(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> AppResult<Json<ResetResponse>> {
    let documents_removed = services::reset_all(&state).await?;
    Ok(Json(ResetResponse { documents_removed }))
}

/// Wipes users (and their documents), reviews, recovery codes, carts and orders.
#[instrument(skip(state, _admin))]
pub async fn clear(State(state): State<AppState>, _admin: AdminAuth) -> AppResult<Json<ClearResponse>> {
    let store = state.blobs.raw();
    services::reset_all(&state).await?;
    state.users.clear().await?;
    state.reviews.clear().await?;
    state.recovery.clear().await?;
    let carts_removed = store.delete_prefix(keys::CART_PREFIX).await?;
    let order_histories_removed = store.delete_prefix(keys::ORDERS_PREFIX).await?;
    warn!(carts_removed, order_histories_removed, "all storefront data cleared");
    Ok(Json(ClearResponse {
        carts_removed,
        order_histories_removed,
    }))
}
