use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{AddItemRequest, CheckoutRequest, UpdateQuantityRequest},
    model::{CartSummary, Order},
};
use crate::{auth::extractors::AuthUser, error::AppResult, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cart", get(get_cart).delete(clear_cart))
        .route("/cart/items", post(add_item))
        .route("/cart/items/:id", put(update_item).delete(remove_item))
        .route("/cart/checkout", post(checkout))
        .route("/orders", get(list_orders))
}

#[instrument(skip(state))]
pub async fn get_cart(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<CartSummary>> {
    Ok(Json(state.carts.summary(user_id).await?))
}

#[instrument(skip(state))]
pub async fn add_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddItemRequest>,
) -> AppResult<Json<CartSummary>> {
    // fresh read so a just-approved student can buy right away
    let user = state.users.get(user_id).await?;
    let summary = state
        .carts
        .add_item(&user, &payload.id, payload.quantity)
        .await?;
    Ok(Json(summary))
}

#[instrument(skip(state))]
pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(item_id): Path<String>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> AppResult<Json<CartSummary>> {
    let summary = state
        .carts
        .update_quantity(user_id, &item_id, payload.quantity)
        .await?;
    Ok(Json(summary))
}

#[instrument(skip(state))]
pub async fn remove_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(item_id): Path<String>,
) -> AppResult<Json<CartSummary>> {
    Ok(Json(state.carts.remove_item(user_id, &item_id).await?))
}

#[instrument(skip(state))]
pub async fn clear_cart(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<StatusCode> {
    state.carts.clear(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn checkout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state
        .carts
        .checkout(user_id, payload.payment_method)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[instrument(skip(state))]
pub async fn list_orders(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.carts.list_orders(user_id).await?))
}
