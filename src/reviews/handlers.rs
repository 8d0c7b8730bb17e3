use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{ReplyRequest, ReviewRequest},
    model::{RatingSummary, Reply, Review},
};
use crate::{
    auth::extractors::AuthUser,
    catalog,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products/:id/reviews", get(list_reviews).post(add_review))
        .route("/products/:id/rating", get(rating))
        .route("/reviews/:id", put(edit_review).delete(delete_review))
        .route("/reviews/:id/replies", post(add_reply))
}

fn ensure_item(id: &str) -> AppResult<()> {
    if catalog::exists(id) {
        Ok(())
    } else {
        Err(AppError::not_found(format!("Unknown catalog item '{id}'")))
    }
}

#[instrument(skip(state))]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<Vec<Review>>> {
    ensure_item(&product_id)?;
    Ok(Json(state.reviews.list_by_product(&product_id).await?))
}

#[instrument(skip(state))]
pub async fn rating(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<RatingSummary>> {
    ensure_item(&product_id)?;
    Ok(Json(state.reviews.rating_summary(&product_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn add_review(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(product_id): Path<String>,
    Json(payload): Json<ReviewRequest>,
) -> AppResult<(StatusCode, Json<Review>)> {
    ensure_item(&product_id)?;
    let author = state.users.get(user_id).await?;
    let review = state
        .reviews
        .add(&product_id, &author, payload.rating, &payload.comment)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

#[instrument(skip(state, payload))]
pub async fn edit_review(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(review_id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> AppResult<Json<Review>> {
    let review = state
        .reviews
        .edit(review_id, user_id, payload.rating, &payload.comment)
        .await?;
    Ok(Json(review))
}

#[instrument(skip(state))]
pub async fn delete_review(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(review_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.reviews.delete(review_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, payload))]
pub async fn add_reply(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(review_id): Path<Uuid>,
    Json(payload): Json<ReplyRequest>,
) -> AppResult<(StatusCode, Json<Reply>)> {
    let author = state.users.get(user_id).await?;
    let reply = state.reviews.reply(review_id, &author, &payload.comment).await?;
    Ok((StatusCode::CREATED, Json(reply)))
}
