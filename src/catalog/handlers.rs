use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{Membership, MembershipTier, Product};
use crate::{
    error::{AppError, AppResult},
    reviews::RatingSummary,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/catalog/products", get(list_products))
        .route("/catalog/products/:id", get(get_product))
        .route("/catalog/memberships", get(list_memberships))
        .route("/catalog/memberships/:id", get(get_membership))
}

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MembershipQuery {
    pub tier: Option<MembershipTier>,
}

#[derive(Debug, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: &'static Product,
    pub rating: RatingSummary,
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(q): Query<ProductQuery>,
) -> AppResult<Json<Vec<ProductView>>> {
    let mut summaries = state.reviews.rating_summaries().await?;
    let items = super::products_in(q.category.as_deref())
        .map(|product| ProductView {
            product,
            rating: summaries
                .remove(product.id)
                .unwrap_or_else(|| RatingSummary::from_ratings([])),
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductView>> {
    let product =
        super::find_product(&id).ok_or_else(|| AppError::not_found("Product not found"))?;
    let rating = state.reviews.rating_summary(product.id).await?;
    Ok(Json(ProductView { product, rating }))
}

pub async fn list_memberships(Query(q): Query<MembershipQuery>) -> Json<Vec<&'static Membership>> {
    Json(super::memberships_in(q.tier).collect())
}

pub async fn get_membership(Path(id): Path<String>) -> AppResult<Json<&'static Membership>> {
    super::find_membership(&id)
        .map(Json)
        .ok_or_else(|| AppError::not_found("Membership not found"))
}
