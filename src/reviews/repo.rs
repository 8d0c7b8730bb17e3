use std::collections::HashMap;

use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::model::{RatingSummary, Reply, Review};
use crate::{
    error::{AppError, AppResult},
    store::{keys, Blobs, Collection},
    users::User,
};

const MAX_COMMENT_CHARS: usize = 2_000;

fn check_rating(rating: i64) -> AppResult<u8> {
    u8::try_from(rating)
        .ok()
        .filter(|r| (1..=5).contains(r))
        .ok_or_else(|| AppError::bad_request("Rating must be between 1 and 5"))
}

fn clean_comment(comment: &str) -> AppResult<String> {
    let comment = comment.trim();
    if comment.is_empty() {
        return Err(AppError::bad_request("Comment must not be empty"));
    }
    if comment.chars().count() > MAX_COMMENT_CHARS {
        return Err(AppError::bad_request(format!(
            "Comment must be at most {MAX_COMMENT_CHARS} characters"
        )));
    }
    Ok(comment.to_string())
}

/// Access to the `reviews` blob.
#[derive(Clone)]
pub struct ReviewStore {
    blobs: Blobs,
}

impl ReviewStore {
    pub fn new(blobs: Blobs) -> Self {
        Self { blobs }
    }

    fn reviews(&self) -> Collection<Review> {
        self.blobs.collection(keys::REVIEWS)
    }

    /// Newest first.
    pub async fn list_by_product(&self, product_id: &str) -> anyhow::Result<Vec<Review>> {
        let mut reviews: Vec<Review> = self
            .reviews()
            .load()
            .await?
            .into_iter()
            .filter(|r| r.product_id == product_id)
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    pub async fn add(
        &self,
        product_id: &str,
        author: &User,
        rating: i64,
        comment: &str,
    ) -> AppResult<Review> {
        let rating = check_rating(rating)?;
        let review = Review {
            id: Uuid::new_v4(),
            product_id: product_id.to_string(),
            author_id: author.id,
            author_email: author.email.clone(),
            author_name: author.display_name(),
            rating,
            comment: clean_comment(comment)?,
            created_at: OffsetDateTime::now_utc(),
            edited: false,
            replies: Vec::new(),
        };
        let stored = review.clone();
        self.reviews()
            .modify(move |reviews| {
                reviews.push(stored);
                Ok(())
            })
            .await?;
        info!(review_id = %review.id, product_id, user_id = %author.id, "review added");
        Ok(review)
    }

    /// Only the author may edit.
    pub async fn edit(
        &self,
        review_id: Uuid,
        author_id: Uuid,
        rating: i64,
        comment: &str,
    ) -> AppResult<Review> {
        let rating = check_rating(rating)?;
        let comment = clean_comment(comment)?;
        self.reviews()
            .modify(|reviews| {
                let review = reviews
                    .iter_mut()
                    .find(|r| r.id == review_id)
                    .ok_or_else(|| AppError::not_found("Review not found"))?;
                if review.author_id != author_id {
                    return Err(AppError::Forbidden("Only the author can edit this review".into()));
                }
                review.rating = rating;
                review.comment = comment;
                review.edited = true;
                Ok(review.clone())
            })
            .await
    }

    /// Only the author may delete.
    pub async fn delete(&self, review_id: Uuid, author_id: Uuid) -> AppResult<()> {
        self.reviews()
            .modify(|reviews| {
                let idx = reviews
                    .iter()
                    .position(|r| r.id == review_id)
                    .ok_or_else(|| AppError::not_found("Review not found"))?;
                if reviews.get(idx).map(|r| r.author_id) != Some(author_id) {
                    return Err(AppError::Forbidden(
                        "Only the author can delete this review".into(),
                    ));
                }
                reviews.remove(idx);
                Ok(())
            })
            .await?;
        info!(%review_id, "review deleted");
        Ok(())
    }

    pub async fn reply(&self, review_id: Uuid, author: &User, comment: &str) -> AppResult<Reply> {
        let reply = Reply {
            id: Uuid::new_v4(),
            author_id: author.id,
            author_email: author.email.clone(),
            author_name: author.display_name(),
            comment: clean_comment(comment)?,
            created_at: OffsetDateTime::now_utc(),
        };
        let stored = reply.clone();
        self.reviews()
            .modify(move |reviews| {
                let review = reviews
                    .iter_mut()
                    .find(|r| r.id == review_id)
                    .ok_or_else(|| AppError::not_found("Review not found"))?;
                review.replies.push(stored);
                Ok(())
            })
            .await?;
        Ok(reply)
    }

    pub async fn rating_summary(&self, product_id: &str) -> anyhow::Result<RatingSummary> {
        let reviews = self.reviews().load().await?;
        Ok(RatingSummary::from_ratings(
            reviews
                .iter()
                .filter(|r| r.product_id == product_id)
                .map(|r| r.rating),
        ))
    }

    /// Summaries for every reviewed product, from a single read.
    pub async fn rating_summaries(&self) -> anyhow::Result<HashMap<String, RatingSummary>> {
        let reviews = self.reviews().load().await?;
        let mut by_product: HashMap<String, Vec<u8>> = HashMap::new();
        for r in reviews {
            by_product.entry(r.product_id).or_default().push(r.rating);
        }
        Ok(by_product
            .into_iter()
            .map(|(id, ratings)| (id, RatingSummary::from_ratings(ratings)))
            .collect())
    }

    pub async fn clear(&self) -> anyhow::Result<()> {
        self.reviews().clear().await
    }
}
