use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use libris_http::error::AppError;

use super::models::{NewReview, Review, ReviewSummary, VoteRequest};
use super::store::ReviewStore;

/// Shared state of the review handlers
#[derive(Clone)]
pub struct ReviewsState {
    pub store: Arc<ReviewStore>,
    pub max_comment_chars: usize,
}

pub fn router(state: ReviewsState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/books/{book_id}", get(book_reviews).post(submit_review))
        .route("/{review_id}/vote", post(vote))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "reviews module is healthy"
}

/// Ranked reviews of one book with the average rating
async fn book_reviews(
    State(state): State<ReviewsState>,
    Path(book_id): Path<String>,
) -> Json<ReviewSummary> {
    Json(state.store.summary(&book_id).await)
}

/// Submit a review for a book
async fn submit_review(
    State(state): State<ReviewsState>,
    Path(book_id): Path<String>,
    Json(submission): Json<NewReview>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let valid = submission
        .validate(state.max_comment_chars)
        .map_err(|details| AppError::validation(details, "invalid review submission"))?;

    let review = state.store.add(&book_id, valid).await;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Up- or down-vote a review
async fn vote(
    State(state): State<ReviewsState>,
    Path(review_id): Path<String>,
    Json(request): Json<VoteRequest>,
) -> Result<Json<Review>, AppError> {
    state
        .store
        .vote(&review_id, request.delta)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("review '{}' does not exist", review_id)))
}
