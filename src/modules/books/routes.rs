use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use libris_http::error::AppError;
use serde::Deserialize;
use serde_json::json;

use super::catalog::VolumeSource;
use super::models::{BookCard, BookDetail, SearchResults};
use crate::utils::pagination::{go_to_page, total_pages, PaginationState};

/// Message shown when the catalog cannot be reached.
pub const SEARCH_FAILED_MESSAGE: &str = "something went wrong while searching books";

/// Shared state of the book handlers
#[derive(Clone)]
pub struct BooksState {
    pub catalog: Arc<dyn VolumeSource>,
    pub items_per_page: u32,
}

pub fn router(state: BooksState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/search", get(search_books))
        .route("/{id}", get(book_detail))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "SearchParams::first_page")]
    pub page: u32,
}

impl SearchParams {
    fn first_page() -> u32 {
        1
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

/// Search the catalog and return one page of results
async fn search_books(
    State(state): State<BooksState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, AppError> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(AppError::validation(
            vec![json!({"field": "q", "error": "required"})],
            "search query must not be empty",
        ));
    }

    let per_page = i64::from(state.items_per_page);
    let requested = PaginationState::new(params.page.max(1), 0, per_page);

    let page = state
        .catalog
        .search(query, requested.start_index(), state.items_per_page)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, query, "catalog search failed");
            AppError::upstream(SEARCH_FAILED_MESSAGE)
        })?;

    let total_items = i64::try_from(page.total_items).unwrap_or(i64::MAX);
    let last_page = total_pages(total_items, per_page);
    let current_page = go_to_page(i64::from(requested.current_page), last_page);
    let served = PaginationState::new(current_page, total_items, per_page);

    tracing::info!(
        query,
        page = served.current_page,
        total_items = page.total_items,
        "book search served"
    );

    Ok(Json(SearchResults {
        query: query.to_string(),
        page: served.current_page,
        total_items: page.total_items,
        books: page.books.iter().map(BookCard::from).collect(),
        pagination: served.window(),
    }))
}

/// Details of one book
async fn book_detail(
    State(state): State<BooksState>,
    Path(id): Path<String>,
) -> Result<Json<BookDetail>, AppError> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_') {
        return Err(AppError::bad_request(format!("'{}' is not a valid book id", id)));
    }

    let book = state.catalog.volume(&id).await.map_err(|err| {
        tracing::error!(error = %err, book_id = %id, "catalog lookup failed");
        AppError::upstream(SEARCH_FAILED_MESSAGE)
    })?;

    book.map(|book| Json(BookDetail::from(book)))
        .ok_or_else(|| AppError::not_found(format!("book '{}' does not exist", id)))
}
