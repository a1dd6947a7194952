pub mod models;
pub mod ranking;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use libris_kernel::{settings::ReviewSettings, InitCtx, Module};
use serde_json::json;

use self::routes::ReviewsState;
use self::store::ReviewStore;

/// Reviews module: star-rated reviews with voting, held in memory
pub struct ReviewsModule {
    store: Arc<ReviewStore>,
    max_comment_chars: usize,
}

impl ReviewsModule {
    pub fn new(store: Arc<ReviewStore>, settings: &ReviewSettings) -> Self {
        Self {
            store,
            max_comment_chars: settings.max_comment_chars,
        }
    }
}

#[async_trait]
impl Module for ReviewsModule {
    fn name(&self) -> &'static str {
        "reviews"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            max_comment_chars = self.max_comment_chars,
            "reviews module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(ReviewsState {
            store: Arc::clone(&self.store),
            max_comment_chars: self.max_comment_chars,
        })
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = json!({
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                }
            }
        });
        let book_id = json!({
            "name": "book_id",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        });

        Some(json!({
            "paths": {
                "/health": {
                    "get": {
                        "summary": "Reviews health check",
                        "tags": ["Reviews"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": { "text/plain": { "schema": { "type": "string" } } }
                            }
                        }
                    }
                },
                "/books/{book_id}": {
                    "get": {
                        "summary": "Reviews of a book, highest voted first",
                        "tags": ["Reviews"],
                        "parameters": [book_id.clone()],
                        "responses": {
                            "200": {
                                "description": "Ranked reviews with average rating",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ReviewSummary" }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Submit a review",
                        "tags": ["Reviews"],
                        "parameters": [book_id],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/NewReview" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Review created",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Review" }
                                    }
                                }
                            },
                            "422": { "description": "Validation error", "content": error["content"].clone() }
                        }
                    }
                },
                "/{review_id}/vote": {
                    "post": {
                        "summary": "Up- or down-vote a review",
                        "tags": ["Reviews"],
                        "parameters": [{
                            "name": "review_id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/VoteRequest" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Updated review",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Review" }
                                    }
                                }
                            },
                            "404": { "description": "Review not found", "content": error["content"].clone() }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Review": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "book_id": { "type": "string" },
                            "author": { "type": "string" },
                            "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                            "comment": { "type": "string" },
                            "date": { "type": "string", "format": "date" },
                            "votes": { "type": "integer" }
                        },
                        "required": ["id", "book_id", "author", "rating", "comment", "date", "votes"]
                    },
                    "NewReview": {
                        "type": "object",
                        "properties": {
                            "author": { "type": "string", "description": "Blank means anonymous" },
                            "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                            "comment": { "type": "string" }
                        },
                        "required": ["rating", "comment"]
                    },
                    "VoteRequest": {
                        "type": "object",
                        "properties": {
                            "delta": { "type": "integer", "description": "Usually 1 or -1" }
                        },
                        "required": ["delta"]
                    },
                    "RankedReview": {
                        "allOf": [
                            { "$ref": "#/components/schemas/Review" },
                            {
                                "type": "object",
                                "properties": {
                                    "stars": { "type": "string", "description": "Star glyphs, e.g. ★★★★☆" }
                                },
                                "required": ["stars"]
                            }
                        ]
                    },
                    "ReviewSummary": {
                        "type": "object",
                        "properties": {
                            "book_id": { "type": "string" },
                            "average_rating": { "type": "number" },
                            "average_label": { "type": "string" },
                            "review_count": { "type": "integer" },
                            "reviews": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/RankedReview" }
                            }
                        },
                        "required": ["book_id", "average_rating", "average_label", "review_count", "reviews"]
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let count = self.store.len().await;
        tracing::info!(
            module = self.name(),
            reviews = count,
            "reviews module stopped, in-memory reviews discarded"
        );
        Ok(())
    }
}

/// Create a new instance of the reviews module
pub fn create_module(settings: &ReviewSettings) -> Arc<dyn Module> {
    Arc::new(ReviewsModule::new(Arc::new(ReviewStore::new()), settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::reviews::models::ValidReview;

    fn module(store: Arc<ReviewStore>) -> Arc<ReviewsModule> {
        Arc::new(ReviewsModule::new(store, &ReviewSettings::default()))
    }

    #[tokio::test]
    async fn stop_runs_on_a_spawned_task() {
        let store = Arc::new(ReviewStore::new());
        store
            .add(
                "book-1",
                ValidReview {
                    author: "Ana".to_string(),
                    rating: 4,
                    comment: "Great".to_string(),
                },
            )
            .await;

        let module = module(store);
        let handle = tokio::spawn(async move { module.stop().await });
        assert!(handle.await.unwrap().is_ok());
    }

    #[test]
    fn summary_schema_lists_ranked_reviews() {
        let spec = module(Arc::new(ReviewStore::new())).openapi().unwrap();
        let schemas = &spec["components"]["schemas"];

        assert_eq!(
            schemas["ReviewSummary"]["properties"]["reviews"]["items"]["$ref"],
            "#/components/schemas/RankedReview"
        );
        let extension = &schemas["RankedReview"]["allOf"][1];
        assert_eq!(extension["properties"]["stars"]["type"], "string");
        assert_eq!(extension["required"][0], "stars");
    }
}
