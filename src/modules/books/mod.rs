pub mod catalog;
pub mod models;
pub mod routes;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use libris_kernel::{
    settings::{clamp_page_size, CatalogSettings},
    InitCtx, Module,
};
use serde_json::json;

use self::catalog::{GoogleBooksClient, VolumeSource};
use self::routes::BooksState;

/// Books module: catalog search and book details
pub struct BooksModule {
    catalog: Arc<dyn VolumeSource>,
    items_per_page: u32,
}

impl BooksModule {
    pub fn new(catalog: Arc<dyn VolumeSource>, items_per_page: u32) -> Self {
        Self {
            catalog,
            items_per_page: clamp_page_size(items_per_page),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            catalog = %ctx.settings.catalog.base_url,
            items_per_page = self.items_per_page,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(BooksState {
            catalog: Arc::clone(&self.catalog),
            items_per_page: self.items_per_page,
        })
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };

        Some(json!({
            "paths": {
                "/health": {
                    "get": {
                        "summary": "Books health check",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": { "text/plain": { "schema": { "type": "string" } } }
                            }
                        }
                    }
                },
                "/search": {
                    "get": {
                        "summary": "Search the book catalog",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "q",
                                "in": "query",
                                "required": true,
                                "schema": { "type": "string" },
                                "description": "Free-text query"
                            },
                            {
                                "name": "page",
                                "in": "query",
                                "required": false,
                                "schema": { "type": "integer", "minimum": 1, "default": 1 }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "One page of results",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/SearchResults" }
                                    }
                                }
                            },
                            "422": error("Empty query"),
                            "502": error("Catalog unavailable")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Book details",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "200": {
                                "description": "Book details",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "400": error("Malformed id"),
                            "404": error("Unknown book"),
                            "502": error("Catalog unavailable")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "title": { "type": "string" },
                            "authors": { "type": "array", "items": { "type": "string" } },
                            "published_date": { "type": "string" },
                            "description": { "type": "string" },
                            "image_url": { "type": ["string", "null"], "format": "uri" },
                            "isbn": { "type": ["string", "null"] },
                            "page_count": { "type": ["integer", "null"] },
                            "categories": { "type": "array", "items": { "type": "string" } },
                            "authors_line": { "type": "string" },
                            "published_year": { "type": ["integer", "null"] },
                            "published_on": { "type": ["string", "null"], "description": "DD/MM/YYYY" },
                            "description_excerpt": { "type": "string" }
                        },
                        "required": ["id", "title", "authors", "published_date", "description", "categories"]
                    },
                    "BookCard": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "title": { "type": "string" },
                            "authors_line": { "type": "string" },
                            "published_year": { "type": ["integer", "null"] },
                            "categories": { "type": "array", "items": { "type": "string" }, "maxItems": 3 },
                            "image_url": { "type": ["string", "null"], "format": "uri" }
                        },
                        "required": ["id", "title", "authors_line", "categories"]
                    },
                    "PageWindow": {
                        "type": "object",
                        "properties": {
                            "current_page": { "type": "integer" },
                            "total_pages": { "type": "integer" },
                            "has_previous": { "type": "boolean" },
                            "has_next": { "type": "boolean" },
                            "entries": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "kind": { "type": "string", "enum": ["page", "ellipsis"] },
                                        "page": { "type": "integer" }
                                    },
                                    "required": ["kind"]
                                }
                            }
                        },
                        "required": ["current_page", "total_pages", "has_previous", "has_next", "entries"]
                    },
                    "SearchResults": {
                        "type": "object",
                        "properties": {
                            "query": { "type": "string" },
                            "page": { "type": "integer" },
                            "total_items": { "type": "integer" },
                            "books": { "type": "array", "items": { "$ref": "#/components/schemas/BookCard" } },
                            "pagination": {
                                "oneOf": [
                                    { "$ref": "#/components/schemas/PageWindow" },
                                    { "type": "null" }
                                ]
                            }
                        },
                        "required": ["query", "page", "total_items", "books"]
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create the books module backed by the configured catalog
pub fn create_module(settings: &CatalogSettings) -> anyhow::Result<Arc<dyn Module>> {
    let client = GoogleBooksClient::new(settings).context("failed to build catalog client")?;
    Ok(Arc::new(BooksModule::new(
        Arc::new(client),
        settings.page_size(),
    )))
}
