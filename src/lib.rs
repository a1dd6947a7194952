//! LIBRIS Application Library
//!
//! Book search and review modules plus the bootstrap that wires them into
//! the HTTP server.

pub mod modules;
pub mod utils;

use anyhow::Context;
use libris_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Build a registry holding every application module.
pub fn build_registry(settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, settings)?;
    Ok(registry)
}

/// Run the application until shutdown: init and start modules, serve HTTP,
/// then stop modules in reverse order.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry(&settings)?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = libris_http::start_server(&registry, &settings)
        .await
        .context("HTTP server terminated with an error");

    registry.stop_modules().await?;
    served
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_holds_books_and_reviews() {
        let registry = build_registry(&Settings::default()).unwrap();
        let names: Vec<_> = registry.modules().map(|m| m.name()).collect();
        assert_eq!(names, vec!["books", "reviews"]);
    }

    #[test]
    fn openapi_lists_every_module_path() {
        let registry = build_registry(&Settings::default()).unwrap();
        let spec = libris_http::router::merged_openapi(&registry);
        for path in [
            "/api/books/search",
            "/api/books/{id}",
            "/api/reviews/books/{book_id}",
            "/api/reviews/{review_id}/vote",
        ] {
            assert!(spec["paths"][path].is_object(), "missing {}", path);
        }
        assert!(spec["components"]["schemas"]["PageWindow"].is_object());
        assert!(spec["components"]["schemas"]["Review"].is_object());
    }

    #[test]
    fn bad_catalog_url_fails_registration() {
        let mut settings = Settings::default();
        settings.catalog.base_url = "not a url".to_string();
        let err = build_registry(&settings).err().unwrap();
        assert_eq!(err.to_string(), "failed to build catalog client");
    }
}
