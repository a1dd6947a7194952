pub mod books;
pub mod reviews;

use libris_kernel::{settings::Settings, ModuleRegistry};

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, settings: &Settings) -> anyhow::Result<()> {
    registry.register(books::create_module(&settings.catalog)?);
    registry.register(reviews::create_module(&settings.reviews));
    Ok(())
}
