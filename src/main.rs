use anyhow::Context;
use libris_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load LIBRIS settings")?;
    libris_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        catalog = %settings.catalog.base_url,
        "libris-app bootstrap starting"
    );

    libris_app::serve(settings).await?;

    tracing::info!("libris-app shut down");
    Ok(())
}
