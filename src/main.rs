use anyhow::Context;
use libris_kernel::settings::Settings;
use libris_kernel::{InitCtx, ModuleRegistry};
use libris_store::MemoryStore;

use libris_app::modules;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load libris settings")?;
    libris_telemetry::init(&settings.telemetry)
        .with_context(|| "failed to initialize telemetry")?;

    tracing::info!(env = ?settings.environment, "libris bootstrap starting");

    let store = MemoryStore::new();
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &store);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    tracing::info!("libris bootstrap complete");

    libris_http::start_server(&registry, &settings).await?;

    registry.stop_all().await?;
    Ok(())
}
