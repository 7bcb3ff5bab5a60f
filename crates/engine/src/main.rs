//! mudworld Engine - Main entry point.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mudworld_engine::infrastructure::{
    assets::DirectoryAssetSource,
    clock::{SystemClock, SystemRandom},
    config::WorldConfig,
    kv_store::FileKvStore,
    notifier::TracingNotifier,
    shutdown::wait_for_os_signal,
};
use mudworld_engine::{World, WorldPorts};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root.
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mudworld_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting mudworld engine");

    let config = WorldConfig::from_env()?;
    tracing::info!(
        assets = %config.assets_path.display(),
        data = %config.data_path.display(),
        default_room = %config.default_room,
        "Configuration loaded"
    );

    let assets = DirectoryAssetSource::new(config.assets_path.clone());
    let ports = WorldPorts {
        kv: Arc::new(FileKvStore::new(config.data_path.clone())),
        notifier: Arc::new(TracingNotifier::new()),
        clock: Arc::new(SystemClock::new()),
        random: Arc::new(SystemRandom::new()),
    };

    let world = World::init(config, &assets, ports).await?;

    wait_for_os_signal().await;
    tracing::info!("Shutdown signal received");

    world.finalize().await?;
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
