use anyhow::Context;
use clap::Parser;
use jiff::Timestamp;
use snaplink_core::UrlStore;
use snaplink_gateway::cli::{StoreConfig, CLI};
use snaplink_gateway::{telemetry, App, AppState};
use snaplink_generator::{ObfuscatedTinyflake, Obfuscator};
use snaplink_redirector::RedirectorService;
use snaplink_shortener::ShortenerService;
use snaplink_storage::{InMemoryUrlStore, RedisUrlStore};
use snaplink_tinyflake::TinyflakeSettings;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Zero point of the generator timestamp, 2026-01-01T00:00:00Z.
const GENERATOR_EPOCH_SECOND: i64 = 1_767_225_600;
const SWEEP_PERIOD: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse().into_config()?;
    telemetry::init(config.log_format)?;

    info!(
        listen_addr = %config.listen_addr,
        public_base_url = %config.shortener.public_base_url,
        ttl_secs = config.shortener.ttl.as_secs(),
        node_id = config.node_id,
        "starting snaplink"
    );

    let mut sweeper = None;
    let store: Arc<dyn UrlStore> = match &config.store {
        StoreConfig::InMemory => {
            info!(storage_backend = "in-memory", "using in-memory store");
            let store = InMemoryUrlStore::new();
            sweeper = Some(store.spawn_sweeper(SWEEP_PERIOD));
            Arc::new(store)
        }
        StoreConfig::Redis(settings) => {
            let store = RedisUrlStore::connect(settings.clone())
                .await
                .context("failed to connect to redis")?;
            Arc::new(store)
        }
    };

    let generator = ObfuscatedTinyflake::new(
        TinyflakeSettings::builder()
            .node_id(config.node_id)
            .start_epoch(Timestamp::from_second(GENERATOR_EPOCH_SECOND)?)
            .build(),
        Obfuscator::default(),
    )
    .context("failed to initialize code generator")?;

    let shortener = ShortenerService::new(Arc::clone(&store), generator, config.shortener);
    let redirector = RedirectorService::new(Arc::clone(&store));
    let state = AppState::new(Arc::new(shortener), Arc::new(redirector), store);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    info!("shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
