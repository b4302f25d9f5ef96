mod api;
mod dispatcher;
mod middleware;
mod runner;

use std::sync::Arc;

use shopintel_core::{AppConfig, CompetitorSource, StaticCompetitors};
use shopintel_db::{JobStore, MemoryJobStore, PgJobStore};
use shopintel_scraper::BrandScraper;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    dispatcher::JobDispatcher,
    runner::JobRunner,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = shopintel_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store = build_store(&config).await?;
    let competitors: Arc<dyn CompetitorSource> = match &config.competitors_path {
        Some(path) => Arc::new(shopintel_core::load_competitors(path)?),
        None => Arc::new(StaticCompetitors::builtin()),
    };
    let scraper = Arc::new(BrandScraper::from_app_config(&config)?);

    let runner = JobRunner::new(Arc::clone(&store), scraper, competitors);
    let dispatcher = JobDispatcher::spawn(Arc::new(runner));
    let app = build_app(AppState { store, dispatcher });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "shopintel-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Postgres when `DATABASE_URL` is set, otherwise a process-local store.
async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn JobStore>> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set; job records are kept in memory only");
        return Ok(Arc::new(MemoryJobStore::new()));
    };

    let pool_config = shopintel_db::PoolConfig::from_app_config(config);
    let pool = shopintel_db::connect_pool(database_url, pool_config).await?;
    shopintel_db::run_migrations(&pool).await?;
    tracing::info!("job store: postgres ready");
    Ok(Arc::new(PgJobStore::new(pool)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
