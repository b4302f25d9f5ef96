//! Subcommand handlers. Each writes its result to stdout and returns an
//! error for the process exit status.

use anyhow::Context;
use shopintel_core::{AppConfig, CompetitorSource, StaticCompetitors};
use shopintel_scraper::{BrandScraper, Scrape};

pub(crate) async fn run_scrape(config: &AppConfig, url: &str, compact: bool) -> anyhow::Result<()> {
    let scraper = BrandScraper::from_app_config(config)?;
    let insights = scraper.scrape(url).await?;

    let rendered = if compact {
        serde_json::to_string(&insights)?
    } else {
        serde_json::to_string_pretty(&insights)?
    };
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_competitors(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let source = competitor_source(config)?;
    let urls = source.competitors_for(url);
    if urls.is_empty() {
        tracing::info!(url, "no known competitors");
    }
    for competitor in urls {
        println!("{competitor}");
    }
    Ok(())
}

pub(crate) fn competitor_source(config: &AppConfig) -> anyhow::Result<StaticCompetitors> {
    match &config.competitors_path {
        Some(path) => shopintel_core::load_competitors(path)
            .with_context(|| format!("loading competitors from {}", path.display())),
        None => Ok(StaticCompetitors::builtin()),
    }
}

async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set for db commands")?;
    let pool_config = shopintel_db::PoolConfig::from_app_config(config);
    Ok(shopintel_db::connect_pool(database_url, pool_config).await?)
}

pub(crate) async fn run_db_ping(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    shopintel_db::ping(&pool).await?;
    println!("database ok");
    Ok(())
}

pub(crate) async fn run_db_migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    shopintel_db::run_migrations(&pool).await?;
    println!("migrations applied");
    Ok(())
}
