mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shopintel-cli")]
#[command(about = "Shopify storefront insights from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape one storefront and print its insights as JSON
    Scrape {
        /// Store base URL, e.g. https://memy.co.in
        url: String,
        /// Print single-line JSON instead of pretty-printed output
        #[arg(long)]
        compact: bool,
    },
    /// List the competitor storefronts known for a brand URL
    Competitors { url: String },
    /// Job store maintenance (requires DATABASE_URL)
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    Ping,
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = shopintel_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout is reserved for command output.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scrape { url, compact } => commands::run_scrape(&config, &url, compact).await,
        Commands::Competitors { url } => commands::run_competitors(&config, &url),
        Commands::Db { command } => match command {
            DbCommands::Ping => commands::run_db_ping(&config).await,
            DbCommands::Migrate => commands::run_db_migrate(&config).await,
        },
    }
}

#[cfg(test)]
mod tests;
