use super::*;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use shopintel_core::{AppConfig, CompetitorSource, Environment};

fn config(competitors_path: Option<PathBuf>) -> AppConfig {
    AppConfig {
        database_url: None,
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000),
        log_level: "info".to_string(),
        competitors_path,
        db_max_connections: 10,
        db_min_connections: 1,
        db_acquire_timeout_secs: 10,
        scraper_user_agent: "shopintel-test/0.1".to_string(),
        scraper_page_timeout_secs: 15,
        scraper_catalog_timeout_secs: 10,
    }
}

#[test]
fn parses_scrape_command() {
    let cli = Cli::try_parse_from(["shopintel-cli", "scrape", "https://memy.co.in"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Scrape { ref url, compact: false } if url == "https://memy.co.in"
    ));
}

#[test]
fn parses_scrape_compact_flag() {
    let cli = Cli::try_parse_from(["shopintel-cli", "scrape", "https://a.example", "--compact"])
        .expect("expected valid cli args");

    assert!(matches!(cli.command, Commands::Scrape { compact: true, .. }));
}

#[test]
fn parses_competitors_command() {
    let cli = Cli::try_parse_from(["shopintel-cli", "competitors", "https://memy.co.in"])
        .expect("expected valid cli args");

    assert!(matches!(cli.command, Commands::Competitors { .. }));
}

#[test]
fn parses_db_migrate_command() {
    let cli = Cli::try_parse_from(["shopintel-cli", "db", "migrate"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Db {
            command: DbCommands::Migrate
        }
    ));
}

#[test]
fn scrape_requires_url() {
    assert!(Cli::try_parse_from(["shopintel-cli", "scrape"]).is_err());
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["shopintel-cli"]).is_err());
}

#[test]
fn competitor_source_defaults_to_builtin_table() {
    let source = commands::competitor_source(&config(None)).expect("builtin source");
    assert_eq!(source.competitors_for("https://memy.co.in").len(), 4);
}

#[test]
fn competitor_source_reports_missing_file() {
    let err = commands::competitor_source(&config(Some(PathBuf::from(
        "/nonexistent/competitors.yaml",
    ))))
    .unwrap_err();
    assert!(err.to_string().contains("loading competitors"));
}

#[test]
fn bundled_competitor_table_matches_builtin() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/competitors.yaml");
    let source = commands::competitor_source(&config(Some(path))).expect("bundled table");
    assert_eq!(
        source.competitors_for("https://memy.co.in"),
        shopintel_core::StaticCompetitors::builtin().competitors_for("https://memy.co.in")
    );
}
