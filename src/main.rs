use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use sieutamphim::config::{self, ProviderConfig};
use sieutamphim::{HttpFetcher, Provider, Result, SieuTamPhim, StreamLink};

/// Drive the sieutamphim provider the way a host would
#[derive(Parser)]
#[command(name = "sieutamphim", version)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search titles
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Load a title's metadata and episodes
    Load { url: String },
    /// Resolve playable streams for an episode URL
    Links { url: String },
}

#[derive(Serialize)]
struct LinksOutput {
    found: bool,
    links: Vec<StreamLink>,
}

fn setup_logging() -> Result<()> {
    let data_dir = config::data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    let file_appender = tracing_appender::rolling::daily(&data_dir, "sieutamphim.log");

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sieutamphim=info")),
        )
        .with(fmt::layer().with_writer(file_appender).with_ansi(false))
        .init();

    Ok(())
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode output: {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries results, logs go to a file
    if let Err(e) = setup_logging() {
        eprintln!("Warning: Could not set up logging: {}", e);
    }

    let config = match &cli.config {
        Some(path) => ProviderConfig::load_from(path)?,
        None => ProviderConfig::load()?,
    };
    info!(base_url = %config.site.base_url, "Loaded config");

    let fetcher = HttpFetcher::new(&config.http.user_agent)?;
    let provider = SieuTamPhim::new(config, fetcher);

    match cli.command {
        Command::Search { query } => {
            let results = provider.search(&query.join(" ")).await?;
            print_json(&results);
        }
        Command::Load { url } => {
            let result = provider.load(&url).await?;
            print_json(&result);
        }
        Command::Links { url } => {
            let mut links = Vec::new();
            let found = provider
                .load_links(&url, &mut |link: StreamLink| links.push(link))
                .await?;
            print_json(&LinksOutput { found, links });
        }
    }

    Ok(())
}
