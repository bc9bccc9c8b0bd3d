use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use rss_reader::cli::{Args, Settings};
use rss_reader::config::{default_config_path, Config};
use rss_reader::{feed, output};

/// Resolve flags against the config file, then fetch and render.
async fn run(args: Args) -> Result<String> {
    let config = match args.config.clone().or_else(default_config_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => Config::default(),
    };
    let Settings {
        url,
        limit,
        format,
        user_agent,
    } = args.into_settings(config);

    let client = feed::build_client(&user_agent).context("Failed to create HTTP client")?;
    let entries = feed::fetch_feed(&client, &url, limit).await?;

    output::render(&entries, format).context("Failed to render output")
}

/// `RUST_LOG` when set, otherwise warnings and errors.
fn log_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy()
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Logs go to stderr so stdout stays clean for JSON output
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => {
            tracing::debug!(error = ?e, "Run failed");
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
