//! Command-line arguments and their merge with the config file.
use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "rss-reader", version, about = "Fetch and parse RSS/Atom feeds")]
pub struct Args {
    /// Feed URL to fetch
    pub url: String,

    /// Number of entries to return [default: 10]
    #[arg(short, long, value_name = "N")]
    pub limit: Option<usize>,

    /// Output format [default: text]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Config file [default: ~/.config/rss-reader/config.toml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Everything one run needs, after flags override config values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub url: String,
    pub limit: usize,
    pub format: OutputFormat,
    pub user_agent: String,
}

impl Args {
    pub fn into_settings(self, config: Config) -> Settings {
        Settings {
            url: self.url,
            limit: self.limit.unwrap_or(config.limit),
            format: self.format.unwrap_or(config.format),
            user_agent: config.user_agent,
        }
    }
}
