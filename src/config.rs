use std::time::Duration;

use clap::Parser;

pub const DEFAULT_ENDPOINT: &str = "https://hn.algolia.com/api/v1/search";
pub const DEFAULT_HITS_PER_PAGE: u32 = 100;
// Algolia refuses pages larger than this
pub const MAX_HITS_PER_PAGE: u32 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoint: String,
    pub hits_per_page: u32,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            hits_per_page: DEFAULT_HITS_PER_PAGE,
            timeout: Duration::from_secs(30),
            user_agent: concat!("hn_front_page/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Hacker News front page, filterable by title
#[derive(Debug, Default, Parser)]
#[command(name = "hn_front_page", version, long_about = None)]
pub struct Cli {
    /// Search endpoint to query
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Number of stories to request
    #[arg(long)]
    pub hits_per_page: Option<u32>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// User-Agent header sent with the request
    #[arg(long)]
    pub user_agent: Option<String>,
}

/// Defaults, then `HN_READER_*` environment variables, then command-line flags.
pub fn load_settings(cli: &Cli) -> Settings {
    let mut settings = Settings::default();
    apply_env(&mut settings, |key| std::env::var(key).ok());
    apply_cli(&mut settings, cli);
    settings
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("HN_READER_ENDPOINT") {
        settings.endpoint = v;
    }

    if let Some(v) = lookup("HN_READER_HITS_PER_PAGE") {
        match v.parse::<u32>() {
            Ok(parsed) => settings.hits_per_page = clamp_hits(parsed),
            Err(err) => tracing::warn!(value = %v, "ignoring HN_READER_HITS_PER_PAGE: {err}"),
        }
    }

    if let Some(v) = lookup("HN_READER_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.timeout = Duration::from_secs(parsed),
            Err(err) => tracing::warn!(value = %v, "ignoring HN_READER_TIMEOUT_SECS: {err}"),
        }
    }

    if let Some(v) = lookup("HN_READER_USER_AGENT") {
        settings.user_agent = v;
    }
}

fn apply_cli(settings: &mut Settings, cli: &Cli) {
    if let Some(endpoint) = &cli.endpoint {
        settings.endpoint = endpoint.clone();
    }
    if let Some(hits) = cli.hits_per_page {
        settings.hits_per_page = clamp_hits(hits);
    }
    if let Some(secs) = cli.timeout_secs {
        settings.timeout = Duration::from_secs(secs);
    }
    if let Some(user_agent) = &cli.user_agent {
        settings.user_agent = user_agent.clone();
    }
}

fn clamp_hits(hits: u32) -> u32 {
    hits.clamp(1, MAX_HITS_PER_PAGE)
}
