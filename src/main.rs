//! oddsnap — daily football fixtures + odds snapshot collector.
//!
//! Entry point. Loads configuration from the environment, initialises
//! structured logging, fetches the day's fixtures and odds across the
//! tracked leagues, extracts canonical markets, persists the compressed
//! snapshot, prunes expired archives, and prints one machine-readable
//! summary document to stdout. Logs go to stderr so stdout stays clean
//! for the summary.

use anyhow::Result;
use tracing::{debug, info};

use oddsnap::api::football::ApiFootballClient;
use oddsnap::collector::Collector;
use oddsnap::config::{self, AppConfig, LEAGUES};
use oddsnap::markets::{ExtractorConfig, MarketExtractor};
use oddsnap::storage::{self, retention};
use oddsnap::types::{RunMeta, RunSummary};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::from_env()?;
    init_logging();

    let date = config::local_today(cfg.tz_offset);
    info!(
        %date,
        season = cfg.season,
        out_dir = %cfg.out_dir.display(),
        retention_days = cfg.retention_days,
        leagues = LEAGUES.len(),
        "oddsnap starting"
    );

    let client = ApiFootballClient::new(cfg.api_key.clone(), cfg.season, cfg.tz_offset)?;

    // One optional catalog probe per run — keeps an eye on upstream market
    // naming drift without affecting the pipeline.
    let catalog = client.bets_catalog().await;
    if !catalog.is_empty() {
        debug!(markets = catalog.len(), "Bets catalog fetched");
    }

    let extractor = MarketExtractor::new(ExtractorConfig::default())?;
    let collector = Collector::new(&client, extractor, LEAGUES);
    let snapshot = collector.collect(date).await?;

    let archive_path = storage::save_snapshot(&snapshot, &cfg.out_dir)?;

    let removed = retention::prune_old_archives(&cfg.out_dir, cfg.retention_days);
    if !removed.is_empty() {
        info!(count = removed.len(), "Expired archives pruned");
    }

    let summary = RunSummary {
        meta: RunMeta {
            archive_path,
            pruned_count: removed.len(),
            retention_days: cfg.retention_days,
            out_dir: cfg.out_dir.clone(),
        },
        snapshot,
    };
    println!("{}", serde_json::to_string(&summary)?);

    Ok(())
}

/// Initialise the `tracing` subscriber (stderr; JSON via env switch).
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("oddsnap=info"));

    let json_logging = std::env::var("ODDSNAP_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
