//! Environment-sourced configuration.
//!
//! All environment access lives here: the rest of the crate receives
//! configuration as explicit parameters. A `.env` file is loaded
//! (non-fatally) by the binary before `AppConfig::from_env` runs.
//!
//! Env vars:
//! - `APISPORTS_KEY` (required) — API-Football v3 key
//! - `SEASON` (default 2025) — season start year
//! - `OUT_DIR` (default `data/odds`) — snapshot output root
//! - `RETENTION_DAYS` (default 90) — archive retention window; <= 0 disables
//! - `TZ_OFFSET_HOURS` (default -3) — collector timezone as a fixed UTC offset

use anyhow::{Context, Result};
use chrono::{FixedOffset, NaiveDate, Utc};
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use crate::types::SnapError;

// ---------------------------------------------------------------------------
// Tracked leagues
// ---------------------------------------------------------------------------

/// A league the collector queries every run.
pub struct League {
    pub key: &'static str,
    pub id: u32,
}

/// The fixed set of tracked leagues (API-Football league ids).
pub const LEAGUES: &[League] = &[
    League { key: "BR_SERIE_A", id: 71 },
    League { key: "ITA_SERIE_A", id: 135 },
    League { key: "ESP_LALIGA", id: 140 },
    League { key: "ENG_PREMIER", id: 39 },
    League { key: "GER_BUNDESLIGA", id: 78 },
];

// ---------------------------------------------------------------------------
// App configuration
// ---------------------------------------------------------------------------

const DEFAULT_SEASON: u16 = 2025;
const DEFAULT_OUT_DIR: &str = "data/odds";
const DEFAULT_RETENTION_DAYS: i64 = 90;
const DEFAULT_TZ_OFFSET_HOURS: i32 = -3;

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub season: u16,
    pub out_dir: PathBuf,
    pub retention_days: i64,
    /// Fixed UTC offset used for "today" and kickoff normalization.
    pub tz_offset: FixedOffset,
}

impl AppConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("APISPORTS_KEY").context("APISPORTS_KEY not set")?;
        let season = env_parse("SEASON", DEFAULT_SEASON)?;
        let out_dir = std::env::var("OUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUT_DIR));
        let retention_days = env_parse("RETENTION_DAYS", DEFAULT_RETENTION_DAYS)?;
        let tz_offset_hours = env_parse("TZ_OFFSET_HOURS", DEFAULT_TZ_OFFSET_HOURS)?;
        let tz_offset = fixed_offset(tz_offset_hours)?;

        Ok(Self {
            api_key,
            season,
            out_dir,
            retention_days,
            tz_offset,
        })
    }
}

/// Parse an env var, falling back to a default when unset.
fn env_parse<T: FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| SnapError::Config(format!("invalid {name}={raw}: {e}")).into()),
        Err(_) => Ok(default),
    }
}

/// Build a `FixedOffset` from whole hours east of UTC.
pub fn fixed_offset(hours: i32) -> Result<FixedOffset> {
    FixedOffset::east_opt(hours * 3600)
        .ok_or_else(|| SnapError::Config(format!("invalid TZ_OFFSET_HOURS={hours}")).into())
}

/// Today's date in the collector timezone.
pub fn local_today(tz_offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&tz_offset).date_naive()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
