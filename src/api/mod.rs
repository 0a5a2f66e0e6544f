//! Odds feed integrations.
//!
//! Defines the `OddsFeed` trait — the seam to the external fixtures and
//! odds source — and the API-Football implementation. The extraction
//! pipeline only ever sees this trait, so tests substitute an in-memory
//! feed.

pub mod football;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::types::{FixtureOdds, FixtureRecord};

/// Abstraction over the fixtures + odds source.
#[async_trait]
pub trait OddsFeed: Send + Sync {
    /// Fixtures scheduled for `date` in one league. Records arrive with an
    /// empty markets map.
    async fn fixtures(&self, league_id: u32, date: NaiveDate) -> Result<Vec<FixtureRecord>>;

    /// Raw bookmaker odds for `date` in one league, keyed by fixture id.
    async fn fixture_odds(&self, league_id: u32, date: NaiveDate) -> Result<Vec<FixtureOdds>>;
}
