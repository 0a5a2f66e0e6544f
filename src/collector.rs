//! Per-day aggregation across leagues.
//!
//! Fetches fixtures and odds for each tracked league, indexes fixtures by
//! id, runs the market extractor over every odds payload, and assembles the
//! day's snapshot. A single league failing to fetch degrades the snapshot
//! rather than aborting the run.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::api::OddsFeed;
use crate::config::League;
use crate::markets::MarketExtractor;
use crate::types::{DailySnapshot, FixtureRecord};

/// Aggregates one day of fixtures + odds into a `DailySnapshot`.
pub struct Collector<'a, F: OddsFeed> {
    feed: &'a F,
    extractor: MarketExtractor,
    leagues: &'a [League],
}

impl<'a, F: OddsFeed> Collector<'a, F> {
    pub fn new(feed: &'a F, extractor: MarketExtractor, leagues: &'a [League]) -> Self {
        Self {
            feed,
            extractor,
            leagues,
        }
    }

    /// Collect the snapshot for `date`.
    ///
    /// Odds payloads for fixtures that never appeared in a fixtures
    /// response are dropped. When the same fixture's odds appear in more
    /// than one league response, extraction results merge with last write
    /// winning per market type.
    pub async fn collect(&self, date: NaiveDate) -> Result<DailySnapshot> {
        info!(%date, leagues = self.leagues.len(), "Collecting fixtures");

        let mut by_fixture: BTreeMap<i64, FixtureRecord> = BTreeMap::new();
        for league in self.leagues {
            match self.feed.fixtures(league.id, date).await {
                Ok(fixtures) => {
                    for fixture in fixtures {
                        by_fixture.insert(fixture.fixture_id, fixture);
                    }
                }
                Err(e) => {
                    warn!(league = league.key, error = %e, "Fixture fetch failed, continuing without");
                }
            }
        }
        info!(fixtures = by_fixture.len(), "Fixtures indexed");

        let mut odds_payloads = 0usize;
        for league in self.leagues {
            let odds = match self.feed.fixture_odds(league.id, date).await {
                Ok(odds) => odds,
                Err(e) => {
                    warn!(league = league.key, error = %e, "Odds fetch failed, continuing without");
                    continue;
                }
            };
            for fixture_odds in odds {
                let Some(record) = by_fixture.get_mut(&fixture_odds.fixture_id) else {
                    continue;
                };
                odds_payloads += 1;
                let markets = self.extractor.extract(&fixture_odds.bookmakers);
                record.markets.merge(markets);
            }
        }

        let snapshot = DailySnapshot::new(date, by_fixture.into_values().collect());
        info!(count = snapshot.count, odds_payloads, "Snapshot built");
        Ok(snapshot)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
