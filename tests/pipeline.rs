//! End-to-end pipeline test over an in-memory odds feed.
//!
//! Drives collect → save → load → prune against a mock `OddsFeed`,
//! checking the full snapshot shape, the archive round trip, and the
//! retention pass in one flow.

use std::collections::HashMap;
use std::fs;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use rust_decimal_macros::dec;
use tempfile::tempdir;

use oddsnap::api::OddsFeed;
use oddsnap::collector::Collector;
use oddsnap::config::League;
use oddsnap::markets::{ExtractorConfig, MarketExtractor};
use oddsnap::storage::{self, retention, LATEST_FILE};
use oddsnap::types::{
    BetOffer, Bookmaker, FixtureMarkets, FixtureOdds, FixtureRecord, OutcomeValue,
};

// ---------------------------------------------------------------------------
// Mock feed
// ---------------------------------------------------------------------------

struct MockFeed {
    fixtures: HashMap<u32, Vec<FixtureRecord>>,
    odds: HashMap<u32, Vec<FixtureOdds>>,
}

#[async_trait]
impl OddsFeed for MockFeed {
    async fn fixtures(&self, league_id: u32, _date: NaiveDate) -> Result<Vec<FixtureRecord>> {
        Ok(self.fixtures.get(&league_id).cloned().unwrap_or_default())
    }

    async fn fixture_odds(&self, league_id: u32, _date: NaiveDate) -> Result<Vec<FixtureOdds>> {
        Ok(self.odds.get(&league_id).cloned().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const TEST_LEAGUES: &[League] = &[League { key: "ENG_PREMIER", id: 39 }];

fn kickoff(hour: u32) -> DateTime<FixedOffset> {
    FixedOffset::west_opt(3 * 3600)
        .unwrap()
        .with_ymd_and_hms(2026, 8, 4, hour, 0, 0)
        .unwrap()
}

fn ov(label: &str, odd: &str) -> OutcomeValue {
    OutcomeValue {
        value: label.to_string(),
        odd: odd.parse().unwrap(),
        handicap: None,
    }
}

fn sample_feed() -> MockFeed {
    let fixture = FixtureRecord {
        fixture_id: 1035000,
        kickoff: kickoff(16),
        status: "NS".to_string(),
        league_id: 39,
        league: "England Premier League".to_string(),
        home: Some("Arsenal".to_string()),
        away: Some("São Paulo XI".to_string()),
        markets: FixtureMarkets::default(),
    };

    let odds = FixtureOdds {
        fixture_id: 1035000,
        bookmakers: vec![Bookmaker {
            name: "bet365".to_string(),
            bets: vec![
                BetOffer {
                    name: "Match Winner".to_string(),
                    values: vec![ov("Home", "1.50"), ov("Draw", "3.20"), ov("Away", "6.00")],
                },
                BetOffer {
                    name: "Over/Under".to_string(),
                    values: vec![ov("Over 2.5", "1.90"), ov("Under 2.5", "1.90")],
                },
            ],
        }],
    };

    MockFeed {
        fixtures: HashMap::from([(39, vec![fixture])]),
        odds: HashMap::from([(39, vec![odds])]),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_collect_save_load_prune() {
    let feed = sample_feed();
    let extractor = MarketExtractor::new(ExtractorConfig::default()).unwrap();
    let collector = Collector::new(&feed, extractor, TEST_LEAGUES);

    let date = NaiveDate::from_ymd_opt(2026, 8, 4).unwrap();
    let snapshot = collector.collect(date).await.unwrap();

    // Exactly the two offered markets, nothing else.
    assert_eq!(snapshot.count, 1);
    let markets = &snapshot.items[0].markets;
    assert_eq!(markets.len(), 2);

    let mw = markets.match_winner.as_ref().unwrap();
    assert_eq!(mw.home, Some(dec!(1.50)));
    assert_eq!(mw.draw, Some(dec!(3.20)));
    assert_eq!(mw.away, Some(dec!(6.00)));
    assert_eq!(mw.bookmaker, "bet365");

    let ou = markets.over_under.as_ref().unwrap();
    assert_eq!(ou.line, "2.5");
    assert_eq!(ou.over, Some(dec!(1.90)));
    assert_eq!(ou.under, Some(dec!(1.90)));
    assert_eq!(ou.bookmaker, "bet365");

    assert!(markets.btts.is_none());
    assert!(markets.handicap.is_none());
    assert!(markets.first_half_winner.is_none());

    // Persist and read back: structurally identical, odds precision kept.
    let out = tempdir().unwrap();
    let archive_path = storage::save_snapshot(&snapshot, out.path()).unwrap();
    assert_eq!(
        archive_path,
        out.path().join("2026").join("08").join("2026-08-04.json.gz")
    );

    let loaded = storage::load_snapshot(&archive_path).unwrap();
    assert_eq!(loaded, snapshot);

    // The convenience copy is readable JSON with non-ASCII intact.
    let latest = fs::read_to_string(out.path().join(LATEST_FILE)).unwrap();
    assert!(latest.contains("São Paulo XI"));
    assert!(latest.contains("\"1.50\""));

    // A fresh archive survives the retention pass; latest.json too.
    let removed = retention::prune_old_archives(out.path(), 90);
    assert!(removed.is_empty());
    assert!(archive_path.exists());
    assert!(out.path().join(LATEST_FILE).exists());
}

#[tokio::test]
async fn test_empty_day_produces_empty_snapshot_document() {
    let feed = MockFeed {
        fixtures: HashMap::new(),
        odds: HashMap::new(),
    };
    let extractor = MarketExtractor::new(ExtractorConfig::default()).unwrap();
    let collector = Collector::new(&feed, extractor, TEST_LEAGUES);

    let date = NaiveDate::from_ymd_opt(2026, 8, 4).unwrap();
    let snapshot = collector.collect(date).await.unwrap();
    assert_eq!(snapshot.count, 0);

    let out = tempdir().unwrap();
    let archive_path = storage::save_snapshot(&snapshot, out.path()).unwrap();
    let loaded = storage::load_snapshot(&archive_path).unwrap();
    assert_eq!(loaded.count, 0);
    assert!(loaded.items.is_empty());
}
