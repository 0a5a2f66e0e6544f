//! Shared types for the oddsnap collector.
//!
//! These types form the data model used across all modules: the raw
//! bookmaker payload shapes delivered by the odds feed, the canonical
//! per-market shapes the extractor produces, and the daily snapshot
//! document the storage layer persists.

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Market taxonomy
// ---------------------------------------------------------------------------

/// The five canonical betting-market categories tracked by the collector.
///
/// Extending the set means adding a pattern rule in `markets::taxonomy`
/// and an extraction routine in `markets::selector`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketType {
    MatchWinner,
    OverUnder,
    BothTeamsToScore,
    Handicap,
    FirstHalfWinner,
}

impl MarketType {
    /// All market types in fixed taxonomy order. Pattern rules are
    /// evaluated in this order and the extractor fills slots in this order.
    pub const ALL: &'static [MarketType] = &[
        MarketType::MatchWinner,
        MarketType::OverUnder,
        MarketType::BothTeamsToScore,
        MarketType::Handicap,
        MarketType::FirstHalfWinner,
    ];

    /// The snapshot key for this market type (also used in logging).
    pub fn key(&self) -> &'static str {
        match self {
            MarketType::MatchWinner => "matchWinner",
            MarketType::OverUnder => "overUnder",
            MarketType::BothTeamsToScore => "btts",
            MarketType::Handicap => "handicap",
            MarketType::FirstHalfWinner => "firstHalfWinner",
        }
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Raw odds feed shapes
// ---------------------------------------------------------------------------

/// A single priced possibility within a bookmaker's market, as delivered
/// by the odds feed. `value` is free text ("Home", "Over 2.5", …), `odd`
/// is a decimal price, `handicap` an optional line text ("2.5", "-1").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeValue {
    pub value: String,
    pub odd: Decimal,
    #[serde(default)]
    pub handicap: Option<String>,
}

impl OutcomeValue {
    /// The odd, if it is a valid price. Zero or negative quotes are feed
    /// noise and never usable as an odd.
    pub fn usable_odd(&self) -> Option<Decimal> {
        (self.odd > Decimal::ZERO).then_some(self.odd)
    }
}

/// One named betting market published by one bookmaker for one fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetOffer {
    pub name: String,
    #[serde(default)]
    pub values: Vec<OutcomeValue>,
}

/// A bookmaker and everything it publishes for one fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmaker {
    pub name: String,
    #[serde(default)]
    pub bets: Vec<BetOffer>,
}

/// The odds feed's payload for one fixture: who is quoting what.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureOdds {
    pub fixture_id: i64,
    pub bookmakers: Vec<Bookmaker>,
}

// ---------------------------------------------------------------------------
// Canonical market shapes
// ---------------------------------------------------------------------------

/// Canonical 1X2 market (full time or first half). Absent legs stay `None`;
/// a leg is never emitted with a zero placeholder price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreeWayOdds {
    pub home: Option<Decimal>,
    pub draw: Option<Decimal>,
    pub away: Option<Decimal>,
    pub bookmaker: String,
}

/// Canonical Over/Under market at a single selected line.
/// `line` keeps the feed's text form ("2.5") so it survives round trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalsOdds {
    pub line: String,
    pub over: Option<Decimal>,
    pub under: Option<Decimal>,
    pub bookmaker: String,
}

/// Canonical Both Teams To Score market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YesNoOdds {
    pub yes: Option<Decimal>,
    pub no: Option<Decimal>,
    pub bookmaker: String,
}

/// Canonical handicap market at the fixed ±1 line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandicapOdds {
    #[serde(rename = "homeMinus1")]
    pub home_minus_one: Option<Decimal>,
    #[serde(rename = "awayPlus1")]
    pub away_plus_one: Option<Decimal>,
    pub bookmaker: String,
}

// ---------------------------------------------------------------------------
// Per-fixture market map
// ---------------------------------------------------------------------------

/// The sparse per-fixture market map: one optional typed slot per
/// `MarketType`. Absent means "no bookmaker offered a usable match" and is
/// omitted from the serialized document entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureMarkets {
    #[serde(rename = "matchWinner", default, skip_serializing_if = "Option::is_none")]
    pub match_winner: Option<ThreeWayOdds>,
    #[serde(rename = "overUnder", default, skip_serializing_if = "Option::is_none")]
    pub over_under: Option<TotalsOdds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub btts: Option<YesNoOdds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handicap: Option<HandicapOdds>,
    #[serde(rename = "firstHalfWinner", default, skip_serializing_if = "Option::is_none")]
    pub first_half_winner: Option<ThreeWayOdds>,
}

impl FixtureMarkets {
    /// Number of populated market slots.
    pub fn len(&self) -> usize {
        [
            self.match_winner.is_some(),
            self.over_under.is_some(),
            self.btts.is_some(),
            self.handicap.is_some(),
            self.first_half_winner.is_some(),
        ]
        .iter()
        .filter(|populated| **populated)
        .count()
    }

    /// Whether no market slot is populated.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the given slot is populated.
    pub fn has(&self, market: MarketType) -> bool {
        match market {
            MarketType::MatchWinner => self.match_winner.is_some(),
            MarketType::OverUnder => self.over_under.is_some(),
            MarketType::BothTeamsToScore => self.btts.is_some(),
            MarketType::Handicap => self.handicap.is_some(),
            MarketType::FirstHalfWinner => self.first_half_winner.is_some(),
        }
    }

    /// Merge another extraction result into this map. Populated slots in
    /// `other` overwrite (last write wins per market type); empty slots in
    /// `other` never clear an existing value. Used when the same fixture's
    /// odds appear in more than one league query response.
    pub fn merge(&mut self, other: FixtureMarkets) {
        if other.match_winner.is_some() {
            self.match_winner = other.match_winner;
        }
        if other.over_under.is_some() {
            self.over_under = other.over_under;
        }
        if other.btts.is_some() {
            self.btts = other.btts;
        }
        if other.handicap.is_some() {
            self.handicap = other.handicap;
        }
        if other.first_half_winner.is_some() {
            self.first_half_winner = other.first_half_winner;
        }
    }
}

// ---------------------------------------------------------------------------
// Fixture & snapshot
// ---------------------------------------------------------------------------

/// Identity of one fixture plus its canonical markets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureRecord {
    #[serde(rename = "fixtureId")]
    pub fixture_id: i64,
    /// Kickoff, normalized to the collector timezone.
    #[serde(rename = "date")]
    pub kickoff: DateTime<FixedOffset>,
    /// Short status code from the feed ("NS", "FT", …).
    pub status: String,
    #[serde(rename = "leagueId")]
    pub league_id: i64,
    /// Country + league label ("England Premier League").
    pub league: String,
    pub home: Option<String>,
    pub away: Option<String>,
    #[serde(default)]
    pub markets: FixtureMarkets,
}

/// The full day's aggregated document, persisted once per run.
/// Immutable after construction; `count` always equals `items.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub date: NaiveDate,
    pub count: usize,
    pub items: Vec<FixtureRecord>,
}

impl DailySnapshot {
    /// Build a snapshot: sorts fixtures by (kickoff, league id, fixture id)
    /// and sets the count from the list length.
    pub fn new(date: NaiveDate, mut items: Vec<FixtureRecord>) -> Self {
        items.sort_by(|a, b| {
            (a.kickoff, a.league_id, a.fixture_id).cmp(&(b.kickoff, b.league_id, b.fixture_id))
        });
        let count = items.len();
        Self { date, count, items }
    }
}

impl fmt::Display for DailySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} fixtures)", self.date, self.count)
    }
}

// ---------------------------------------------------------------------------
// Run summary (stdout document)
// ---------------------------------------------------------------------------

/// Persistence and pruning facts for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub archive_path: PathBuf,
    pub pruned_count: usize,
    pub retention_days: i64,
    pub out_dir: PathBuf,
}

/// The machine-readable summary emitted on stdout after a successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub meta: RunMeta,
    pub snapshot: DailySnapshot,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for the collector.
#[derive(Debug, thiserror::Error)]
pub enum SnapError {
    #[error("API error ({endpoint}): {message}")]
    Api { endpoint: String, message: String },

    #[error("snapshot persistence failed: {0}")]
    Persistence(String),

    #[error("configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
