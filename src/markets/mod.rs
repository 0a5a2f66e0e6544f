//! Market extraction pipeline — classify, rank, select.
//!
//! `MarketExtractor` composes the taxonomy matcher, the bookmaker ranker,
//! and the per-market value selector: for each market type it picks one
//! winning bookmaker across a fixture's offers, then runs that type's
//! extraction routine on the winner's outcomes.

pub mod ranker;
pub mod selector;
pub mod taxonomy;

use anyhow::Result;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::types::{Bookmaker, FixtureMarkets, MarketType};
use self::ranker::BookmakerRanker;
use self::selector::ValueSelector;
use self::taxonomy::Taxonomy;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Default bookmaker preference order, front of the list first.
pub const DEFAULT_PREFERRED_BOOKMAKERS: &[&str] =
    &["Pinnacle", "bet365", "Betfair", "Betway", "William Hill", "Bwin"];

/// Extraction configuration: explicit and immutable, passed in at
/// construction so tests can run with alternate preferences or lines.
pub struct ExtractorConfig {
    pub preferred_bookmakers: Vec<String>,
    /// Target Over/Under line.
    pub total_line: Decimal,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            preferred_bookmakers: DEFAULT_PREFERRED_BOOKMAKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            total_line: dec!(2.5),
        }
    }
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// Builds the canonical per-fixture market map from raw bookmaker offers.
pub struct MarketExtractor {
    taxonomy: Taxonomy,
    ranker: BookmakerRanker,
    selector: ValueSelector,
    total_line: Decimal,
}

impl MarketExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        Ok(Self {
            taxonomy: Taxonomy::standard()?,
            ranker: BookmakerRanker::new(config.preferred_bookmakers),
            selector: ValueSelector::new()?,
            total_line: config.total_line,
        })
    }

    /// Extract canonical markets from one fixture's bookmaker list.
    ///
    /// Each market type is an independent selection — a different bookmaker
    /// may win each one. A type with zero matching bookmakers, or whose
    /// winner yields no usable values, is simply absent from the result.
    pub fn extract(&self, books: &[Bookmaker]) -> FixtureMarkets {
        let mut out = FixtureMarkets::default();

        for market in MarketType::ALL {
            let Some(offer) = self.ranker.pick(books, *market, &self.taxonomy) else {
                continue;
            };

            match market {
                MarketType::MatchWinner => {
                    out.match_winner = self.selector.three_way(offer.values, offer.bookmaker);
                }
                MarketType::OverUnder => {
                    out.over_under =
                        self.selector.totals(offer.values, self.total_line, offer.bookmaker);
                }
                MarketType::BothTeamsToScore => {
                    out.btts = self.selector.yes_no(offer.values, offer.bookmaker);
                }
                MarketType::Handicap => {
                    out.handicap = self.selector.handicap(offer.values, offer.bookmaker);
                }
                MarketType::FirstHalfWinner => {
                    out.first_half_winner = self.selector.three_way(offer.values, offer.bookmaker);
                }
            }

            if out.has(*market) {
                debug!(market = %market, bookmaker = offer.bookmaker, "Market extracted");
            }
        }

        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
