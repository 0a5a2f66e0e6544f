//! Bookmaker selection by preference and data richness.
//!
//! Across the bookmakers quoting one market type for one fixture, exactly
//! one is chosen as canonical. Scoring is a pure function over immutable
//! inputs; repeated runs over the same candidate order select the same
//! winner.

use tracing::debug;

use super::taxonomy::Taxonomy;
use crate::types::{Bookmaker, MarketType, OutcomeValue};

/// Fixed low weight for bookmakers not on the preference list.
const UNLISTED_WEIGHT: usize = 1;

/// Preference weight dominates outcome-count richness.
const WEIGHT_SCALE: usize = 100;

/// The winning offer for one market type.
#[derive(Debug)]
pub struct RankedOffer<'a> {
    pub bookmaker: &'a str,
    pub values: &'a [OutcomeValue],
}

/// Scores and selects bookmakers. Preference-listed bookmakers outrank any
/// unlisted one; richer outcome lists break ties within a rank.
pub struct BookmakerRanker {
    preferred: Vec<String>,
}

impl BookmakerRanker {
    pub fn new(preferred: Vec<String>) -> Self {
        Self { preferred }
    }

    /// `len + 2 - index` for listed bookmakers (front of the list scores
    /// highest), a fixed `1` for anyone unlisted.
    fn preference_weight(&self, name: &str) -> usize {
        match self.preferred.iter().position(|p| p == name) {
            Some(index) => self.preferred.len() + 2 - index,
            None => UNLISTED_WEIGHT,
        }
    }

    /// Composite score: preference rank first, outcome richness second.
    pub fn score(&self, name: &str, outcome_count: usize) -> usize {
        self.preference_weight(name) * WEIGHT_SCALE + outcome_count
    }

    /// Select the canonical bookmaker for `market` among `books`.
    ///
    /// A bookmaker's candidate offer is its first bet classified as the
    /// target type. Highest score wins; the first-seen candidate keeps a
    /// tied score (stable selection). Zero candidates → `None`.
    pub fn pick<'a>(
        &self,
        books: &'a [Bookmaker],
        market: MarketType,
        taxonomy: &Taxonomy,
    ) -> Option<RankedOffer<'a>> {
        let mut best: Option<(RankedOffer<'a>, usize)> = None;

        for book in books {
            let Some(bet) = book
                .bets
                .iter()
                .find(|b| taxonomy.classify(&b.name) == Some(market))
            else {
                continue;
            };

            let score = self.score(&book.name, bet.values.len());
            if best.as_ref().map_or(true, |(_, held)| score > *held) {
                best = Some((
                    RankedOffer {
                        bookmaker: &book.name,
                        values: &bet.values,
                    },
                    score,
                ));
            }
        }

        if let Some((offer, score)) = &best {
            debug!(
                market = %market,
                bookmaker = offer.bookmaker,
                score,
                outcomes = offer.values.len(),
                "Bookmaker selected"
            );
        }

        best.map(|(offer, _)| offer)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BetOffer;
    use rust_decimal_macros::dec;

    fn ranker() -> BookmakerRanker {
        BookmakerRanker::new(vec!["Pinnacle".to_string(), "bet365".to_string()])
    }

    fn taxonomy() -> Taxonomy {
        Taxonomy::standard().unwrap()
    }

    fn outcome(label: &str) -> OutcomeValue {
        OutcomeValue {
            value: label.to_string(),
            odd: dec!(1.90),
            handicap: None,
        }
    }

    fn book(name: &str, bet_name: &str, outcomes: usize) -> Bookmaker {
        Bookmaker {
            name: name.to_string(),
            bets: vec![BetOffer {
                name: bet_name.to_string(),
                values: (0..outcomes).map(|i| outcome(&format!("v{i}"))).collect(),
            }],
        }
    }

    #[test]
    fn test_preference_weight_formula() {
        let r = ranker();
        // Two listed bookmakers: weights 4 and 3; unlisted weight 1.
        assert_eq!(r.score("Pinnacle", 0), 400);
        assert_eq!(r.score("bet365", 0), 300);
        assert_eq!(r.score("NoName", 0), 100);
    }

    #[test]
    fn test_listed_beats_equally_rich_unlisted() {
        let books = vec![
            book("SomeBook", "Match Winner", 3),
            book("bet365", "Match Winner", 3),
        ];
        let offer = ranker().pick(&books, MarketType::MatchWinner, &taxonomy()).unwrap();
        assert_eq!(offer.bookmaker, "bet365");
    }

    #[test]
    fn test_richer_unlisted_wins_among_unlisted() {
        let books = vec![
            book("BookA", "Match Winner", 3),
            book("BookB", "Match Winner", 7),
        ];
        let offer = ranker().pick(&books, MarketType::MatchWinner, &taxonomy()).unwrap();
        assert_eq!(offer.bookmaker, "BookB");
    }

    #[test]
    fn test_front_of_list_outranks_back_of_list() {
        // bet365 has far more outcomes, but richness never overcomes a
        // preference rank (scale factor 100).
        let books = vec![
            book("bet365", "1X2", 50),
            book("Pinnacle", "1X2", 3),
        ];
        let offer = ranker().pick(&books, MarketType::MatchWinner, &taxonomy()).unwrap();
        assert_eq!(offer.bookmaker, "Pinnacle");
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let books = vec![
            book("BookA", "Match Winner", 3),
            book("BookB", "Match Winner", 3),
        ];
        let offer = ranker().pick(&books, MarketType::MatchWinner, &taxonomy()).unwrap();
        assert_eq!(offer.bookmaker, "BookA");
    }

    #[test]
    fn test_deterministic_repeated_runs() {
        let books = vec![
            book("BookA", "Match Winner", 2),
            book("bet365", "Match Winner", 3),
            book("BookC", "Match Winner", 5),
        ];
        let r = ranker();
        let t = taxonomy();
        let first = r.pick(&books, MarketType::MatchWinner, &t).unwrap().bookmaker.to_string();
        for _ in 0..10 {
            let again = r.pick(&books, MarketType::MatchWinner, &t).unwrap();
            assert_eq!(again.bookmaker, first);
        }
    }

    #[test]
    fn test_no_candidates() {
        let books = vec![book("BookA", "Correct Score", 10)];
        assert!(ranker().pick(&books, MarketType::MatchWinner, &taxonomy()).is_none());
    }

    #[test]
    fn test_pick_ignores_other_market_types() {
        let books = vec![
            book("BookA", "Over/Under", 8),
            book("BookB", "Match Winner", 3),
        ];
        let offer = ranker().pick(&books, MarketType::MatchWinner, &taxonomy()).unwrap();
        assert_eq!(offer.bookmaker, "BookB");
    }

    #[test]
    fn test_first_classified_bet_per_bookmaker() {
        // One bookmaker listing the market twice: the first listing is the
        // candidate offer.
        let books = vec![Bookmaker {
            name: "BookA".to_string(),
            bets: vec![
                BetOffer {
                    name: "Match Winner".to_string(),
                    values: vec![outcome("Home")],
                },
                BetOffer {
                    name: "1X2".to_string(),
                    values: vec![outcome("Home"), outcome("Draw"), outcome("Away")],
                },
            ],
        }];
        let offer = ranker().pick(&books, MarketType::MatchWinner, &taxonomy()).unwrap();
        assert_eq!(offer.values.len(), 1);
    }
}
