//! Market classification by free-text pattern rules.
//!
//! Upstream market ids are volatile, so classification works on display
//! names: an ordered list of case-insensitive pattern rules, one per
//! `MarketType`, evaluated in fixed taxonomy order. A name matches at most
//! the first rule it satisfies; a name that satisfies no rule is simply
//! unmatched — not an error.

use anyhow::Result;
use regex::Regex;

use crate::types::MarketType;

/// One classification rule. `includes` must match; `excludes` (when set)
/// must not. The exclusion handles variants that share a substring with the
/// real market ("Handicap Corners", "Handicap Cards").
pub struct MarketRule {
    market: MarketType,
    includes: Regex,
    excludes: Option<Regex>,
}

impl MarketRule {
    pub fn new(market: MarketType, includes: &str, excludes: Option<&str>) -> Result<Self> {
        Ok(Self {
            market,
            includes: Regex::new(includes)?,
            excludes: excludes.map(Regex::new).transpose()?,
        })
    }

    fn matches(&self, name: &str) -> bool {
        if !self.includes.is_match(name) {
            return false;
        }
        match &self.excludes {
            Some(rx) => !rx.is_match(name),
            None => true,
        }
    }
}

/// The ordered rule set. Immutable once built; constructed inside
/// `ExtractorConfig` rather than held as global state so tests can supply
/// alternate taxonomies.
pub struct Taxonomy {
    rules: Vec<MarketRule>,
}

impl Taxonomy {
    /// The standard five-market taxonomy, tolerant of the naming variance
    /// seen in the feed ("Match Winner" / "1X2" / "Win Draw Win", …).
    pub fn standard() -> Result<Self> {
        Ok(Self::new(vec![
            MarketRule::new(
                MarketType::MatchWinner,
                r"(?i)^(match\s*winner|1x2|win\s*draw\s*win)$",
                None,
            )?,
            MarketRule::new(MarketType::OverUnder, r"(?i)over\s*/\s*under|totals?", None)?,
            MarketRule::new(
                MarketType::BothTeamsToScore,
                r"(?i)^both\s*teams\s*to\s*score$|^btts$",
                None,
            )?,
            MarketRule::new(
                MarketType::Handicap,
                r"(?i)^asian\s*handicap$|^handicap",
                Some(r"(?i)corners?|cards?"),
            )?,
            MarketRule::new(
                MarketType::FirstHalfWinner,
                r"(?i)^(1(st)?|first)\s*half\s*(winner|1x2)",
                None,
            )?,
        ]))
    }

    pub fn new(rules: Vec<MarketRule>) -> Self {
        Self { rules }
    }

    /// Classify a bookmaker's market name. First satisfied rule wins.
    pub fn classify(&self, name: &str) -> Option<MarketType> {
        let name = name.trim();
        self.rules.iter().find(|r| r.matches(name)).map(|r| r.market)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn taxonomy() -> Taxonomy {
        Taxonomy::standard().unwrap()
    }

    #[test]
    fn test_match_winner_variants() {
        let t = taxonomy();
        assert_eq!(t.classify("Match Winner"), Some(MarketType::MatchWinner));
        assert_eq!(t.classify("1X2"), Some(MarketType::MatchWinner));
        assert_eq!(t.classify("Win Draw Win"), Some(MarketType::MatchWinner));
        assert_eq!(t.classify("match winner"), Some(MarketType::MatchWinner));
    }

    #[test]
    fn test_match_winner_is_anchored() {
        // "Match Winner 2nd Half" must not classify as the full-time market.
        assert_eq!(taxonomy().classify("Match Winner 2nd Half"), None);
    }

    #[test]
    fn test_over_under_variants() {
        let t = taxonomy();
        assert_eq!(t.classify("Over/Under"), Some(MarketType::OverUnder));
        assert_eq!(t.classify("Over / Under"), Some(MarketType::OverUnder));
        assert_eq!(t.classify("Goals Totals"), Some(MarketType::OverUnder));
        assert_eq!(t.classify("Total"), Some(MarketType::OverUnder));
    }

    #[test]
    fn test_btts_variants() {
        let t = taxonomy();
        assert_eq!(t.classify("Both Teams To Score"), Some(MarketType::BothTeamsToScore));
        assert_eq!(t.classify("BTTS"), Some(MarketType::BothTeamsToScore));
        assert_eq!(t.classify("Both Teams To Score First Half"), None);
    }

    #[test]
    fn test_handicap_variants() {
        let t = taxonomy();
        assert_eq!(t.classify("Asian Handicap"), Some(MarketType::Handicap));
        assert_eq!(t.classify("Handicap"), Some(MarketType::Handicap));
        assert_eq!(t.classify("Handicap Result"), Some(MarketType::Handicap));
    }

    #[test]
    fn test_handicap_excludes_corners_and_cards() {
        let t = taxonomy();
        assert_eq!(t.classify("Handicap Corners"), None);
        assert_eq!(t.classify("Handicap Cards"), None);
        assert_eq!(t.classify("Handicap Corner"), None);
    }

    #[test]
    fn test_first_half_winner_variants() {
        let t = taxonomy();
        assert_eq!(t.classify("First Half Winner"), Some(MarketType::FirstHalfWinner));
        assert_eq!(t.classify("1st Half Winner"), Some(MarketType::FirstHalfWinner));
        assert_eq!(t.classify("1 Half 1X2"), Some(MarketType::FirstHalfWinner));
    }

    #[test]
    fn test_unmatched_names() {
        let t = taxonomy();
        assert_eq!(t.classify("Correct Score"), None);
        assert_eq!(t.classify("Double Chance"), None);
        assert_eq!(t.classify(""), None);
    }

    #[test]
    fn test_first_rule_wins() {
        // A name satisfying both the OverUnder and the Handicap patterns
        // classifies as the earlier rule in taxonomy order.
        assert_eq!(taxonomy().classify("Handicap Totals"), Some(MarketType::OverUnder));
    }

    #[test]
    fn test_custom_taxonomy() {
        let t = Taxonomy::new(vec![MarketRule::new(
            MarketType::BothTeamsToScore,
            r"(?i)^gg/ng$",
            None,
        )
        .unwrap()]);
        assert_eq!(t.classify("GG/NG"), Some(MarketType::BothTeamsToScore));
        assert_eq!(t.classify("Match Winner"), None);
    }
}
