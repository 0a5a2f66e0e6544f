//! Per-market-type value selection.
//!
//! Given the winning bookmaker's outcome list, each market type has its own
//! extraction routine: locate the legs it needs, enforce that odds are
//! strictly positive, and parse numeric lines where relevant. A leg that is
//! missing or unusable stays absent — never a zero placeholder.

use anyhow::Result;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{HandicapOdds, OutcomeValue, ThreeWayOdds, TotalsOdds, YesNoOdds};

/// Compiled label/line patterns shared by the extraction routines.
pub struct ValueSelector {
    number: Regex,
    over: Regex,
    under: Regex,
    home_minus_one: Regex,
    away_plus_one: Regex,
}

impl ValueSelector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            number: Regex::new(r"-?\d+(?:\.\d+)?")?,
            over: Regex::new(r"(?i)^over")?,
            under: Regex::new(r"(?i)^under")?,
            home_minus_one: Regex::new(r"(?i)^home\s*-1(?:\.0)?$")?,
            away_plus_one: Regex::new(r"(?i)^away\s*\+1(?:\.0)?$")?,
        })
    }

    // -- Line parsing -----------------------------------------------------

    /// The text a line is parsed from: the dedicated handicap field when it
    /// is non-empty, else the outcome's label.
    fn raw_line_text<'a>(&self, ov: &'a OutcomeValue) -> &'a str {
        match ov.handicap.as_deref() {
            Some(h) if !h.is_empty() => h,
            _ => &ov.value,
        }
    }

    /// First signed-or-unsigned decimal token in the line text, verbatim.
    fn line_token<'a>(&self, ov: &'a OutcomeValue) -> Option<&'a str> {
        self.number.find(self.raw_line_text(ov)).map(|m| m.as_str())
    }

    /// Parsed numeric line. Unparsable text yields `None`, never zero.
    pub fn line_value(&self, ov: &OutcomeValue) -> Option<Decimal> {
        self.line_token(ov).and_then(|t| t.parse().ok())
    }

    // -- Shared leg helpers -----------------------------------------------

    /// First outcome whose label equals one of `labels`
    /// (case-insensitive), taken as a leg if its odd is usable.
    fn leg(&self, values: &[OutcomeValue], labels: &[&str]) -> Option<Decimal> {
        values
            .iter()
            .find(|v| labels.iter().any(|l| v.value.trim().eq_ignore_ascii_case(l)))
            .and_then(OutcomeValue::usable_odd)
    }

    // -- MatchWinner / FirstHalfWinner ------------------------------------

    /// Three-way extraction: Home/1, Draw/X, Away/2. The draw leg also
    /// accepts any label containing "draw" ("Draw No Goal" feeds exist).
    /// At least one present leg is required.
    pub fn three_way(&self, values: &[OutcomeValue], bookmaker: &str) -> Option<ThreeWayOdds> {
        let home = self.leg(values, &["home", "1"]);
        let draw = values
            .iter()
            .find(|v| {
                let label = v.value.trim();
                label.eq_ignore_ascii_case("draw")
                    || label.eq_ignore_ascii_case("x")
                    || label.to_lowercase().contains("draw")
            })
            .and_then(OutcomeValue::usable_odd);
        let away = self.leg(values, &["away", "2"]);

        if home.is_none() && draw.is_none() && away.is_none() {
            return None;
        }
        Some(ThreeWayOdds {
            home,
            draw,
            away,
            bookmaker: bookmaker.to_string(),
        })
    }

    // -- OverUnder ---------------------------------------------------------

    /// Over/Under extraction at `target` (2.5 by default upstream).
    ///
    /// Each direction first tries an exact match — an outcome whose line
    /// text contains the literal target — then falls back to the outcome
    /// whose parsed line is numerically nearest the target (first
    /// encountered breaks distance ties). The emitted `line` string comes
    /// from whichever pick carries a parsed token, else the target literal.
    pub fn totals(
        &self,
        values: &[OutcomeValue],
        target: Decimal,
        bookmaker: &str,
    ) -> Option<TotalsOdds> {
        let target_text = target.to_string();

        let overs: Vec<&OutcomeValue> =
            values.iter().filter(|v| self.over.is_match(v.value.trim())).collect();
        let unders: Vec<&OutcomeValue> =
            values.iter().filter(|v| self.under.is_match(v.value.trim())).collect();

        let over_pick = self.exact_or_nearest(&overs, &target_text, target);
        let under_pick = self.exact_or_nearest(&unders, &target_text, target);

        let over = over_pick.and_then(OutcomeValue::usable_odd);
        let under = under_pick.and_then(OutcomeValue::usable_odd);
        if over.is_none() && under.is_none() {
            return None;
        }

        let line = over_pick
            .and_then(|v| self.line_token(v))
            .or_else(|| under_pick.and_then(|v| self.line_token(v)))
            .map(str::to_string)
            .unwrap_or(target_text);

        Some(TotalsOdds {
            line,
            over,
            under,
            bookmaker: bookmaker.to_string(),
        })
    }

    fn exact_or_nearest<'a>(
        &self,
        candidates: &[&'a OutcomeValue],
        target_text: &str,
        target: Decimal,
    ) -> Option<&'a OutcomeValue> {
        let exact = candidates
            .iter()
            .find(|v| self.raw_line_text(v).contains(target_text))
            .copied();
        exact.or_else(|| self.nearest_to(candidates, target))
    }

    /// The candidate whose parsed line is nearest `target`. Candidates
    /// without a parsable line are skipped; the first-encountered candidate
    /// keeps a tied distance.
    fn nearest_to<'a>(
        &self,
        candidates: &[&'a OutcomeValue],
        target: Decimal,
    ) -> Option<&'a OutcomeValue> {
        let mut best: Option<(&OutcomeValue, Decimal)> = None;
        for v in candidates.iter().copied() {
            let Some(line) = self.line_value(v) else { continue };
            let distance = (line - target).abs();
            if best.map_or(true, |(_, held)| distance < held) {
                best = Some((v, distance));
            }
        }
        best.map(|(v, _)| v)
    }

    // -- BothTeamsToScore --------------------------------------------------

    /// Yes/No extraction; either leg suffices.
    pub fn yes_no(&self, values: &[OutcomeValue], bookmaker: &str) -> Option<YesNoOdds> {
        let yes = self.leg(values, &["yes"]);
        let no = self.leg(values, &["no"]);
        if yes.is_none() && no.is_none() {
            return None;
        }
        Some(YesNoOdds {
            yes,
            no,
            bookmaker: bookmaker.to_string(),
        })
    }

    // -- Handicap ----------------------------------------------------------

    /// Fixed-line handicap: the "Home −1" and "Away +1" legs only. A leg is
    /// a label containing the side with a line parsing to exactly ∓1, or an
    /// exact "Home -1" / "Away +1" label. Either leg suffices.
    pub fn handicap(&self, values: &[OutcomeValue], bookmaker: &str) -> Option<HandicapOdds> {
        let home_minus_one = values
            .iter()
            .find(|v| {
                (v.value.to_lowercase().contains("home") && self.line_value(v) == Some(dec!(-1)))
                    || self.home_minus_one.is_match(v.value.trim())
            })
            .and_then(OutcomeValue::usable_odd);

        let away_plus_one = values
            .iter()
            .find(|v| {
                (v.value.to_lowercase().contains("away") && self.line_value(v) == Some(dec!(1)))
                    || self.away_plus_one.is_match(v.value.trim())
            })
            .and_then(OutcomeValue::usable_odd);

        if home_minus_one.is_none() && away_plus_one.is_none() {
            return None;
        }
        Some(HandicapOdds {
            home_minus_one,
            away_plus_one,
            bookmaker: bookmaker.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
