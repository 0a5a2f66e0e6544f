//! API-Football (API-Sports) v3 integration.
//!
//! API: `https://v3.football.api-sports.io`
//! Auth: `x-apisports-key` header; a static key is the only credential.
//! Endpoints used: `/fixtures` and `/odds` per league+date, plus an
//! optional `/odds/bets` catalog probe for diagnostics.
//!
//! Retries: 429 and 5xx responses back off exponentially (capped), honoring
//! a numeric `Retry-After` header when the server sends one. Anything else
//! fails fast.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::OddsFeed;
use crate::types::{Bookmaker, FixtureMarkets, FixtureOdds, FixtureRecord, SnapError};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const BASE_URL: &str = "https://v3.football.api-sports.io";

/// Retries after the first attempt (4 attempts total).
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (ms).
const BASE_BACKOFF_MS: u64 = 800;

/// Backoff ceiling (ms).
const MAX_BACKOFF_MS: u64 = 10_000;

// ---------------------------------------------------------------------------
// API response types (API-Football JSON → Rust)
// ---------------------------------------------------------------------------

/// Every v3 endpoint wraps its payload in a `response` array.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    response: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct WireFixtureItem {
    fixture: WireFixture,
    league: WireLeague,
    #[serde(default)]
    teams: WireTeams,
}

#[derive(Debug, Deserialize)]
struct WireFixture {
    id: i64,
    /// Kickoff as RFC 3339.
    date: String,
    #[serde(default)]
    status: WireStatus,
}

#[derive(Debug, Default, Deserialize)]
struct WireStatus {
    #[serde(default)]
    short: String,
}

#[derive(Debug, Deserialize)]
struct WireLeague {
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Default, Deserialize)]
struct WireTeams {
    #[serde(default)]
    home: Option<WireTeam>,
    #[serde(default)]
    away: Option<WireTeam>,
}

#[derive(Debug, Deserialize)]
struct WireTeam {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireOddsItem {
    #[serde(default)]
    fixture: WireOddsFixture,
    #[serde(default)]
    bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Default, Deserialize)]
struct WireOddsFixture {
    #[serde(default)]
    id: i64,
}

/// Odds payloads without a fixture id cannot be attached to anything.
fn to_fixture_odds(items: Vec<WireOddsItem>) -> Vec<FixtureOdds> {
    items
        .into_iter()
        .filter(|it| it.fixture.id != 0)
        .map(|it| FixtureOdds {
            fixture_id: it.fixture.id,
            bookmakers: it.bookmakers,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct ApiFootballClient {
    http: Client,
    api_key: String,
    base_url: String,
    season: u16,
    /// Kickoffs are normalized into this offset for the snapshot.
    tz_offset: FixedOffset,
}

impl ApiFootballClient {
    pub fn new(api_key: String, season: u16, tz_offset: FixedOffset) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(25))
            .user_agent("oddsnap/0.1.0")
            .build()
            .context("Failed to build API-Football HTTP client")?;

        Ok(Self {
            http,
            api_key,
            base_url: BASE_URL.to_string(),
            season,
            tz_offset,
        })
    }

    /// GET an endpoint with retry + backoff.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{endpoint}", self.base_url);
        let mut delay = BASE_BACKOFF_MS;
        let mut last_error = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                debug!(attempt, delay_ms = delay, endpoint, "Retrying API-Football request");
                tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
                delay = (delay * 2).min(MAX_BACKOFF_MS);
            }

            let resp = self
                .http
                .get(&url)
                .header("x-apisports-key", &self.api_key)
                .query(params)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return response
                            .json::<T>()
                            .await
                            .with_context(|| format!("Invalid JSON from {endpoint}"));
                    }

                    // Retryable: rate limit or server-side failure.
                    if status.as_u16() == 429 || status.as_u16() >= 500 {
                        if let Some(retry_after) = response
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                        {
                            delay = delay.max(retry_after * 1000).min(MAX_BACKOFF_MS);
                        }
                        let body = response.text().await.unwrap_or_default();
                        warn!(status = %status, attempt, endpoint, "Retryable API-Football error");
                        last_error = Some(format!("HTTP {status}: {}", head(&body)));
                        continue;
                    }

                    let body = response.text().await.unwrap_or_default();
                    return Err(SnapError::Api {
                        endpoint: endpoint.to_string(),
                        message: format!("HTTP {status}: {}", head(&body)),
                    }
                    .into());
                }
                Err(e) => {
                    warn!(attempt, endpoint, error = %e, "API-Football request failed");
                    last_error = Some(format!("request error: {e}"));
                    continue;
                }
            }
        }

        Err(SnapError::Api {
            endpoint: endpoint.to_string(),
            message: format!(
                "failed after {} attempts: {}",
                MAX_RETRIES + 1,
                last_error.unwrap_or_default()
            ),
        }
        .into())
    }

    /// Optional `/odds/bets` probe — names of every market the feed knows.
    /// Purely diagnostic; any failure yields an empty catalog.
    pub async fn bets_catalog(&self) -> Vec<serde_json::Value> {
        match self.get_json::<Envelope<serde_json::Value>>("/odds/bets", &[]).await {
            Ok(env) => env.response,
            Err(e) => {
                warn!(error = %e, "Bets catalog probe failed, continuing without");
                Vec::new()
            }
        }
    }

    fn parse_fixture(&self, item: WireFixtureItem) -> Result<FixtureRecord> {
        let kickoff = DateTime::parse_from_rfc3339(&item.fixture.date)
            .with_context(|| {
                format!(
                    "Unparsable kickoff '{}' for fixture {}",
                    item.fixture.date, item.fixture.id
                )
            })?
            .with_timezone(&self.tz_offset);

        let league = format!("{} {}", item.league.country, item.league.name)
            .trim()
            .to_string();

        Ok(FixtureRecord {
            fixture_id: item.fixture.id,
            kickoff,
            status: item.fixture.status.short,
            league_id: item.league.id,
            league,
            home: item.teams.home.and_then(|t| t.name),
            away: item.teams.away.and_then(|t| t.name),
            markets: FixtureMarkets::default(),
        })
    }
}

#[async_trait]
impl OddsFeed for ApiFootballClient {
    async fn fixtures(&self, league_id: u32, date: NaiveDate) -> Result<Vec<FixtureRecord>> {
        let params = [
            ("league", league_id.to_string()),
            ("season", self.season.to_string()),
            ("date", date.to_string()),
        ];
        let env: Envelope<WireFixtureItem> = self.get_json("/fixtures", &params).await?;
        debug!(league_id, count = env.response.len(), "Fixtures fetched");
        env.response.into_iter().map(|item| self.parse_fixture(item)).collect()
    }

    async fn fixture_odds(&self, league_id: u32, date: NaiveDate) -> Result<Vec<FixtureOdds>> {
        // No bet filter: all markets, so the extractor sees everything.
        let params = [
            ("league", league_id.to_string()),
            ("season", self.season.to_string()),
            ("date", date.to_string()),
        ];
        let env: Envelope<WireOddsItem> = self.get_json("/odds", &params).await?;
        debug!(league_id, count = env.response.len(), "Odds fetched");
        Ok(to_fixture_odds(env.response))
    }
}

/// First part of a response body, for error messages.
fn head(body: &str) -> String {
    body.chars().take(500).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
