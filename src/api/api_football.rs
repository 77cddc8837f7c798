use chrono::{DateTime, Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::history::{MatchResult, MAX_MEETINGS, RATINGS_WINDOW};
use crate::models::{ExternalFixture, Injury};

const API_FOOTBALL_BASE_URL: &str = "https://v3.football.api-sports.io";
const API_FOOTBALL_HOST: &str = "v3.football.api-sports.io";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to API-Football failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API-Football returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("API-Football reported errors: {0}")]
    Api(String),
}

/// Envelope every API-Football endpoint responds with
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    errors: Value,
    #[serde(default)]
    response: Vec<Value>,
}

impl ApiResponse {
    /// `errors` is an empty list or object on success
    fn error_message(&self) -> Option<String> {
        let has_errors = match &self.errors {
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            Value::Null => false,
            _ => true,
        };
        has_errors.then(|| self.errors.to_string())
    }
}

pub struct ApiFootballClient {
    api_key: String,
    client: reqwest::Client,
}

impl ApiFootballClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Vec<Value>, ApiError> {
        let url = format!("{}/{}", API_FOOTBALL_BASE_URL, endpoint);

        let response = self
            .client
            .get(&url)
            .header("x-rapidapi-host", API_FOOTBALL_HOST)
            .header("x-rapidapi-key", &self.api_key)
            .query(params)
            .send()
            .await?;

        if let Some(remaining) = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
        {
            debug!("API-Football {}: {} requests remaining", endpoint, remaining);
        }

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        let body: ApiResponse = response.json().await?;
        if let Some(message) = body.error_message() {
            return Err(ApiError::Api(message));
        }
        Ok(body.response)
    }

    /// Raw fixtures on `date`. With league ids, each league is queried for every
    /// plausible season and results are de-duplicated by fixture id; a failing
    /// league is logged and skipped.
    pub async fn fetch_fixtures_by_date(
        &self,
        date: NaiveDate,
        league_ids: &[i64],
    ) -> Result<Vec<Value>, ApiError> {
        let date_param = date.format("%Y-%m-%d").to_string();

        if league_ids.is_empty() {
            return self.get("fixtures", &[("date", date_param)]).await;
        }

        let mut seen = HashSet::new();
        let mut fixtures = Vec::new();
        for season in seasons_for(date) {
            for league in league_ids {
                let params = [
                    ("date", date_param.clone()),
                    ("league", league.to_string()),
                    ("season", season.to_string()),
                ];
                match self.get("fixtures", &params).await {
                    Ok(found) => {
                        for fixture in found {
                            let id = fixture.pointer("/fixture/id").and_then(Value::as_i64);
                            if id.is_some_and(|id| seen.insert(id)) {
                                fixtures.push(fixture);
                            }
                        }
                    }
                    Err(e) => warn!(
                        "Failed to fetch fixtures for league {} season {}: {}",
                        league, season, e
                    ),
                }
            }
        }
        Ok(fixtures)
    }

    /// Raw odds response for a fixture, in the shape the odds extractor reads
    pub async fn fetch_odds(&self, fixture_id: i64) -> Result<Value, ApiError> {
        let response = self
            .get("odds", &[("fixture", fixture_id.to_string())])
            .await?;
        Ok(Value::Array(response))
    }

    pub async fn fetch_injuries(&self, fixture_id: i64) -> Result<Vec<Injury>, ApiError> {
        let response = self
            .get("injuries", &[("fixture", fixture_id.to_string())])
            .await?;
        Ok(parse_injuries(&response))
    }

    /// Most recent meetings between two teams
    pub async fn fetch_h2h(&self, team1_id: i64, team2_id: i64) -> Result<Vec<Value>, ApiError> {
        self.get(
            "fixtures/headtohead",
            &[
                ("h2h", format!("{}-{}", team1_id, team2_id)),
                ("last", MAX_MEETINGS.to_string()),
            ],
        )
        .await
    }

    pub async fn fetch_lineups(&self, fixture_id: i64) -> Result<Vec<Value>, ApiError> {
        self.get("fixtures/lineups", &[("fixture", fixture_id.to_string())])
            .await
    }

    /// A team's latest finished results, most recent first
    pub async fn fetch_team_results(&self, team_id: i64) -> Result<Vec<MatchResult>, ApiError> {
        let response = self
            .get(
                "fixtures",
                &[
                    ("team", team_id.to_string()),
                    ("last", RATINGS_WINDOW.to_string()),
                ],
            )
            .await?;
        Ok(response.iter().filter_map(MatchResult::from_raw).collect())
    }

    /// Fixtures on `date` with odds, injuries, head-to-head and lineups attached.
    /// Only the fixture list itself can fail; a failed sub-request leaves that payload empty.
    pub async fn fetch_external_fixtures(
        &self,
        date: NaiveDate,
        league_ids: &[i64],
    ) -> Result<Vec<ExternalFixture>, ApiError> {
        let raw = self.fetch_fixtures_by_date(date, league_ids).await?;
        let mut fixtures: Vec<ExternalFixture> = raw.iter().filter_map(parse_fixture).collect();
        info!(
            "Fetched {} fixtures for {} ({} unparseable)",
            fixtures.len(),
            date,
            raw.len() - fixtures.len()
        );

        for fixture in fixtures.iter_mut() {
            match self.fetch_odds(fixture.id).await {
                Ok(odds) => fixture.odds_payload = odds,
                Err(e) => warn!("Failed to fetch odds for {}: {}", fixture.label(), e),
            }
            match self.fetch_injuries(fixture.id).await {
                Ok(injuries) => fixture.injuries = injuries,
                Err(e) => warn!("Failed to fetch injuries for {}: {}", fixture.label(), e),
            }
            if let (Some(home), Some(away)) = (fixture.home_id, fixture.away_id) {
                match self.fetch_h2h(home, away).await {
                    Ok(h2h) => fixture.h2h_payload = h2h,
                    Err(e) => warn!("Failed to fetch H2H for {}: {}", fixture.label(), e),
                }
            }
            match self.fetch_lineups(fixture.id).await {
                Ok(lineups) => fixture.lineups = lineups,
                Err(e) => warn!("Failed to fetch lineups for {}: {}", fixture.label(), e),
            }
        }

        Ok(fixtures)
    }
}

/// Seasons a fixture on `date` can belong to. European seasons start in August;
/// earlier in the year both last year's season and calendar-year leagues apply.
pub fn seasons_for(date: NaiveDate) -> Vec<i32> {
    if date.month() >= 8 {
        vec![date.year()]
    } else {
        vec![date.year() - 1, date.year()]
    }
}

/// Build a fixture from the provider's fixture object; sub-payloads start empty
pub fn parse_fixture(raw: &Value) -> Option<ExternalFixture> {
    let text = |path: &str| raw.pointer(path).and_then(Value::as_str);

    let id = raw.pointer("/fixture/id").and_then(Value::as_i64)?;
    let kickoff = DateTime::parse_from_rfc3339(text("/fixture/date")?).ok()?;

    Some(ExternalFixture {
        id,
        home_id: raw.pointer("/teams/home/id").and_then(Value::as_i64),
        away_id: raw.pointer("/teams/away/id").and_then(Value::as_i64),
        home_name: text("/teams/home/name")?.to_string(),
        away_name: text("/teams/away/name")?.to_string(),
        league_name: text("/league/name").unwrap_or_default().to_string(),
        kickoff,
        venue: text("/fixture/venue/name").map(str::to_string),
        odds_payload: Value::Null,
        injuries: Vec::new(),
        h2h_payload: Vec::new(),
        lineups: Vec::new(),
    })
}

/// Player and team names from an injuries response; incomplete entries are skipped
pub fn parse_injuries(response: &[Value]) -> Vec<Injury> {
    response
        .iter()
        .filter_map(|entry| {
            Some(Injury {
                player: entry.pointer("/player/name")?.as_str()?.to_string(),
                team: entry.pointer("/team/name")?.as_str()?.to_string(),
            })
        })
        .collect()
}
