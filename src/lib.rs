pub mod api;
pub mod config;
pub mod history;
pub mod models;
pub mod utils;

pub use config::{EngineConfig, Settings};
pub use models::*;
pub use utils::*;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;
use tracing::{info, warn};

use api::ApiFootballClient;
use history::{is_fresh, record_team_results, H2hRecord, HistoryStore};
use utils::accumulator::AccumulatorComposer;
use utils::data::{load_fixtures_from_cache, save_fixtures_to_cache};
use utils::ev_analysis::{top_bets, RecommendationBuilder};
use utils::merger::Merger;
use utils::team_names::NameMatcher;

/// Everything produced for one slate of predictions
#[derive(Debug, Clone)]
pub struct SlateReport<'a> {
    pub records: Vec<MergedRecord<'a>>,
    pub unmatched: Vec<UnmatchedRow>,
    pub analyses: Vec<MatchAnalysis>,
    pub top_bets: Vec<RankedBet>,
    pub accumulators: Vec<AccumulatorSuggestion>,
}

/// Analyze already-merged records and rank the results
pub fn build_report<'a>(
    outcome: MergeOutcome<'a>,
    history: Option<&dyn HistoryStore>,
    config: &EngineConfig,
    legs: usize,
    top_n: usize,
) -> SlateReport<'a> {
    let analyses = RecommendationBuilder::new(*config).analyze_all(&outcome.records, history);
    let top_bets = top_bets(&analyses, top_n, config.accumulator_min_odds);
    let accumulators = AccumulatorComposer::new(*config).compose(&analyses, legs);

    SlateReport {
        records: outcome.records,
        unmatched: outcome.unmatched,
        analyses,
        top_bets,
        accumulators,
    }
}

/// Merge predictions with provider fixtures, then analyze the slate
pub fn analyze_slate<'a>(
    rows: &[PredictionRow],
    fixtures: &'a [ExternalFixture],
    history: Option<&dyn HistoryStore>,
    config: &EngineConfig,
    legs: usize,
    top_n: usize,
) -> SlateReport<'a> {
    let outcome = Merger::default().merge(rows, fixtures);
    build_report(outcome, history, config, legs, top_n)
}

/// Provider fixtures for `date`, from the JSON cache when allowed, otherwise from
/// API-Football. Without an API key the slate runs on model probabilities alone.
pub async fn load_or_fetch_fixtures(
    api_key: Option<&str>,
    date: NaiveDate,
    league_ids: &[i64],
    cache_file: &str,
    use_cache: bool,
) -> Result<Vec<ExternalFixture>> {
    if use_cache && Path::new(cache_file).exists() {
        info!("Loading fixtures from cache file: {}", cache_file);
        return load_fixtures_from_cache(cache_file);
    }

    let Some(api_key) = api_key else {
        warn!("API_FOOTBALL_KEY not set, continuing without provider fixtures");
        return Ok(Vec::new());
    };

    let client = ApiFootballClient::new(api_key.to_string());
    let fixtures = client
        .fetch_external_fixtures(date, league_ids)
        .await
        .context("Failed to fetch fixtures from API-Football")?;

    if let Some(dir) = Path::new(cache_file).parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).context("Failed to create cache directory")?;
    }
    save_fixtures_to_cache(&fixtures, cache_file)?;
    info!("Saved {} fixtures to cache file: {}", fixtures.len(), cache_file);
    Ok(fixtures)
}

/// Store each linked record's head-to-head under the prediction sheet's team names.
/// Returns how many records were written.
pub fn save_h2h_history(store: &dyn HistoryStore, records: &[MergedRecord<'_>]) -> usize {
    let mut saved = 0;
    for record in records {
        let Some(h2h) = &record.h2h else { continue };
        let named = H2hRecord {
            team1: record.row.home.clone(),
            team2: record.row.away.clone(),
            ..h2h.clone()
        };
        match store.save_h2h(&named) {
            Ok(()) => saved += 1,
            Err(e) => warn!("Failed to save H2H for {}: {}", record.row.label(), e),
        }
    }
    saved
}

/// Linked teams (sheet name, provider id) whose cached history needs refetching.
/// With `force` every linked team is returned, otherwise only stale ones.
pub fn teams_to_refresh(
    store: &dyn HistoryStore,
    records: &[MergedRecord<'_>],
    force: bool,
) -> Vec<(String, i64)> {
    let mut teams: Vec<(String, i64)> = Vec::new();
    for record in records {
        let Some(fixture) = record.fixture else { continue };
        let sides = [
            (&record.row.home, fixture.home_id),
            (&record.row.away, fixture.away_id),
        ];
        for (team, team_id) in sides {
            let Some(team_id) = team_id else { continue };
            if teams.iter().any(|(name, _)| name == team) {
                continue;
            }
            if !force && is_fresh(store, team).unwrap_or(false) {
                continue;
            }
            teams.push((team.clone(), team_id));
        }
    }
    teams
}

/// Refresh cached form and ratings for linked teams, all of them when `force` is set.
/// Returns how many teams were refreshed.
pub async fn refresh_team_history(
    client: &ApiFootballClient,
    store: &dyn HistoryStore,
    records: &[MergedRecord<'_>],
    force: bool,
) -> usize {
    let matcher = NameMatcher::new();
    let mut refreshed = 0;

    for (team, team_id) in teams_to_refresh(store, records, force) {
        let results = match client.fetch_team_results(team_id).await {
            Ok(results) => results,
            Err(e) => {
                warn!("Failed to fetch recent results for {}: {}", team, e);
                continue;
            }
        };
        match record_team_results(store, &matcher, &team, Some(team_id), &results) {
            Ok(_) => refreshed += 1,
            Err(e) => warn!("Failed to save history for {}: {}", team, e),
        }
    }

    info!("Refreshed history for {} teams", refreshed);
    refreshed
}
