mod form;
mod h2h;
mod sqlite;

pub use form::{MatchResult, Outcome, TeamForm, TeamRatings, Trend, FORM_WINDOW, RATINGS_WINDOW};
pub use h2h::{H2hMeeting, H2hRecord, MAX_MEETINGS};
pub use sqlite::{CacheStats, SqliteHistory};

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::warn;

use crate::models::HistoricalAdjustment;
use crate::utils::team_names::NameMatcher;

/// Cached data older than this is refreshed
pub const CACHE_EXPIRY_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("history store lock poisoned")]
    Poisoned,
    #[error("failed to encode history data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read/write access to cached team history. Team names are resolved by the store.
pub trait HistoryStore: Send + Sync {
    fn team_form(&self, team: &str) -> Result<Option<TeamForm>, HistoryError>;
    fn team_ratings(&self, team: &str) -> Result<Option<TeamRatings>, HistoryError>;
    /// Head-to-head oriented so that `team1` is `home`
    fn h2h(&self, home: &str, away: &str) -> Result<Option<H2hRecord>, HistoryError>;
    fn team_updated_at(&self, team: &str) -> Result<Option<DateTime<Utc>>, HistoryError>;
    fn save_form(&self, form: &TeamForm) -> Result<(), HistoryError>;
    fn save_ratings(&self, ratings: &TeamRatings) -> Result<(), HistoryError>;
    fn save_h2h(&self, record: &H2hRecord) -> Result<(), HistoryError>;
}

/// Percentage-point adjustments for a fixture from whatever history is cached
pub fn prediction_adjustments(
    store: &dyn HistoryStore,
    home: &str,
    away: &str,
) -> Result<HistoricalAdjustment, HistoryError> {
    let mut adj = HistoricalAdjustment::neutral();

    let home_form = store.team_form(home)?;
    let away_form = store.team_form(away)?;

    if let Some(form) = &home_form {
        adj.home_form_adj = form.probability_shift();
        if form.trend != Trend::Stable {
            adj.insights.push(format!(
                "{} trending {} ({})",
                home,
                form.trend.as_str(),
                form.form_string
            ));
        }
    }
    if let Some(form) = &away_form {
        adj.away_form_adj = form.probability_shift();
        if form.trend != Trend::Stable {
            adj.insights.push(format!(
                "{} trending {} ({})",
                away,
                form.trend.as_str(),
                form.form_string
            ));
        }
    }

    let h2h = store.h2h(home, away)?;
    if let Some(record) = h2h.as_ref().filter(|r| r.total_matches >= 3) {
        let total = record.total_matches as f64;
        let home_pct = record.team1_wins as f64 / total;
        let away_pct = record.team2_wins as f64 / total;

        if home_pct > 0.6 {
            adj.h2h_home_adj = (home_pct - 0.5) * 10.0;
            adj.insights.push(format!(
                "{} dominates H2H: {}-{}-{}",
                home, record.team1_wins, record.draws, record.team2_wins
            ));
        } else if away_pct > 0.6 {
            adj.h2h_away_adj = (away_pct - 0.5) * 10.0;
            adj.insights.push(format!(
                "{} dominates H2H: {}-{}-{}",
                away, record.team2_wins, record.draws, record.team1_wins
            ));
        }
    }

    let home_ratings = store.team_ratings(home)?;
    let away_ratings = store.team_ratings(away)?;

    if let Some(ratings) = home_ratings.as_ref().filter(|r| r.home > 60.0) {
        adj.venue_home_adj = (ratings.home - 50.0) / 50.0 * 3.0;
        adj.insights
            .push(format!("{} strong at home ({:.0}%)", home, ratings.home));
    }
    if let Some(ratings) = away_ratings.as_ref().filter(|r| r.away > 60.0) {
        adj.venue_away_adj = (ratings.away - 50.0) / 50.0 * 3.0;
        adj.insights
            .push(format!("{} strong away ({:.0}%)", away, ratings.away));
    }

    let data_points = [
        home_form.is_some(),
        away_form.is_some(),
        h2h.is_some(),
        home_ratings.is_some(),
        away_ratings.is_some(),
    ]
    .iter()
    .filter(|present| **present)
    .count();
    adj.confidence_boost = data_points as f64 * 2.0;

    Ok(adj)
}

/// Adjustments for a fixture, falling back to neutral when there is no store or it fails
pub fn adjustments_or_neutral(
    store: Option<&dyn HistoryStore>,
    home: &str,
    away: &str,
) -> HistoricalAdjustment {
    let Some(store) = store else {
        return HistoricalAdjustment::neutral();
    };
    match prediction_adjustments(store, home, away) {
        Ok(adj) => adj,
        Err(e) => {
            warn!(
                "History lookup failed for {} vs {}, using neutral adjustments: {}",
                home, away, e
            );
            HistoricalAdjustment::neutral()
        }
    }
}

/// Derive form and ratings from a team's recent results and write both to the store
pub fn record_team_results(
    store: &dyn HistoryStore,
    matcher: &NameMatcher,
    team: &str,
    team_id: Option<i64>,
    results: &[MatchResult],
) -> Result<(TeamForm, TeamRatings), HistoryError> {
    let form = TeamForm::from_results(team, team_id, results, matcher);
    let ratings = TeamRatings::from_results(team, team_id, results, matcher);
    store.save_form(&form)?;
    store.save_ratings(&ratings)?;
    Ok((form, ratings))
}

/// Whether the team's cached form was written within `CACHE_EXPIRY_HOURS`
pub fn is_fresh(store: &dyn HistoryStore, team: &str) -> Result<bool, HistoryError> {
    Ok(store
        .team_updated_at(team)?
        .map(|updated| Utc::now() - updated < Duration::hours(CACHE_EXPIRY_HOURS))
        .unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStore;

    impl HistoryStore for FailingStore {
        fn team_form(&self, _team: &str) -> Result<Option<TeamForm>, HistoryError> {
            Err(HistoryError::Poisoned)
        }
        fn team_ratings(&self, _team: &str) -> Result<Option<TeamRatings>, HistoryError> {
            Err(HistoryError::Poisoned)
        }
        fn h2h(&self, _home: &str, _away: &str) -> Result<Option<H2hRecord>, HistoryError> {
            Err(HistoryError::Poisoned)
        }
        fn team_updated_at(&self, _team: &str) -> Result<Option<DateTime<Utc>>, HistoryError> {
            Err(HistoryError::Poisoned)
        }
        fn save_form(&self, _form: &TeamForm) -> Result<(), HistoryError> {
            Err(HistoryError::Poisoned)
        }
        fn save_ratings(&self, _ratings: &TeamRatings) -> Result<(), HistoryError> {
            Err(HistoryError::Poisoned)
        }
        fn save_h2h(&self, _record: &H2hRecord) -> Result<(), HistoryError> {
            Err(HistoryError::Poisoned)
        }
    }

    fn form(team: &str, trend: Trend, strength: f64) -> TeamForm {
        TeamForm {
            team: team.to_string(),
            form_string: "WWWLL".to_string(),
            points: 9,
            goals_for: 6,
            goals_against: 4,
            clean_sheets: 2,
            trend,
            trend_strength: strength,
        }
    }

    #[test]
    fn test_empty_store_is_neutral() {
        let store = SqliteHistory::open_in_memory().unwrap();
        let adj = prediction_adjustments(&store, "Valletta", "Floriana").unwrap();
        assert_eq!(adj, HistoricalAdjustment::neutral());
    }

    #[test]
    fn test_adjustments_from_history() {
        let store = SqliteHistory::open_in_memory().unwrap();
        store.save_form(&form("Valletta", Trend::Up, 90.0)).unwrap();
        store.save_form(&form("Floriana", Trend::Down, 20.0)).unwrap();
        store
            .save_h2h(&H2hRecord {
                team1: "Valletta".to_string(),
                team2: "Floriana".to_string(),
                total_matches: 5,
                team1_wins: 4,
                draws: 1,
                ..H2hRecord::default()
            })
            .unwrap();
        let mut home_ratings = TeamRatings::neutral("Valletta");
        home_ratings.home = 80.0;
        store.save_ratings(&home_ratings).unwrap();

        let adj = prediction_adjustments(&store, "Valletta", "Floriana").unwrap();
        assert!((adj.home_form_adj - 4.5).abs() < 1e-9);
        assert!((adj.away_form_adj + 4.0).abs() < 1e-9);
        // 4 of 5 -> (0.8 - 0.5) * 10
        assert!((adj.h2h_home_adj - 3.0).abs() < 1e-9);
        assert_eq!(adj.h2h_away_adj, 0.0);
        assert!((adj.venue_home_adj - 1.8).abs() < 1e-9);
        assert_eq!(adj.venue_away_adj, 0.0);
        assert!((adj.total_home_adj() - 9.3).abs() < 1e-9);
        // two forms, h2h, home ratings
        assert_eq!(adj.confidence_boost, 8.0);
        assert_eq!(adj.insights.len(), 4);
    }

    #[test]
    fn test_short_h2h_counts_as_data_only() {
        let store = SqliteHistory::open_in_memory().unwrap();
        store
            .save_h2h(&H2hRecord {
                team1: "Valletta".to_string(),
                team2: "Floriana".to_string(),
                total_matches: 2,
                team1_wins: 2,
                ..H2hRecord::default()
            })
            .unwrap();
        let adj = prediction_adjustments(&store, "Valletta", "Floriana").unwrap();
        assert_eq!(adj.h2h_home_adj, 0.0);
        assert_eq!(adj.confidence_boost, 2.0);
    }

    #[test]
    fn test_failing_store_degrades_to_neutral() {
        assert!(prediction_adjustments(&FailingStore, "A", "B").is_err());
        let adj = adjustments_or_neutral(Some(&FailingStore), "A", "B");
        assert_eq!(adj, HistoricalAdjustment::neutral());
        assert_eq!(
            adjustments_or_neutral(None, "A", "B"),
            HistoricalAdjustment::neutral()
        );
    }

    #[test]
    fn test_record_team_results_and_freshness() {
        let store = SqliteHistory::open_in_memory().unwrap();
        let matcher = NameMatcher::new();
        assert!(!is_fresh(&store, "Valletta").unwrap());

        let results = vec![MatchResult {
            fixture_id: Some(1),
            date: None,
            home_id: Some(10),
            away_id: Some(20),
            home_name: "Valletta".to_string(),
            away_name: "Mosta".to_string(),
            home_goals: 2,
            away_goals: 1,
        }];
        let (form, ratings) =
            record_team_results(&store, &matcher, "Valletta", Some(10), &results).unwrap();
        assert_eq!(form.form_string, "W");
        assert_eq!(ratings.home, 100.0);
        assert_eq!(store.team_form("Valletta").unwrap(), Some(form));
        assert!(is_fresh(&store, "Valletta").unwrap());
    }
}
