use crate::models::{ExternalFixture, MatchLink, PredictionRow};
use crate::utils::team_names::NameMatcher;
use tracing::debug;

/// Either team scoring below this rejects the candidate outright
pub const MIN_SIDE_SCORE: f64 = 0.45;
/// Candidates further apart than this many calendar days are rejected
pub const MAX_DAY_GAP: i64 = 3;
/// A link is only accepted above this total score
pub const MIN_LINK_SCORE: f64 = 0.55;

const TEAM_WEIGHT: f64 = 0.85;
const DATE_WEIGHT: f64 = 0.15;

/// Score for the calendar-day distance between sheet date and kickoff.
/// `None` gap means one side has no date, which scores as a perfect match.
pub fn date_score(day_gap: Option<i64>) -> Option<f64> {
    match day_gap.map(i64::abs) {
        None | Some(0) => Some(1.0),
        Some(1) => Some(0.9),
        Some(2) => Some(0.8),
        Some(3) => Some(0.7),
        Some(_) => None,
    }
}

/// Combine per-side name scores and the date gap into a total, or `None` if a gate rejects it
pub fn combine_scores(home_score: f64, away_score: f64, day_gap: Option<i64>) -> Option<f64> {
    if home_score < MIN_SIDE_SCORE || away_score < MIN_SIDE_SCORE {
        return None;
    }
    let team_score = (home_score + away_score) / 2.0;
    let date = date_score(day_gap)?;
    Some(team_score * TEAM_WEIGHT + date * DATE_WEIGHT)
}

/// Picks the provider fixture that best corresponds to a prediction row
#[derive(Debug, Clone, Default)]
pub struct FixtureLinker {
    matcher: NameMatcher,
}

impl FixtureLinker {
    pub fn new(matcher: NameMatcher) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &NameMatcher {
        &self.matcher
    }

    /// Link one row against every candidate, keeping the highest-scoring one above
    /// `MIN_LINK_SCORE`. Ties keep the earlier candidate.
    pub fn link(
        &self,
        internal_ref: usize,
        row: &PredictionRow,
        candidates: &[ExternalFixture],
    ) -> MatchLink {
        let mut best = MatchLink::unlinked(internal_ref);

        for (index, fixture) in candidates.iter().enumerate() {
            let Some(total) = self.score(row, fixture) else {
                continue;
            };
            if total > MIN_LINK_SCORE && total > best.match_score {
                best.external_ref = Some(index);
                best.match_score = total;
            }
        }

        match best.external_ref {
            Some(index) => debug!(
                "Linked {} to fixture {} ({}) with score {:.3}",
                row.label(),
                candidates[index].id,
                candidates[index].label(),
                best.match_score
            ),
            None => debug!("No fixture found for {}", row.label()),
        }

        best
    }

    fn score(&self, row: &PredictionRow, fixture: &ExternalFixture) -> Option<f64> {
        let home_score = self.matcher.similarity(&row.home, &fixture.home_name);
        let away_score = self.matcher.similarity(&row.away, &fixture.away_name);
        let day_gap = row
            .date
            .map(|d| (d.date() - fixture.kickoff.date_naive()).num_days());
        combine_scores(home_score, away_score, day_gap)
    }
}
