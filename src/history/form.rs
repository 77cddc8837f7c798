use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::team_names::{NameMatcher, DEFAULT_MATCH_THRESHOLD};

/// Matches considered for form
pub const FORM_WINDOW: usize = 5;
/// Matches considered for ratings
pub const RATINGS_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    fn from_goals(scored: u32, conceded: u32) -> Self {
        if scored > conceded {
            Outcome::Win
        } else if scored == conceded {
            Outcome::Draw
        } else {
            Outcome::Loss
        }
    }

    pub fn points(self) -> u32 {
        match self {
            Outcome::Win => 3,
            Outcome::Draw => 1,
            Outcome::Loss => 0,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Outcome::Win => 'W',
            Outcome::Draw => 'D',
            Outcome::Loss => 'L',
        }
    }
}

/// A finished match, parsed from a provider fixture object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub fixture_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub home_id: Option<i64>,
    pub away_id: Option<i64>,
    pub home_name: String,
    pub away_name: String,
    pub home_goals: u32,
    pub away_goals: u32,
}

impl MatchResult {
    /// Parse `{fixture: {id, date}, teams: {home, away}, goals: {home, away}}`.
    /// Fixtures without a final score (not yet played) are skipped.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        let home_goals = raw.pointer("/goals/home")?.as_u64()? as u32;
        let away_goals = raw.pointer("/goals/away")?.as_u64()? as u32;
        let date = raw
            .pointer("/fixture/date")
            .and_then(Value::as_str)
            .and_then(|d| d.get(..10))
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        Some(MatchResult {
            fixture_id: raw.pointer("/fixture/id").and_then(Value::as_i64),
            date,
            home_id: raw.pointer("/teams/home/id").and_then(Value::as_i64),
            away_id: raw.pointer("/teams/away/id").and_then(Value::as_i64),
            home_name: text_at(raw, "/teams/home/name"),
            away_name: text_at(raw, "/teams/away/name"),
            home_goals,
            away_goals,
        })
    }

    /// Whether `team` played at home, by id when both ids are known, else by name
    pub fn is_home(&self, team: &str, team_id: Option<i64>, matcher: &NameMatcher) -> bool {
        match (team_id, self.home_id) {
            (Some(id), Some(home_id)) => id == home_id,
            _ => matcher.is_match(team, &self.home_name, DEFAULT_MATCH_THRESHOLD),
        }
    }

    /// (scored, conceded) from the point of view of the given side
    pub fn goals_for(&self, home: bool) -> (u32, u32) {
        if home {
            (self.home_goals, self.away_goals)
        } else {
            (self.away_goals, self.home_goals)
        }
    }
}

fn text_at(raw: &Value, pointer: &str) -> String {
    raw.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Most recent first; undated results sort last
fn sorted_recent(results: &[MatchResult]) -> Vec<&MatchResult> {
    let mut sorted: Vec<&MatchResult> = results.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "UP",
            Trend::Down => "DOWN",
            Trend::Stable => "STABLE",
        }
    }

    pub fn parse(s: &str) -> Trend {
        match s {
            "UP" => Trend::Up,
            "DOWN" => Trend::Down,
            _ => Trend::Stable,
        }
    }
}

/// Summary of a team's last five results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamForm {
    pub team: String,
    /// Most recent first, e.g. "WWDLW"
    pub form_string: String,
    pub points: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub clean_sheets: u32,
    pub trend: Trend,
    /// 0-100; 50 when stable
    pub trend_strength: f64,
}

impl TeamForm {
    pub fn from_results(
        team: &str,
        team_id: Option<i64>,
        results: &[MatchResult],
        matcher: &NameMatcher,
    ) -> Self {
        let mut outcomes = Vec::with_capacity(FORM_WINDOW);
        let (mut goals_for, mut goals_against, mut clean_sheets) = (0, 0, 0);

        for result in sorted_recent(results).into_iter().take(FORM_WINDOW) {
            let (scored, conceded) = result.goals_for(result.is_home(team, team_id, matcher));
            goals_for += scored;
            goals_against += conceded;
            if conceded == 0 {
                clean_sheets += 1;
            }
            outcomes.push(Outcome::from_goals(scored, conceded));
        }

        let recent: i32 = outcomes.iter().take(3).map(|o| o.points() as i32).sum();
        let older: i32 = outcomes.iter().skip(3).map(|o| o.points() as i32).sum();
        let (trend, trend_strength) = if recent > older + 2 {
            (Trend::Up, (80 + (recent - older) * 5).min(100) as f64)
        } else if recent < older - 2 {
            (Trend::Down, (20 - (older - recent) * 5).max(0) as f64)
        } else {
            (Trend::Stable, 50.0)
        };

        TeamForm {
            team: team.to_string(),
            form_string: outcomes.iter().map(|o| o.letter()).collect(),
            points: outcomes.iter().map(|o| o.points()).sum(),
            goals_for,
            goals_against,
            clean_sheets,
            trend,
            trend_strength,
        }
    }

    /// Percentage-point shift this form implies for the team's win probability
    pub fn probability_shift(&self) -> f64 {
        match self.trend {
            Trend::Up => self.trend_strength / 100.0 * 5.0,
            Trend::Down => -((100.0 - self.trend_strength) / 100.0 * 5.0),
            Trend::Stable => 0.0,
        }
    }
}

/// 0-100 ratings derived from up to ten recent results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRatings {
    pub team: String,
    pub attack: f64,
    pub defense: f64,
    pub form: f64,
    pub home: f64,
    pub away: f64,
    pub consistency: f64,
}

impl TeamRatings {
    pub fn neutral(team: &str) -> Self {
        TeamRatings {
            team: team.to_string(),
            attack: 50.0,
            defense: 50.0,
            form: 50.0,
            home: 50.0,
            away: 50.0,
            consistency: 50.0,
        }
    }

    pub fn from_results(
        team: &str,
        team_id: Option<i64>,
        results: &[MatchResult],
        matcher: &NameMatcher,
    ) -> Self {
        if results.is_empty() {
            return Self::neutral(team);
        }

        let mut scored = Vec::new();
        let mut conceded = Vec::new();
        let mut all = Vec::new();
        let mut home_outcomes = Vec::new();
        let mut away_outcomes = Vec::new();

        for result in sorted_recent(results).into_iter().take(RATINGS_WINDOW) {
            let home = result.is_home(team, team_id, matcher);
            let (s, c) = result.goals_for(home);
            let outcome = Outcome::from_goals(s, c);
            scored.push(s as f64);
            conceded.push(c as f64);
            all.push(outcome);
            if home {
                home_outcomes.push(outcome);
            } else {
                away_outcomes.push(outcome);
            }
        }

        let attack = (mean(&scored) / 2.0 * 100.0).min(100.0);
        let defense = (100.0 - mean(&conceded) / 3.0 * 100.0).max(0.0);
        let form = points_of(&all, FORM_WINDOW) as f64 / 15.0 * 100.0;
        let consistency = if scored.len() > 1 {
            (100.0 - (sample_variance(&scored) + sample_variance(&conceded)) * 20.0).max(0.0)
        } else {
            50.0
        };

        TeamRatings {
            team: team.to_string(),
            attack: round1(attack),
            defense: round1(defense),
            form: round1(form),
            home: round1(venue_rating(&home_outcomes)),
            away: round1(venue_rating(&away_outcomes)),
            consistency: round1(consistency),
        }
    }
}

fn points_of(outcomes: &[Outcome], window: usize) -> u32 {
    outcomes.iter().take(window).map(|o| o.points()).sum()
}

/// Share of available points won in up to five games at one venue; 50 with none
fn venue_rating(outcomes: &[Outcome]) -> f64 {
    if outcomes.is_empty() {
        return 50.0;
    }
    let games = outcomes.len().min(FORM_WINDOW);
    points_of(outcomes, FORM_WINDOW) as f64 / (games * 3) as f64 * 100.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
