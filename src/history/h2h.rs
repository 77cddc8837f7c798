use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::form::MatchResult;
use crate::models::TeamSide;
use crate::utils::team_names::NameMatcher;

/// Meetings summarised into a head-to-head record
pub const MAX_MEETINGS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct H2hMeeting {
    pub date: Option<NaiveDate>,
    pub home: String,
    pub away: String,
    pub score: String,
}

/// Head-to-head summary between two teams, from team1's point of view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct H2hRecord {
    pub team1: String,
    pub team2: String,
    pub total_matches: u32,
    pub team1_wins: u32,
    pub draws: u32,
    pub team2_wins: u32,
    pub team1_goals: u32,
    pub team2_goals: u32,
    pub last_matches: Vec<H2hMeeting>,
}

impl H2hRecord {
    /// Summarise raw provider fixtures between `team1` and `team2`, most recent first.
    /// Only finished meetings count; at most `MAX_MEETINGS` are used.
    pub fn from_raw_matches(
        team1: &str,
        team1_id: Option<i64>,
        team2: &str,
        raw: &[Value],
        matcher: &NameMatcher,
    ) -> Self {
        let mut record = H2hRecord {
            team1: team1.to_string(),
            team2: team2.to_string(),
            ..H2hRecord::default()
        };

        for meeting in raw.iter().filter_map(MatchResult::from_raw).take(MAX_MEETINGS) {
            let team1_home = meeting.is_home(team1, team1_id, matcher);
            let (t1, t2) = meeting.goals_for(team1_home);

            record.total_matches += 1;
            record.team1_goals += t1;
            record.team2_goals += t2;
            if t1 > t2 {
                record.team1_wins += 1;
            } else if t1 < t2 {
                record.team2_wins += 1;
            } else {
                record.draws += 1;
            }

            record.last_matches.push(H2hMeeting {
                date: meeting.date,
                home: meeting.home_name.clone(),
                away: meeting.away_name.clone(),
                score: format!("{}-{}", meeting.home_goals, meeting.away_goals),
            });
        }

        record
    }

    /// Wins for the fixture side, where team1 is the home side
    pub fn wins_for(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Home => self.team1_wins,
            TeamSide::Away => self.team2_wins,
        }
    }

    /// Same record seen from team2's side
    pub fn swapped(&self) -> Self {
        H2hRecord {
            team1: self.team2.clone(),
            team2: self.team1.clone(),
            total_matches: self.total_matches,
            team1_wins: self.team2_wins,
            draws: self.draws,
            team2_wins: self.team1_wins,
            team1_goals: self.team2_goals,
            team2_goals: self.team1_goals,
            last_matches: self.last_matches.clone(),
        }
    }

    pub fn format(&self) -> String {
        format!(
            "{} {}-{}-{} {} (goals {}-{}, {} meetings)",
            self.team1,
            self.team1_wins,
            self.draws,
            self.team2_wins,
            self.team2,
            self.team1_goals,
            self.team2_goals,
            self.total_matches
        )
    }
}
