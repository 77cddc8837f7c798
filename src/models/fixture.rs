use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::market::{BookmakerOdds, Market, TeamSide};
use crate::history::H2hRecord;

/// One row of the predictions sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    pub home: String,
    pub away: String,
    pub league: String,
    pub date: Option<NaiveDateTime>,
    /// Model probabilities in [0, 1], keyed by market
    pub probabilities: BTreeMap<Market, f64>,
}

impl PredictionRow {
    pub fn probability(&self, market: Market) -> Option<f64> {
        self.probabilities.get(&market).copied()
    }

    pub fn label(&self) -> String {
        format!("{} vs {}", self.home, self.away)
    }
}

/// A player listed as unavailable for a fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Injury {
    pub player: String,
    pub team: String,
}

/// A fixture as returned by the data provider, with its raw sub-payloads attached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalFixture {
    pub id: i64,
    pub home_id: Option<i64>,
    pub away_id: Option<i64>,
    pub home_name: String,
    pub away_name: String,
    pub league_name: String,
    pub kickoff: DateTime<FixedOffset>,
    pub venue: Option<String>,
    /// Raw odds response, consumed by the odds extractor
    #[serde(default)]
    pub odds_payload: serde_json::Value,
    #[serde(default)]
    pub injuries: Vec<Injury>,
    /// Raw head-to-head fixtures, most recent first
    #[serde(default)]
    pub h2h_payload: Vec<serde_json::Value>,
    #[serde(default)]
    pub lineups: Vec<serde_json::Value>,
}

impl ExternalFixture {
    pub fn label(&self) -> String {
        format!("{} vs {}", self.home_name, self.away_name)
    }
}

/// Result of linking one prediction row against the provider fixtures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchLink {
    /// Index of the prediction row
    pub internal_ref: usize,
    /// Index of the linked fixture in the candidate list, if any
    pub external_ref: Option<usize>,
    pub match_score: f64,
}

impl MatchLink {
    pub fn unlinked(internal_ref: usize) -> Self {
        MatchLink {
            internal_ref,
            external_ref: None,
            match_score: 0.0,
        }
    }
}

/// Injuries split by the side of the fixture they belong to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideInjuries {
    pub home: Vec<Injury>,
    pub away: Vec<Injury>,
}

impl SideInjuries {
    pub fn count(&self, side: TeamSide) -> usize {
        match side {
            TeamSide::Home => self.home.len(),
            TeamSide::Away => self.away.len(),
        }
    }
}

/// A prediction row enriched with whatever the linked fixture could provide
#[derive(Debug, Clone)]
pub struct MergedRecord<'a> {
    pub row: PredictionRow,
    pub link: MatchLink,
    pub fixture: Option<&'a ExternalFixture>,
    pub odds: BookmakerOdds,
    pub injuries: SideInjuries,
    pub h2h: Option<H2hRecord>,
}

impl<'a> MergedRecord<'a> {
    /// Record for a row that could not be linked: no odds, injuries or head-to-head
    pub fn unlinked(index: usize, row: &PredictionRow) -> Self {
        MergedRecord {
            row: row.clone(),
            link: MatchLink::unlinked(index),
            fixture: None,
            odds: BookmakerOdds::default(),
            injuries: SideInjuries::default(),
            h2h: None,
        }
    }

    pub fn has_external_data(&self) -> bool {
        self.fixture.is_some()
    }

    pub fn api_home(&self) -> Option<&str> {
        self.fixture.map(|f| f.home_name.as_str())
    }

    pub fn api_away(&self) -> Option<&str> {
        self.fixture.map(|f| f.away_name.as_str())
    }

    pub fn api_league(&self) -> Option<&str> {
        self.fixture.map(|f| f.league_name.as_str())
    }

    pub fn h2h_raw(&self) -> &[serde_json::Value] {
        self.fixture.map(|f| f.h2h_payload.as_slice()).unwrap_or(&[])
    }

    pub fn lineups(&self) -> &[serde_json::Value] {
        self.fixture.map(|f| f.lineups.as_slice()).unwrap_or(&[])
    }
}

/// A prediction row that found no fixture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedRow {
    pub index: usize,
    pub home: String,
    pub away: String,
    pub league: String,
    pub date: Option<NaiveDateTime>,
}

impl UnmatchedRow {
    pub fn format(&self) -> String {
        let date = self
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "no date".to_string());
        format!("{} vs {} ({}, {})", self.home, self.away, self.league, date)
    }
}

impl From<&MergedRecord<'_>> for UnmatchedRow {
    fn from(record: &MergedRecord<'_>) -> Self {
        UnmatchedRow {
            index: record.link.internal_ref,
            home: record.row.home.clone(),
            away: record.row.away.clone(),
            league: record.row.league.clone(),
            date: record.row.date,
        }
    }
}

/// Output of a merge: one record per input row, in input order, plus the rows left unmatched
#[derive(Debug, Clone)]
pub struct MergeOutcome<'a> {
    pub records: Vec<MergedRecord<'a>>,
    pub unmatched: Vec<UnmatchedRow>,
}
