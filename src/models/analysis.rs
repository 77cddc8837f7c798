use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::market::{Market, TeamSide};
use crate::history::H2hRecord;

/// Confidence tier for a pick, derived from its adjusted probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConfidenceTier::High => "HIGH",
            ConfidenceTier::Medium => "MEDIUM",
            ConfidenceTier::Low => "LOW",
        };
        write!(f, "{}", s)
    }
}

/// Risk tier for a pick, derived from its final probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        };
        write!(f, "{}", s)
    }
}

/// Probability adjustments (in percentage points) derived from cached team history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalAdjustment {
    pub home_form_adj: f64,
    pub away_form_adj: f64,
    pub h2h_home_adj: f64,
    pub h2h_away_adj: f64,
    pub venue_home_adj: f64,
    pub venue_away_adj: f64,
    pub confidence_boost: f64,
    pub insights: Vec<String>,
}

impl HistoricalAdjustment {
    /// No history available: every adjustment is zero
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn total_home_adj(&self) -> f64 {
        self.home_form_adj + self.h2h_home_adj + self.venue_home_adj
    }

    pub fn total_away_adj(&self) -> f64 {
        self.away_form_adj + self.h2h_away_adj + self.venue_away_adj
    }

    /// Adjustment for a market's side; neutral markets get none
    pub fn total_for(&self, side: Option<TeamSide>) -> f64 {
        match side {
            Some(TeamSide::Home) => self.total_home_adj(),
            Some(TeamSide::Away) => self.total_away_adj(),
            None => 0.0,
        }
    }
}

/// A priced and tiered pick for one market of one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub market: Market,
    pub model_probability: f64,
    pub adjusted_probability: f64,
    pub bookmaker_odds: Option<f64>,
    pub implied_probability: Option<f64>,
    pub edge: f64,
    pub is_value_bet: bool,
    pub confidence: ConfidenceTier,
    pub risk: RiskTier,
    pub kelly_stake: f64,
    pub injury_factor: f64,
    /// Percentage points applied from team history
    pub historical_adjustment: f64,
}

impl Recommendation {
    pub fn format(&self) -> String {
        let odds = self
            .bookmaker_odds
            .map(|o| format!("{:.2}", o))
            .unwrap_or_else(|| "n/a".to_string());
        let value = if self.is_value_bet { " VALUE" } else { "" };
        format!(
            "{:<22} | Model: {:.1}% | Adjusted: {:.1}% | Odds: {} | Edge: {:+.2}% | Kelly: {:.2}% | {} / risk {}{}",
            self.market.label(),
            self.model_probability * 100.0,
            self.adjusted_probability * 100.0,
            odds,
            self.edge * 100.0,
            self.kelly_stake * 100.0,
            self.confidence,
            self.risk,
            value
        )
    }
}

/// Everything the engine concluded about one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchAnalysis {
    pub match_index: usize,
    pub home: String,
    pub away: String,
    pub league: String,
    pub date: Option<NaiveDateTime>,
    pub has_external_data: bool,
    /// Provider's spelling of the fixture, when linked
    pub provider_fixture: Option<String>,
    /// Lineups published by the provider (0 until announced)
    pub lineups: usize,
    pub home_injuries: usize,
    pub away_injuries: usize,
    pub confidence_boost: f64,
    pub h2h: Option<H2hRecord>,
    pub insights: Vec<String>,
    /// Sorted by edge, then adjusted probability, both descending
    pub recommendations: Vec<Recommendation>,
}

impl MatchAnalysis {
    pub fn label(&self) -> String {
        format!("{} vs {}", self.home, self.away)
    }

    /// Highest-ranked recommendation, if any survived the filter
    pub fn top_pick(&self) -> Option<&Recommendation> {
        self.recommendations.first()
    }

    pub fn format(&self) -> String {
        let date = self
            .date
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "TBD".to_string());
        let mut out = format!("{} | {} | {}", self.label(), self.league, date);
        if self.has_external_data {
            if let Some(provider) = &self.provider_fixture {
                out.push_str(&format!(" | provider: {}", provider));
            }
            out.push_str(&format!(
                " | injuries {}/{}",
                self.home_injuries, self.away_injuries
            ));
            if self.lineups > 0 {
                out.push_str(&format!(" | lineups {}", self.lineups));
            }
        } else {
            out.push_str(" | no provider data");
        }
        if let Some(h2h) = &self.h2h {
            out.push_str(&format!("\n    H2H: {}", h2h.format()));
        }
        for insight in &self.insights {
            out.push_str(&format!("\n    * {}", insight));
        }
        for rec in &self.recommendations {
            out.push_str(&format!("\n    {}", rec.format()));
        }
        out
    }
}

/// A recommendation lifted out of its match for cross-match ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedBet {
    pub match_index: usize,
    pub match_label: String,
    pub league: String,
    pub date: Option<NaiveDateTime>,
    pub recommendation: Recommendation,
}

impl RankedBet {
    pub fn format(&self) -> String {
        let rec = &self.recommendation;
        format!(
            "{} ({}) | Bet: {} @ {:.2} | Edge: {:+.2}% | Model: {:.1}% | Implied: {:.1}% | {}",
            self.match_label,
            self.league,
            rec.market.label(),
            rec.bookmaker_odds.unwrap_or_default(),
            rec.edge * 100.0,
            rec.adjusted_probability * 100.0,
            rec.implied_probability.unwrap_or_default() * 100.0,
            rec.confidence
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccumulatorKind {
    Safe,
    Value,
    Custom,
}

impl fmt::Display for AccumulatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccumulatorKind::Safe => "SAFE",
            AccumulatorKind::Value => "VALUE",
            AccumulatorKind::Custom => "CUSTOM",
        };
        write!(f, "{}", s)
    }
}

/// One selection inside an accumulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulatorLeg {
    pub match_index: usize,
    pub match_label: String,
    pub league: String,
    pub market: Market,
    pub probability: f64,
    /// Bookmaker price when one exists, otherwise the fair price 1/probability
    pub odds: f64,
    pub priced_by_bookmaker: bool,
    pub edge: f64,
}

impl AccumulatorLeg {
    pub fn from_recommendation(analysis: &MatchAnalysis, rec: &Recommendation) -> Self {
        let (odds, priced_by_bookmaker) = match rec.bookmaker_odds {
            Some(o) => (o, true),
            None => (1.0 / rec.adjusted_probability, false),
        };
        AccumulatorLeg {
            match_index: analysis.match_index,
            match_label: analysis.label(),
            league: analysis.league.clone(),
            market: rec.market,
            probability: rec.adjusted_probability,
            odds,
            priced_by_bookmaker,
            edge: rec.edge,
        }
    }

    pub fn format(&self) -> String {
        let price_note = if self.priced_by_bookmaker { "" } else { " (fair)" };
        format!(
            "{} | {} @ {:.2}{} | {:.1}%",
            self.match_label,
            self.market.label(),
            self.odds,
            price_note,
            self.probability * 100.0
        )
    }
}

/// A multi-leg bet: every leg must win
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulatorSuggestion {
    pub kind: AccumulatorKind,
    pub legs: Vec<AccumulatorLeg>,
    pub combined_probability: f64,
    pub combined_odds: f64,
    /// Expected profit per unit staked
    pub expected_value: f64,
    pub kelly_stake: f64,
}

impl AccumulatorSuggestion {
    pub fn format(&self) -> String {
        let mut out = format!(
            "{} {}-fold | Odds: {:.2} | Probability: {:.1}% | EV: {:+.2}% | Kelly: {:.2}%",
            self.kind,
            self.legs.len(),
            self.combined_odds,
            self.combined_probability * 100.0,
            self.expected_value * 100.0,
            self.kelly_stake * 100.0
        );
        for (i, leg) in self.legs.iter().enumerate() {
            out.push_str(&format!("\n    {}. {}", i + 1, leg.format()));
        }
        out
    }
}
