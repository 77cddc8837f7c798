use rayon::prelude::*;
use std::cmp::Ordering;
use tracing::debug;

use crate::config::EngineConfig;
use crate::history::{adjustments_or_neutral, HistoryStore};
use crate::models::{
    HistoricalAdjustment, Market, MatchAnalysis, MergedRecord, RankedBet, Recommendation, TeamSide,
};
use crate::utils::ev_calculator::{
    confidence_tier, fair_odds, h2h_boost, implied_probability, injury_factor, is_value_bet,
    kelly_stake, risk_tier,
};

/// Turns merged records into tiered, staked recommendations
#[derive(Debug, Clone, Default)]
pub struct RecommendationBuilder {
    config: EngineConfig,
}

impl RecommendationBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Evaluate every supported market the model priced, sorted by edge then probability.
    /// Weak picks that are not value bets are dropped.
    pub fn evaluate(
        &self,
        record: &MergedRecord<'_>,
        adjustment: &HistoricalAdjustment,
    ) -> Vec<Recommendation> {
        let boost = adjustment.confidence_boost / 100.0;

        let mut recommendations: Vec<Recommendation> = Market::EVALUATED
            .iter()
            .filter_map(|&market| {
                let model = record.row.probability(market)?;
                let side = market.side();
                let historical = adjustment.total_for(side) / 100.0;
                let adjusted_model = (model + historical).clamp(0.01, 0.99);

                let odds = record.odds.get(market);
                let implied = odds.and_then(implied_probability);
                let (value, edge) =
                    is_value_bet(Some(adjusted_model), implied, self.config.value_threshold);

                let injury = side
                    .map(|s| injury_factor(record.injuries.count(s)))
                    .unwrap_or(1.0);
                let (confidence, adjusted) = confidence_tier(adjusted_model, injury);
                let adjusted = (adjusted + boost).clamp(0.01, 0.99);

                let kelly = odds
                    .or_else(|| fair_odds(model))
                    .map(|o| kelly_stake(adjusted, o, self.config.kelly_fraction))
                    .unwrap_or(0.0)
                    .min(self.config.max_stake);

                if adjusted < self.config.min_recommend_probability && !value {
                    debug!(
                        "Dropping {} for {}: {:.1}% and no value",
                        market.label(),
                        record.row.label(),
                        adjusted * 100.0
                    );
                    return None;
                }

                Some(Recommendation {
                    market,
                    model_probability: model,
                    adjusted_probability: adjusted,
                    bookmaker_odds: odds,
                    implied_probability: implied,
                    edge,
                    is_value_bet: value,
                    confidence,
                    risk: risk_tier(adjusted),
                    kelly_stake: kelly,
                    injury_factor: injury,
                    historical_adjustment: historical * 100.0,
                })
            })
            .collect();

        recommendations.sort_by(by_edge_then_probability);
        recommendations
    }

    /// Full analysis of one record, pulling adjustments from `history` when available
    pub fn analyze(
        &self,
        record: &MergedRecord<'_>,
        history: Option<&dyn HistoryStore>,
    ) -> MatchAnalysis {
        let row = &record.row;
        let adjustment = adjustments_or_neutral(history, &row.home, &row.away);
        let recommendations = self.evaluate(record, &adjustment);

        let mut insights = adjustment.insights.clone();
        if let Some(h2h) = &record.h2h {
            for (side, team) in [(TeamSide::Home, &row.home), (TeamSide::Away, &row.away)] {
                let boost = h2h_boost(h2h, side);
                if boost > 1.0 {
                    insights.push(format!(
                        "{} won {} of the last {} meetings (x{:.2})",
                        team,
                        h2h.wins_for(side),
                        h2h.total_matches,
                        boost
                    ));
                }
            }
        }

        let league = if row.league.is_empty() || row.league == "Unknown" {
            record.api_league().unwrap_or(&row.league).to_string()
        } else {
            row.league.clone()
        };

        MatchAnalysis {
            match_index: record.link.internal_ref,
            home: row.home.clone(),
            away: row.away.clone(),
            league,
            date: record
                .fixture
                .map(|f| f.kickoff.naive_local())
                .or(row.date),
            has_external_data: record.has_external_data(),
            provider_fixture: record
                .api_home()
                .zip(record.api_away())
                .map(|(home, away)| format!("{} vs {}", home, away)),
            lineups: record.lineups().len(),
            home_injuries: record.injuries.count(TeamSide::Home),
            away_injuries: record.injuries.count(TeamSide::Away),
            confidence_boost: adjustment.confidence_boost,
            h2h: record.h2h.clone(),
            insights,
            recommendations,
        }
    }

    /// Analyze every record in parallel, keeping input order
    pub fn analyze_all(
        &self,
        records: &[MergedRecord<'_>],
        history: Option<&dyn HistoryStore>,
    ) -> Vec<MatchAnalysis> {
        records
            .par_iter()
            .map(|record| self.analyze(record, history))
            .collect()
    }
}

fn by_edge_then_probability(a: &Recommendation, b: &Recommendation) -> Ordering {
    b.edge
        .partial_cmp(&a.edge)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            b.adjusted_probability
                .partial_cmp(&a.adjusted_probability)
                .unwrap_or(Ordering::Equal)
        })
}

/// Best priced bets across all matches. Bets without odds, or priced below `min_odds`, are skipped.
pub fn top_bets(analyses: &[MatchAnalysis], top_n: usize, min_odds: f64) -> Vec<RankedBet> {
    let mut bets: Vec<RankedBet> = analyses
        .iter()
        .flat_map(|analysis| {
            analysis
                .recommendations
                .iter()
                .filter(|rec| rec.bookmaker_odds.is_some_and(|o| o >= min_odds))
                .map(move |rec| RankedBet {
                    match_index: analysis.match_index,
                    match_label: analysis.label(),
                    league: analysis.league.clone(),
                    date: analysis.date,
                    recommendation: rec.clone(),
                })
        })
        .collect();

    bets.sort_by(|a, b| by_edge_then_probability(&a.recommendation, &b.recommendation));
    bets.truncate(top_n);
    bets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{H2hRecord, SqliteHistory, TeamForm, Trend};
    use crate::models::{BookmakerOdds, ConfidenceTier, Injury, PredictionRow, RiskTier};
    use std::collections::BTreeMap;

    fn row(probabilities: &[(Market, f64)]) -> PredictionRow {
        PredictionRow {
            home: "Valletta".to_string(),
            away: "Floriana".to_string(),
            league: "Premier League".to_string(),
            date: None,
            probabilities: probabilities.iter().copied().collect::<BTreeMap<_, _>>(),
        }
    }

    fn record(probabilities: &[(Market, f64)], odds: &[(Market, f64)]) -> MergedRecord<'static> {
        let mut record = MergedRecord::unlinked(0, &row(probabilities));
        let mut book = BookmakerOdds::default();
        for &(market, price) in odds {
            book.insert(market, price);
        }
        record.odds = book;
        record
    }

    #[test]
    fn test_filter_keeps_value_and_drops_weak() {
        let builder = RecommendationBuilder::default();
        // draw 0.50 at 2.50 (implied 0.40) is value; over 2.5 at 0.50 with no odds is not
        let rec = record(
            &[(Market::Draw, 0.50), (Market::Over(2), 0.50)],
            &[(Market::Draw, 2.50)],
        );
        let recs = builder.evaluate(&rec, &HistoricalAdjustment::neutral());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].market, Market::Draw);
        assert!(recs[0].is_value_bet);
        assert!((recs[0].edge - 0.10).abs() < 1e-9);
        assert_eq!(recs[0].risk, RiskTier::High);
    }

    #[test]
    fn test_ordering_by_edge_first() {
        let builder = RecommendationBuilder::default();
        // home: 0.58 vs 0.50 implied -> edge 0.08; over 1.5: 0.85 vs 0.80 -> edge 0.05
        let rec = record(
            &[(Market::HomeWin, 0.58), (Market::Over(1), 0.85)],
            &[(Market::HomeWin, 2.0), (Market::Over(1), 1.25)],
        );
        let recs = builder.evaluate(&rec, &HistoricalAdjustment::neutral());
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].market, Market::HomeWin);
        assert!((recs[0].edge - 0.08).abs() < 1e-9);
        assert_eq!(recs[1].market, Market::Over(1));
        assert!((recs[1].edge - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_equal_edges_break_on_probability() {
        let builder = RecommendationBuilder::default();
        let rec = record(&[(Market::HomeWin, 0.60), (Market::Under(3), 0.75)], &[]);
        let recs = builder.evaluate(&rec, &HistoricalAdjustment::neutral());
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].market, Market::Under(3));
        assert_eq!(recs[0].edge, 0.0);
    }

    #[test]
    fn test_kelly_falls_back_to_fair_odds() {
        let builder = RecommendationBuilder::default();
        // boost 10 points lifts 0.60 to 0.70 against fair odds 1/0.60
        let adjustment = HistoricalAdjustment {
            confidence_boost: 10.0,
            ..HistoricalAdjustment::neutral()
        };
        let rec = record(&[(Market::Under(2), 0.60)], &[]);
        let recs = builder.evaluate(&rec, &adjustment);
        assert_eq!(recs.len(), 1);
        let r = &recs[0];
        assert_eq!(r.bookmaker_odds, None);
        assert_eq!(r.implied_probability, None);
        assert!(!r.is_value_bet);
        assert!((r.adjusted_probability - 0.70).abs() < 1e-9);
        // b = 2/3, full = (2/3*0.7 - 0.3)/(2/3) = 0.25, quarter = 0.0625 -> capped
        assert!((r.kelly_stake - 0.05).abs() < 1e-9);
        assert_eq!(r.confidence, ConfidenceTier::Medium);
        assert_eq!(r.risk, RiskTier::Low);
    }

    #[test]
    fn test_history_and_injuries_hit_the_right_side() {
        let builder = RecommendationBuilder::default();
        let mut rec = record(
            &[(Market::HomeWin, 0.60), (Market::AwayWin, 0.60), (Market::Draw, 0.60)],
            &[],
        );
        rec.injuries.away = vec![
            Injury { player: "A".to_string(), team: "Floriana".to_string() },
            Injury { player: "B".to_string(), team: "Floriana".to_string() },
        ];
        let adjustment = HistoricalAdjustment {
            home_form_adj: 5.0,
            ..HistoricalAdjustment::neutral()
        };
        let recs = builder.evaluate(&rec, &adjustment);

        let home = recs.iter().find(|r| r.market == Market::HomeWin).unwrap();
        assert!((home.adjusted_probability - 0.65).abs() < 1e-9);
        assert!((home.historical_adjustment - 5.0).abs() < 1e-9);

        let draw = recs.iter().find(|r| r.market == Market::Draw).unwrap();
        assert!((draw.adjusted_probability - 0.60).abs() < 1e-9);
        assert_eq!(draw.historical_adjustment, 0.0);

        // 0.60 * 0.90 = 0.54 and no value: dropped
        assert!(recs.iter().all(|r| r.market != Market::AwayWin));
    }

    #[test]
    fn test_max_stake_config_caps_kelly() {
        let builder = RecommendationBuilder::new(EngineConfig {
            max_stake: 0.02,
            ..EngineConfig::default()
        });
        let rec = record(&[(Market::HomeWin, 0.65)], &[(Market::HomeWin, 1.80)]);
        let recs = builder.evaluate(&rec, &HistoricalAdjustment::neutral());
        assert!((recs[0].kelly_stake - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_analyze_uses_history_and_h2h() {
        let store = SqliteHistory::open_in_memory().unwrap();
        store
            .save_form(&TeamForm {
                team: "Valletta".to_string(),
                form_string: "WWWWW".to_string(),
                points: 15,
                goals_for: 12,
                goals_against: 2,
                clean_sheets: 3,
                trend: Trend::Up,
                trend_strength: 100.0,
            })
            .unwrap();

        let mut rec = record(&[(Market::HomeWin, 0.60)], &[(Market::HomeWin, 2.0)]);
        rec.h2h = Some(H2hRecord {
            team1: "Valletta".to_string(),
            team2: "Floriana".to_string(),
            total_matches: 4,
            team1_wins: 3,
            draws: 1,
            ..H2hRecord::default()
        });

        let builder = RecommendationBuilder::default();
        let analysis = builder.analyze(&rec, Some(&store));
        assert_eq!(analysis.confidence_boost, 2.0);
        assert_eq!(analysis.insights.len(), 2);
        assert!(analysis.insights[1].contains("x1.12"));

        let pick = analysis.top_pick().unwrap();
        // 0.60 + 5 points form, then +2 points confidence
        assert!((pick.adjusted_probability - 0.67).abs() < 1e-9);
        assert!((pick.edge - 0.15).abs() < 1e-9);

        let without = builder.analyze(&rec, None);
        assert_eq!(without.confidence_boost, 0.0);
        assert!((without.top_pick().unwrap().edge - 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_top_bets_filters_and_ranks() {
        let builder = RecommendationBuilder::default();
        let records = vec![
            record(&[(Market::HomeWin, 0.58)], &[(Market::HomeWin, 2.0)]),
            record(&[(Market::HomeWin, 0.90), (Market::Over(2), 0.70)], &[(Market::HomeWin, 1.20)]),
            record(&[(Market::AwayWin, 0.60)], &[(Market::AwayWin, 1.80)]),
        ];
        let analyses = builder.analyze_all(&records, None);
        assert_eq!(analyses.len(), 3);

        let bets = top_bets(&analyses, 10, 1.3);
        // odds 1.20 and unpriced picks are skipped
        assert_eq!(bets.len(), 2);
        assert_eq!(bets[0].recommendation.market, Market::HomeWin);
        assert!((bets[0].recommendation.edge - 0.08).abs() < 1e-9);
        assert_eq!(bets[1].recommendation.market, Market::AwayWin);

        assert_eq!(top_bets(&analyses, 1, 1.3).len(), 1);
    }
}
