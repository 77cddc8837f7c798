use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

use crate::config::EngineConfig;
use crate::models::{AccumulatorKind, AccumulatorLeg, AccumulatorSuggestion, MatchAnalysis};
use crate::utils::ev_calculator::{expected_value, kelly_stake};

/// Builds multi-leg suggestions out of per-match recommendations.
/// Legs are treated as independent events.
#[derive(Debug, Clone, Default)]
pub struct AccumulatorComposer {
    config: EngineConfig,
}

impl AccumulatorComposer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Every recommendation that clears the probability and price floors.
    /// Unpriced picks take their fair price, which must still clear `accumulator_min_odds`.
    pub fn candidate_legs(&self, analyses: &[MatchAnalysis]) -> Vec<AccumulatorLeg> {
        analyses
            .iter()
            .flat_map(|analysis| {
                analysis
                    .recommendations
                    .iter()
                    .map(move |rec| AccumulatorLeg::from_recommendation(analysis, rec))
            })
            .filter(|leg| {
                leg.probability >= self.config.accumulator_min_probability
                    && leg.odds >= self.config.accumulator_min_odds
            })
            .collect()
    }

    /// Safe (highest probability) and value (highest edge, bookmaker-priced only) variants.
    /// A variant is only produced when enough legs qualify.
    pub fn compose(
        &self,
        analyses: &[MatchAnalysis],
        leg_count: usize,
    ) -> Vec<AccumulatorSuggestion> {
        if leg_count == 0 {
            return Vec::new();
        }

        let candidates = self.candidate_legs(analyses);
        let mut suggestions = Vec::new();

        let mut safe = candidates.clone();
        safe.sort_by(by_probability);
        if safe.len() >= leg_count {
            safe.truncate(leg_count);
            suggestions.push(self.suggestion(AccumulatorKind::Safe, safe));
        }

        let mut value: Vec<AccumulatorLeg> = candidates
            .into_iter()
            .filter(|leg| leg.priced_by_bookmaker)
            .collect();
        value.sort_by(|a, b| {
            b.edge
                .partial_cmp(&a.edge)
                .unwrap_or(Ordering::Equal)
                .then_with(|| by_probability(a, b))
        });
        if value.len() >= leg_count {
            value.truncate(leg_count);
            suggestions.push(self.suggestion(AccumulatorKind::Value, value));
        }

        debug!(
            "Composed {} accumulators of {} legs",
            suggestions.len(),
            leg_count
        );
        suggestions
    }

    /// Anchor leg plus the `additional_legs` most likely picks from other matches,
    /// at most one leg per match. `None` if too few matches qualify.
    pub fn build_custom(
        &self,
        anchor: AccumulatorLeg,
        analyses: &[MatchAnalysis],
        additional_legs: usize,
    ) -> Option<AccumulatorSuggestion> {
        let mut best_per_match: HashMap<usize, AccumulatorLeg> = HashMap::new();
        for leg in self.candidate_legs(analyses) {
            if leg.match_index == anchor.match_index {
                continue;
            }
            match best_per_match.get(&leg.match_index) {
                Some(current) if current.probability >= leg.probability => {}
                _ => {
                    best_per_match.insert(leg.match_index, leg);
                }
            }
        }

        let mut extra: Vec<AccumulatorLeg> = best_per_match.into_values().collect();
        extra.sort_by(|a, b| by_probability(a, b).then(a.match_index.cmp(&b.match_index)));
        if extra.len() < additional_legs {
            debug!(
                "Only {} matches available for a custom accumulator, {} requested",
                extra.len(),
                additional_legs
            );
            return None;
        }
        extra.truncate(additional_legs);

        let mut legs = Vec::with_capacity(additional_legs + 1);
        legs.push(anchor);
        legs.extend(extra);
        Some(self.suggestion(AccumulatorKind::Custom, legs))
    }

    fn suggestion(&self, kind: AccumulatorKind, legs: Vec<AccumulatorLeg>) -> AccumulatorSuggestion {
        let combined_probability: f64 = legs.iter().map(|l| l.probability).product();
        let combined_odds: f64 = legs.iter().map(|l| l.odds).product();
        AccumulatorSuggestion {
            kind,
            combined_probability,
            combined_odds,
            expected_value: expected_value(combined_probability, combined_odds),
            kelly_stake: kelly_stake(combined_probability, combined_odds, self.config.kelly_fraction)
                .min(self.config.max_stake),
            legs,
        }
    }
}

fn by_probability(a: &AccumulatorLeg, b: &AccumulatorLeg) -> Ordering {
    b.probability
        .partial_cmp(&a.probability)
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConfidenceTier, Market, Recommendation, RiskTier};

    fn rec(market: Market, probability: f64, odds: Option<f64>) -> Recommendation {
        let implied = odds.map(|o| 1.0 / o);
        Recommendation {
            market,
            model_probability: probability,
            adjusted_probability: probability,
            bookmaker_odds: odds,
            implied_probability: implied,
            edge: implied.map(|i| probability - i).unwrap_or(0.0),
            is_value_bet: false,
            confidence: ConfidenceTier::High,
            risk: RiskTier::Low,
            kelly_stake: 0.0,
            injury_factor: 1.0,
            historical_adjustment: 0.0,
        }
    }

    fn analysis(index: usize, recommendations: Vec<Recommendation>) -> MatchAnalysis {
        MatchAnalysis {
            match_index: index,
            home: format!("Home {}", index),
            away: format!("Away {}", index),
            league: "Premier League".to_string(),
            date: None,
            has_external_data: true,
            provider_fixture: None,
            lineups: 0,
            home_injuries: 0,
            away_injuries: 0,
            confidence_boost: 0.0,
            h2h: None,
            insights: vec![],
            recommendations,
        }
    }

    fn slate() -> Vec<MatchAnalysis> {
        vec![
            // edge 0.8 - 1/1.40 = 0.0857
            analysis(0, vec![rec(Market::HomeWin, 0.80, Some(1.40))]),
            // edge 0.75 - 1/1.50 = 0.0833
            analysis(1, vec![rec(Market::Over(1), 0.75, Some(1.50))]),
            // unpriced: fair odds 1/0.9 = 1.11 is under the floor
            analysis(2, vec![rec(Market::Under(3), 0.90, None)]),
            // unpriced: fair odds 1/0.7 = 1.43
            analysis(3, vec![rec(Market::AwayWin, 0.70, None)]),
            // edges 0.68 - 1/1.60 = 0.055 and 0.66 - 1/1.90 = 0.134
            analysis(
                4,
                vec![
                    rec(Market::HomeWin, 0.68, Some(1.60)),
                    rec(Market::Over(2), 0.66, Some(1.90)),
                ],
            ),
            // below the probability floor
            analysis(5, vec![rec(Market::Draw, 0.50, Some(4.0))]),
        ]
    }

    #[test]
    fn test_candidate_floors() {
        let composer = AccumulatorComposer::default();
        let legs = composer.candidate_legs(&slate());
        let indices: Vec<usize> = legs.iter().map(|l| l.match_index).collect();
        assert_eq!(indices, vec![0, 1, 3, 4, 4]);
        assert!(!legs[2].priced_by_bookmaker);
        assert!((legs[2].odds - 1.0 / 0.70).abs() < 1e-9);
    }

    #[test]
    fn test_compose_safe_and_value() {
        let composer = AccumulatorComposer::default();
        let accas = composer.compose(&slate(), 3);
        assert_eq!(accas.len(), 2);

        let safe = &accas[0];
        assert_eq!(safe.kind, AccumulatorKind::Safe);
        let probs: Vec<f64> = safe.legs.iter().map(|l| l.probability).collect();
        assert_eq!(probs, vec![0.80, 0.75, 0.70]);
        assert!((safe.combined_probability - 0.42).abs() < 1e-9);
        assert!((safe.combined_odds - 1.40 * 1.50 / 0.70).abs() < 1e-9);
        // 0.42 * 3.0 - 1
        assert!((safe.expected_value - 0.26).abs() < 1e-9);
        assert!(safe.kelly_stake > 0.0 && safe.kelly_stake <= 0.05);

        let value = &accas[1];
        assert_eq!(value.kind, AccumulatorKind::Value);
        assert!(value.legs.iter().all(|l| l.priced_by_bookmaker));
        let markets: Vec<(usize, Market)> = value.legs.iter().map(|l| (l.match_index, l.market)).collect();
        assert_eq!(
            markets,
            vec![(4, Market::Over(2)), (0, Market::HomeWin), (1, Market::Over(1))]
        );
    }

    #[test]
    fn test_compose_needs_enough_legs() {
        let composer = AccumulatorComposer::default();
        // four bookmaker-priced candidates, five overall
        let accas = composer.compose(&slate(), 5);
        assert_eq!(accas.len(), 1);
        assert_eq!(accas[0].kind, AccumulatorKind::Safe);
        assert!(composer.compose(&slate(), 6).is_empty());
        assert!(composer.compose(&slate(), 0).is_empty());
    }

    #[test]
    fn test_automatic_composer_allows_same_match_twice() {
        let composer = AccumulatorComposer::default();
        let accas = composer.compose(&slate(), 5);
        let from_match_4 = accas[0].legs.iter().filter(|l| l.match_index == 4).count();
        assert_eq!(from_match_4, 2);
    }

    #[test]
    fn test_build_custom_one_leg_per_match() {
        let composer = AccumulatorComposer::default();
        let analyses = slate();
        let anchor = AccumulatorLeg::from_recommendation(
            &analyses[4],
            &analyses[4].recommendations[1],
        );

        let custom = composer.build_custom(anchor.clone(), &analyses, 2).unwrap();
        assert_eq!(custom.kind, AccumulatorKind::Custom);
        assert_eq!(custom.legs[0], anchor);
        let indices: Vec<usize> = custom.legs.iter().map(|l| l.match_index).collect();
        assert_eq!(indices, vec![4, 0, 1]);
        assert!((custom.combined_probability - 0.66 * 0.80 * 0.75).abs() < 1e-9);

        // matches 0, 1 and 3 qualify besides the anchor's
        assert!(composer.build_custom(anchor.clone(), &analyses, 3).is_some());
        assert!(composer.build_custom(anchor, &analyses, 4).is_none());
    }
}
