use crate::history::H2hRecord;
use crate::models::{ConfidenceTier, RiskTier, TeamSide};

/// Hard ceiling on any Kelly stake, as a fraction of bankroll
pub const MAX_KELLY_STAKE: f64 = 0.05;
/// Default edge a pick needs before it counts as a value bet
pub const DEFAULT_VALUE_THRESHOLD: f64 = 0.05;
/// Default fraction of full Kelly to stake
pub const DEFAULT_KELLY_FRACTION: f64 = 0.25;

/// Convert decimal odds to implied probability.
/// Decimal odds of 2.50 mean a 1 unit stake returns 2.50 in total.
pub fn implied_probability(odds: f64) -> Option<f64> {
    if odds.is_finite() && odds > 0.0 {
        Some(1.0 / odds)
    } else {
        None
    }
}

/// Convert a probability to fair decimal odds
pub fn fair_odds(probability: f64) -> Option<f64> {
    if probability.is_finite() && probability > 0.0 {
        Some(1.0 / probability)
    } else {
        None
    }
}

/// Model probability minus implied probability; 0 when either is unknown
pub fn edge(model_probability: Option<f64>, implied: Option<f64>) -> f64 {
    match (model_probability, implied) {
        (Some(p), Some(i)) => p - i,
        _ => 0.0,
    }
}

/// Returns whether the edge reaches `threshold`, along with the edge itself
pub fn is_value_bet(
    model_probability: Option<f64>,
    implied: Option<f64>,
    threshold: f64,
) -> (bool, f64) {
    let e = edge(model_probability, implied);
    (e >= threshold, e)
}

/// Fractional Kelly stake, clamped to [0, MAX_KELLY_STAKE]
///
/// Full Kelly is (b*p - q) / b with b = odds - 1 and q = 1 - p.
pub fn kelly_stake(probability: f64, odds: f64, fraction: f64) -> f64 {
    if !(odds > 1.0) || !probability.is_finite() {
        return 0.0;
    }
    let b = odds - 1.0;
    let q = 1.0 - probability;
    let full_kelly = (b * probability - q) / b;
    (full_kelly * fraction).clamp(0.0, MAX_KELLY_STAKE)
}

/// Calculate expected value for a bet at decimal odds
/// EV = (probability of winning * profit per unit) - (probability of losing * stake)
/// Returns EV as a fraction of the stake
pub fn expected_value(probability: f64, odds: f64) -> f64 {
    let win_amount = odds - 1.0;
    let prob_lose = 1.0 - probability;
    (probability * win_amount) - prob_lose
}

/// Confidence tier after scaling the probability by the injury factor.
/// Returns the tier and the scaled probability.
pub fn confidence_tier(probability: f64, injury_factor: f64) -> (ConfidenceTier, f64) {
    let adjusted = probability * injury_factor;
    let tier = if adjusted >= 0.70 {
        ConfidenceTier::High
    } else if adjusted >= 0.60 {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    };
    (tier, adjusted)
}

pub fn risk_tier(probability: f64) -> RiskTier {
    if probability >= 0.70 {
        RiskTier::Low
    } else if probability >= 0.55 {
        RiskTier::Medium
    } else {
        RiskTier::High
    }
}

/// Multiplier applied to a side's win probability for its listed injuries
pub fn injury_factor(injury_count: usize) -> f64 {
    match injury_count {
        0 => 1.0,
        1 => 0.95,
        2 | 3 => 0.90,
        _ => 0.80,
    }
}

/// Multiplier for a side's win probability from its head-to-head record.
/// Needs at least three meetings.
pub fn h2h_boost(record: &H2hRecord, perspective: TeamSide) -> f64 {
    if record.total_matches < 3 {
        return 1.0;
    }
    let win_rate = record.wins_for(perspective) as f64 / record.total_matches as f64;
    if win_rate >= 0.7 {
        1.12
    } else if win_rate >= 0.5 {
        1.07
    } else if win_rate >= 0.3 {
        1.03
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(total: u32, home_wins: u32, away_wins: u32) -> H2hRecord {
        H2hRecord {
            team1: "home".to_string(),
            team2: "away".to_string(),
            total_matches: total,
            team1_wins: home_wins,
            team2_wins: away_wins,
            draws: total - home_wins - away_wins,
            ..H2hRecord::default()
        }
    }

    #[test]
    fn test_implied_probability() {
        let prob = implied_probability(2.5).unwrap();
        assert!((prob - 0.4).abs() < 1e-9);
        assert_eq!(implied_probability(0.0), None);
        assert_eq!(implied_probability(-1.5), None);
        assert!((fair_odds(0.25).unwrap() - 4.0).abs() < 1e-9);
        assert_eq!(fair_odds(0.0), None);
    }

    #[test]
    fn test_edge_and_value() {
        assert!((edge(Some(0.62), Some(0.5)) - 0.12).abs() < 1e-9);
        assert_eq!(edge(None, Some(0.5)), 0.0);
        assert_eq!(edge(Some(0.5), None), 0.0);

        let (value, e) = is_value_bet(Some(0.62), Some(0.5), DEFAULT_VALUE_THRESHOLD);
        assert!(value);
        assert!((e - 0.12).abs() < 1e-9);
        let (value, _) = is_value_bet(Some(0.54), Some(0.5), DEFAULT_VALUE_THRESHOLD);
        assert!(!value);
        let (value, e) = is_value_bet(Some(0.65), Some(0.55), DEFAULT_VALUE_THRESHOLD);
        assert!(value);
        assert!((e - 0.10).abs() < 1e-9);
        let (value, e) = is_value_bet(Some(0.65), None, DEFAULT_VALUE_THRESHOLD);
        assert!(!value);
        assert_eq!(e, 0.0);
    }

    #[test]
    fn test_kelly_stake() {
        // b = 1.5, full Kelly = (1.5*0.5 - 0.5)/1.5 = 0.1667, quarter = 0.0417
        let stake = kelly_stake(0.5, 2.5, DEFAULT_KELLY_FRACTION);
        assert!((stake - 0.041666).abs() < 1e-4);
        // capped
        assert!((kelly_stake(0.9, 3.0, DEFAULT_KELLY_FRACTION) - MAX_KELLY_STAKE).abs() < 1e-9);
        // negative edge
        assert_eq!(kelly_stake(0.3, 2.0, DEFAULT_KELLY_FRACTION), 0.0);
        assert!(kelly_stake(0.8, 3.0, DEFAULT_KELLY_FRACTION) <= MAX_KELLY_STAKE);
        assert_eq!(kelly_stake(0.9, 1.05, DEFAULT_KELLY_FRACTION), 0.0);
        // degenerate odds
        assert_eq!(kelly_stake(0.9, 1.0, DEFAULT_KELLY_FRACTION), 0.0);
        assert_eq!(kelly_stake(0.9, 0.5, DEFAULT_KELLY_FRACTION), 0.0);
    }

    #[test]
    fn test_expected_value() {
        // Positive EV scenario: 60% win probability at 2.10
        assert!(expected_value(0.6, 2.1) > 0.0);
        // Negative EV scenario: 40% win probability at 2.00
        assert!(expected_value(0.4, 2.0) < 0.0);
        assert!(expected_value(0.5, 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(confidence_tier(0.72, 1.0).0, ConfidenceTier::High);
        let (tier, adjusted) = confidence_tier(0.72, 0.90);
        assert_eq!(tier, ConfidenceTier::Medium);
        assert!((adjusted - 0.648).abs() < 1e-9);
        assert_eq!(confidence_tier(0.5, 1.0).0, ConfidenceTier::Low);
        assert_eq!(confidence_tier(0.70, 1.0).0, ConfidenceTier::High);
        assert_eq!(confidence_tier(0.699999, 1.0).0, ConfidenceTier::Medium);
        assert_eq!(confidence_tier(0.60, 1.0).0, ConfidenceTier::Medium);
        assert_eq!(confidence_tier(0.599999, 1.0).0, ConfidenceTier::Low);

        assert_eq!(risk_tier(0.70), RiskTier::Low);
        assert_eq!(risk_tier(0.55), RiskTier::Medium);
        assert_eq!(risk_tier(0.54), RiskTier::High);
    }

    #[test]
    fn test_injury_factor() {
        assert_eq!(injury_factor(0), 1.0);
        assert_eq!(injury_factor(1), 0.95);
        assert_eq!(injury_factor(2), 0.90);
        assert_eq!(injury_factor(3), 0.90);
        assert_eq!(injury_factor(4), 0.80);
        assert_eq!(injury_factor(11), 0.80);
    }

    #[test]
    fn test_h2h_boost() {
        assert_eq!(h2h_boost(&record(2, 2, 0), TeamSide::Home), 1.0);
        assert_eq!(h2h_boost(&record(10, 7, 1), TeamSide::Home), 1.12);
        assert_eq!(h2h_boost(&record(10, 5, 2), TeamSide::Home), 1.07);
        assert_eq!(h2h_boost(&record(10, 3, 2), TeamSide::Home), 1.03);
        assert_eq!(h2h_boost(&record(10, 2, 3), TeamSide::Home), 1.0);
        assert_eq!(h2h_boost(&record(10, 2, 3), TeamSide::Away), 1.03);
    }
}
