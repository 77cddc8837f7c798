mod analysis;
mod fixture;
mod market;

pub use analysis::{
    AccumulatorKind, AccumulatorLeg, AccumulatorSuggestion, ConfidenceTier, HistoricalAdjustment,
    MatchAnalysis, RankedBet, Recommendation, RiskTier,
};
pub use fixture::{
    ExternalFixture, Injury, MatchLink, MergeOutcome, MergedRecord, PredictionRow, SideInjuries,
    UnmatchedRow,
};
pub use market::{BookmakerOdds, Market, TeamSide, GOAL_LINES};
