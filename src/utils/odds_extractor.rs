use crate::models::{BookmakerOdds, Market, GOAL_LINES};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// One entry of the provider's odds response
#[derive(Debug, Deserialize)]
struct RawOddsEntry {
    #[serde(default)]
    bookmakers: Vec<RawBookmaker>,
}

#[derive(Debug, Deserialize)]
struct RawBookmaker {
    #[serde(default)]
    name: String,
    #[serde(default)]
    bets: Vec<RawBet>,
}

#[derive(Debug, Deserialize)]
struct RawBet {
    #[serde(default)]
    name: String,
    #[serde(default)]
    values: Vec<RawPrice>,
}

/// Providers send both the outcome and the price as strings or numbers
#[derive(Debug, Deserialize)]
struct RawPrice {
    #[serde(default)]
    value: Value,
    #[serde(default)]
    odd: Value,
}

impl RawPrice {
    fn outcome(&self) -> String {
        match &self.value {
            Value::String(s) => s.trim().to_string(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    fn price(&self) -> Option<f64> {
        match &self.odd {
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

/// A bookmaker bet, classified by the market family it prices
#[derive(Debug, Clone, PartialEq)]
enum BetMarket {
    MatchWinner(Vec<(Market, f64)>),
    GoalsOverUnder(Vec<(Market, f64)>),
    BothTeamsScore(Vec<(Market, f64)>),
    Unsupported(String),
}

impl From<&RawBet> for BetMarket {
    fn from(bet: &RawBet) -> Self {
        match bet.name.as_str() {
            "Match Winner" => BetMarket::MatchWinner(
                bet.values
                    .iter()
                    .filter_map(|v| {
                        let market = match v.outcome().as_str() {
                            "Home" => Market::HomeWin,
                            "Draw" => Market::Draw,
                            "Away" => Market::AwayWin,
                            _ => return None,
                        };
                        Some((market, v.price()?))
                    })
                    .collect(),
            ),
            "Goals Over/Under" => BetMarket::GoalsOverUnder(
                bet.values
                    .iter()
                    .filter_map(|v| Some((parse_goal_line(&v.outcome())?, v.price()?)))
                    .collect(),
            ),
            "Both Teams Score" => BetMarket::BothTeamsScore(
                bet.values
                    .iter()
                    .filter_map(|v| {
                        let market = match v.outcome().as_str() {
                            "Yes" => Market::BttsYes,
                            "No" => Market::BttsNo,
                            _ => return None,
                        };
                        Some((market, v.price()?))
                    })
                    .collect(),
            ),
            other => BetMarket::Unsupported(other.to_string()),
        }
    }
}

/// "Over 2.5" -> Over(2), restricted to the supported half-goal lines
fn parse_goal_line(outcome: &str) -> Option<Market> {
    let (direction, line) = outcome.split_once(' ')?;
    let whole = line.trim().strip_suffix(".5")?.parse::<u8>().ok()?;
    if !GOAL_LINES.contains(&whole) {
        return None;
    }
    match direction {
        "Over" => Some(Market::Over(whole)),
        "Under" => Some(Market::Under(whole)),
        _ => None,
    }
}

/// Pulls decimal prices out of a raw odds payload
#[derive(Debug, Clone, Copy, Default)]
pub struct OddsExtractor;

impl OddsExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract prices from the first bookmaker in the payload.
    ///
    /// Accepts the provider's list of odds entries or a single entry. Anything
    /// else yields empty odds; this never fails.
    pub fn extract(&self, payload: &Value) -> BookmakerOdds {
        let entries: Vec<RawOddsEntry> = match payload {
            Value::Null => return BookmakerOdds::default(),
            Value::Array(_) => match Vec::<RawOddsEntry>::deserialize(payload) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Malformed odds payload: {}", e);
                    return BookmakerOdds::default();
                }
            },
            Value::Object(_) => match RawOddsEntry::deserialize(payload) {
                Ok(entry) => vec![entry],
                Err(e) => {
                    warn!("Malformed odds payload: {}", e);
                    return BookmakerOdds::default();
                }
            },
            _ => {
                warn!("Unexpected odds payload shape");
                return BookmakerOdds::default();
            }
        };

        let Some(bookmaker) = entries.iter().flat_map(|e| e.bookmakers.iter()).next() else {
            return BookmakerOdds::default();
        };

        let mut odds = BookmakerOdds {
            bookmaker: Some(bookmaker.name.clone()).filter(|n| !n.is_empty()),
            ..BookmakerOdds::default()
        };

        for bet in &bookmaker.bets {
            match BetMarket::from(bet) {
                BetMarket::MatchWinner(prices)
                | BetMarket::GoalsOverUnder(prices)
                | BetMarket::BothTeamsScore(prices) => {
                    for (market, price) in prices {
                        odds.insert(market, price);
                    }
                }
                BetMarket::Unsupported(name) => debug!("Skipping bet market {}", name),
            }
        }

        odds
    }
}
