use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which team a market or adjustment refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSide {
    Home,
    Away,
}

/// A betting market the engine prices.
///
/// Goal lines are stored as the whole part of a half-goal line, so
/// `Over(2)` is "Over 2.5 goals".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Market {
    HomeWin,
    Draw,
    AwayWin,
    Over(u8),
    Under(u8),
    BttsYes,
    BttsNo,
}

/// Goal lines (whole part) the bookmaker extractor and recommendation builder support
pub const GOAL_LINES: [u8; 3] = [1, 2, 3];

impl Market {
    /// Markets the recommendation builder evaluates for every match
    pub const EVALUATED: [Market; 9] = [
        Market::HomeWin,
        Market::Draw,
        Market::AwayWin,
        Market::Over(1),
        Market::Under(1),
        Market::Over(2),
        Market::Under(2),
        Market::Over(3),
        Market::Under(3),
    ];

    /// Stable key used in sheets, caches and CSV output (e.g. `over_2.5`)
    pub fn key(&self) -> String {
        match self {
            Market::HomeWin => "home_win".to_string(),
            Market::Draw => "draw".to_string(),
            Market::AwayWin => "away_win".to_string(),
            Market::Over(line) => format!("over_{}.5", line),
            Market::Under(line) => format!("under_{}.5", line),
            Market::BttsYes => "btts_yes".to_string(),
            Market::BttsNo => "btts_no".to_string(),
        }
    }

    /// Human readable label used in reports
    pub fn label(&self) -> String {
        match self {
            Market::HomeWin => "Home Win".to_string(),
            Market::Draw => "Draw".to_string(),
            Market::AwayWin => "Away Win".to_string(),
            Market::Over(line) => format!("Over {}.5 Goals", line),
            Market::Under(line) => format!("Under {}.5 Goals", line),
            Market::BttsYes => "Both Teams Score".to_string(),
            Market::BttsNo => "Both Teams Not Score".to_string(),
        }
    }

    pub fn from_key(key: &str) -> Option<Market> {
        match key {
            "home_win" => Some(Market::HomeWin),
            "draw" => Some(Market::Draw),
            "away_win" => Some(Market::AwayWin),
            "btts_yes" => Some(Market::BttsYes),
            "btts_no" => Some(Market::BttsNo),
            _ => {
                let (direction, line) = key.split_once('_')?;
                let whole = line.strip_suffix(".5")?.parse::<u8>().ok()?;
                match direction {
                    "over" => Some(Market::Over(whole)),
                    "under" => Some(Market::Under(whole)),
                    _ => None,
                }
            }
        }
    }

    /// The team a market favours, if any. Totals and draws are neutral.
    pub fn side(&self) -> Option<TeamSide> {
        match self {
            Market::HomeWin => Some(TeamSide::Home),
            Market::AwayWin => Some(TeamSide::Away),
            _ => None,
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<Market> for String {
    fn from(market: Market) -> Self {
        market.key()
    }
}

impl TryFrom<String> for Market {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Market::from_key(&value).ok_or_else(|| format!("unknown market key: {}", value))
    }
}

/// Decimal prices taken from the first bookmaker in a fixture's odds payload.
/// A market missing from `prices` has no usable price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookmakerOdds {
    pub bookmaker: Option<String>,
    pub prices: BTreeMap<Market, f64>,
}

impl BookmakerOdds {
    pub fn get(&self, market: Market) -> Option<f64> {
        self.prices.get(&market).copied()
    }

    /// Record a price. Anything that is not a finite decimal price above 1.0 is ignored.
    pub fn insert(&mut self, market: Market, price: f64) {
        if price.is_finite() && price > 1.0 {
            self.prices.insert(market, price);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
