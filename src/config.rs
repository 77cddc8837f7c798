use std::env;
use std::path::PathBuf;

use crate::utils::ev_calculator::{DEFAULT_KELLY_FRACTION, DEFAULT_VALUE_THRESHOLD, MAX_KELLY_STAKE};

pub const DEFAULT_MIN_RECOMMEND_PROBABILITY: f64 = 0.55;
pub const DEFAULT_ACCUMULATOR_MIN_PROBABILITY: f64 = 0.65;
pub const DEFAULT_ACCUMULATOR_MIN_ODDS: f64 = 1.3;
const DEFAULT_HISTORY_DB: &str = "team_history_cache.db";

/// Numbers that drive the recommendation and accumulator maths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub value_threshold: f64,
    pub kelly_fraction: f64,
    pub max_stake: f64,
    pub min_recommend_probability: f64,
    pub accumulator_min_probability: f64,
    pub accumulator_min_odds: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            value_threshold: DEFAULT_VALUE_THRESHOLD,
            kelly_fraction: DEFAULT_KELLY_FRACTION,
            max_stake: MAX_KELLY_STAKE,
            min_recommend_probability: DEFAULT_MIN_RECOMMEND_PROBABILITY,
            accumulator_min_probability: DEFAULT_ACCUMULATOR_MIN_PROBABILITY,
            accumulator_min_odds: DEFAULT_ACCUMULATOR_MIN_ODDS,
        }
    }
}

/// Runtime settings, read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub engine: EngineConfig,
    pub history_db: PathBuf,
    pub use_cache: bool,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup. Out-of-range numbers are clamped.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &str, default: f64, min: f64, max: f64| -> f64 {
            lookup(key)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(default)
                .clamp(min, max)
        };

        let engine = EngineConfig {
            value_threshold: number("VALUE_THRESHOLD", DEFAULT_VALUE_THRESHOLD, 0.0, 0.5),
            kelly_fraction: number("KELLY_FRACTION", DEFAULT_KELLY_FRACTION, 0.0, 1.0),
            max_stake: number("MAX_STAKE", MAX_KELLY_STAKE, 0.0, MAX_KELLY_STAKE),
            min_recommend_probability: number(
                "MIN_RECOMMEND_PROBABILITY",
                DEFAULT_MIN_RECOMMEND_PROBABILITY,
                0.0,
                1.0,
            ),
            accumulator_min_probability: number(
                "ACCUMULATOR_MIN_PROBABILITY",
                DEFAULT_ACCUMULATOR_MIN_PROBABILITY,
                0.0,
                1.0,
            ),
            accumulator_min_odds: number(
                "ACCUMULATOR_MIN_ODDS",
                DEFAULT_ACCUMULATOR_MIN_ODDS,
                1.0,
                100.0,
            ),
        };

        let api_key = lookup("API_FOOTBALL_KEY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let history_db = lookup("HISTORY_DB")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join(DEFAULT_HISTORY_DB));

        let use_cache = lookup("USE_CACHE")
            .map(|v| {
                let t = v.trim().to_ascii_lowercase();
                !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
            })
            .unwrap_or(false);

        Self {
            api_key,
            engine,
            history_db,
            use_cache,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]);
        assert_eq!(s.engine, EngineConfig::default());
        assert_eq!(s.api_key, None);
        assert!(!s.use_cache);
        assert!(s.history_db.ends_with(DEFAULT_HISTORY_DB));
    }

    #[test]
    fn test_overrides_and_clamping() {
        let s = settings(&[
            ("API_FOOTBALL_KEY", "  abc123 "),
            ("VALUE_THRESHOLD", "0.08"),
            ("KELLY_FRACTION", "3"),
            ("MAX_STAKE", "0.5"),
            ("ACCUMULATOR_MIN_ODDS", "not a number"),
            ("HISTORY_DB", "/tmp/history.db"),
            ("USE_CACHE", "1"),
        ]);
        assert_eq!(s.api_key.as_deref(), Some("abc123"));
        assert!((s.engine.value_threshold - 0.08).abs() < 1e-9);
        assert_eq!(s.engine.kelly_fraction, 1.0);
        assert_eq!(s.engine.max_stake, MAX_KELLY_STAKE);
        assert_eq!(s.engine.accumulator_min_odds, DEFAULT_ACCUMULATOR_MIN_ODDS);
        assert_eq!(s.history_db, PathBuf::from("/tmp/history.db"));
        assert!(s.use_cache);
    }

    #[test]
    fn test_blank_key_is_none() {
        let s = settings(&[("API_FOOTBALL_KEY", "   "), ("USE_CACHE", "off")]);
        assert_eq!(s.api_key, None);
        assert!(!s.use_cache);
    }
}
