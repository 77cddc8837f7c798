use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;

use crate::models::{ExternalFixture, Market, PredictionRow, RankedBet};

/// Placeholder for a team or league name the sheet left blank
pub const UNKNOWN_NAME: &str = "Unknown";

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%m/%d/%Y"];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Column {
    Home,
    Away,
    League,
    Date,
    Probability(Market),
    Ignored,
}

impl Column {
    fn from_header(header: &str) -> Column {
        match header.trim().to_ascii_lowercase().as_str() {
            "home" => Column::Home,
            "away" => Column::Away,
            "league" => Column::League,
            "date" => Column::Date,
            "1x2_h" => Column::Probability(Market::HomeWin),
            "1x2_d" => Column::Probability(Market::Draw),
            "1x2_a" => Column::Probability(Market::AwayWin),
            other => {
                let market = match other.split_once('_') {
                    Some(("o", line)) => Market::from_key(&format!("over_{}", line)),
                    Some(("u", line)) => Market::from_key(&format!("under_{}", line)),
                    _ => Market::from_key(other),
                };
                market.map(Column::Probability).unwrap_or(Column::Ignored)
            }
        }
    }
}

fn is_missing(value: &str) -> bool {
    let v = value.trim();
    v.is_empty()
        || v.eq_ignore_ascii_case("na")
        || v.eq_ignore_ascii_case("n/a")
        || v.eq_ignore_ascii_case("nan")
        || v.eq_ignore_ascii_case("missing")
}

/// Parse a probability cell. Percentages (above 1, up to 100) are scaled down to [0, 1].
pub fn parse_probability(value: &str) -> Option<f64> {
    if is_missing(value) {
        return None;
    }
    let v = value.trim().trim_end_matches('%').trim().parse::<f64>().ok()?;
    if !v.is_finite() || v < 0.0 {
        None
    } else if v <= 1.0 {
        Some(v)
    } else if v <= 100.0 {
        Some(v / 100.0)
    } else {
        None
    }
}

/// Parse a sheet date. ISO-8601 values keep their local wall-clock time.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    if is_missing(value) || value.trim().eq_ignore_ascii_case(UNKNOWN_NAME) {
        return None;
    }
    let v = value.trim();

    if v.contains('T') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(v) {
            return Some(dt.naive_local());
        }
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(v, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(v, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn name_or_unknown(value: Option<&str>) -> String {
    match value {
        Some(v) if !is_missing(v) => v.trim().to_string(),
        _ => UNKNOWN_NAME.to_string(),
    }
}

/// Load the predictions sheet from a CSV file
pub fn load_predictions_csv(path: &str) -> Result<Vec<PredictionRow>> {
    let file = File::open(path).with_context(|| format!("Failed to open predictions file {}", path))?;
    parse_predictions(file)
}

/// Parse predictions from any CSV source. Bad cells become absent values; rows are never dropped.
pub fn parse_predictions<R: Read>(reader: R) -> Result<Vec<PredictionRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<Column> = rdr
        .headers()
        .context("Failed to read predictions header")?
        .iter()
        .map(Column::from_header)
        .collect();

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read predictions row {}", i + 1))?;

        let mut home = None;
        let mut away = None;
        let mut league = None;
        let mut date = None;
        let mut probabilities = BTreeMap::new();

        for (column, value) in columns.iter().zip(record.iter()) {
            match column {
                Column::Home => home = Some(value),
                Column::Away => away = Some(value),
                Column::League => league = Some(value),
                Column::Date => date = parse_date(value),
                Column::Probability(market) => {
                    if let Some(p) = parse_probability(value) {
                        probabilities.insert(*market, p);
                    }
                }
                Column::Ignored => {}
            }
        }

        rows.push(PredictionRow {
            home: name_or_unknown(home),
            away: name_or_unknown(away),
            league: name_or_unknown(league),
            date,
            probabilities,
        });
    }

    Ok(rows)
}

/// Save provider fixtures to a JSON cache file
pub fn save_fixtures_to_cache(fixtures: &[ExternalFixture], cache_file: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(fixtures).context("Failed to serialize fixtures")?;
    std::fs::write(cache_file, json).context("Failed to write cache file")?;
    Ok(())
}

/// Load provider fixtures from a JSON cache file
pub fn load_fixtures_from_cache(cache_file: &str) -> Result<Vec<ExternalFixture>> {
    let json = std::fs::read_to_string(cache_file).context("Failed to read cache file")?;
    let fixtures: Vec<ExternalFixture> =
        serde_json::from_str(&json).context("Failed to deserialize fixtures")?;
    Ok(fixtures)
}

/// Save ranked bets to CSV
pub fn save_top_bets_to_csv(bets: &[RankedBet], filename: &str) -> Result<()> {
    let mut wtr = csv::Writer::from_path(filename).context("Failed to create CSV file")?;

    wtr.write_record([
        "Match",
        "League",
        "Date",
        "Market",
        "Odds",
        "Edge (%)",
        "Model Probability (%)",
        "Adjusted Probability (%)",
        "Implied Probability (%)",
        "Confidence",
        "Risk",
        "Kelly Stake (%)",
    ])?;

    for bet in bets {
        let rec = &bet.recommendation;
        wtr.write_record([
            bet.match_label.clone(),
            bet.league.clone(),
            bet.date
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            rec.market.label(),
            rec.bookmaker_odds
                .map(|o| format!("{:.2}", o))
                .unwrap_or_default(),
            format!("{:.2}", rec.edge * 100.0),
            format!("{:.1}", rec.model_probability * 100.0),
            format!("{:.1}", rec.adjusted_probability * 100.0),
            rec.implied_probability
                .map(|p| format!("{:.1}", p * 100.0))
                .unwrap_or_default(),
            rec.confidence.to_string(),
            rec.risk.to_string(),
            format!("{:.2}", rec.kelly_stake * 100.0),
        ])?;
    }

    wtr.flush().context("Failed to flush CSV file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConfidenceTier, Recommendation, RiskTier};
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("soccer_betting_ev_{}_{}", std::process::id(), name))
            .to_string_lossy()
            .to_string()
    }

    #[test]
    fn test_parse_predictions() {
        let sheet = "\
 home , away ,league,date,1x2_h,1x2_d,1x2_a,o_2.5,u_2.5,o_4.5,btts_yes
Bayern,Dortmund,Bundesliga,2024-03-30 18:30,0.65,0.20,0.15,58,NA,0.1,
,Floriana,Premier League,not a date,N/A,missing,0.3,,0.45,,
";
        let rows = parse_predictions(sheet.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);

        let bayern = &rows[0];
        assert_eq!(bayern.home, "Bayern");
        assert_eq!(bayern.league, "Bundesliga");
        let date = bayern.date.unwrap();
        assert_eq!((date.day(), date.hour(), date.minute()), (30, 18, 30));
        assert_eq!(bayern.probability(Market::HomeWin), Some(0.65));
        assert!((bayern.probability(Market::Over(2)).unwrap() - 0.58).abs() < 1e-9);
        assert_eq!(bayern.probability(Market::Under(2)), None);
        assert_eq!(bayern.probability(Market::Over(4)), Some(0.1));

        let second = &rows[1];
        assert_eq!(second.home, UNKNOWN_NAME);
        assert_eq!(second.away, "Floriana");
        assert_eq!(second.date, None);
        assert_eq!(second.probability(Market::HomeWin), None);
        assert_eq!(second.probability(Market::AwayWin), Some(0.3));
        assert_eq!(second.probability(Market::Under(2)), Some(0.45));
        assert_eq!(second.probability(Market::BttsYes), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expect = |s: &str, y: i32, m: u32, d: u32, h: u32| {
            let dt = parse_date(s).unwrap_or_else(|| panic!("failed to parse {}", s));
            assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (y, m, d, h), "{}", s);
        };
        expect("2024-03-30T18:30:00+01:00", 2024, 3, 30, 18);
        expect("2024-03-30T17:30:00Z", 2024, 3, 30, 17);
        expect("2024-03-30T18:30:00", 2024, 3, 30, 18);
        expect("2024-03-30 18:30:15", 2024, 3, 30, 18);
        expect("2024-03-30", 2024, 3, 30, 0);
        expect("30/03/2024 20:45", 2024, 3, 30, 20);
        expect("30/03/2024", 2024, 3, 30, 0);
        expect("30-03-2024", 2024, 3, 30, 0);
        // day-first wins when both readings are valid
        expect("04/03/2024", 2024, 3, 4, 0);
        expect("03/30/2024", 2024, 3, 30, 0);

        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("Unknown"), None);
        assert_eq!(parse_date("next tuesday"), None);
    }

    #[test]
    fn test_parse_probability() {
        assert_eq!(parse_probability("0.42"), Some(0.42));
        assert_eq!(parse_probability("1"), Some(1.0));
        assert_eq!(parse_probability("65"), Some(0.65));
        assert_eq!(parse_probability("65%"), Some(0.65));
        assert_eq!(parse_probability("150"), None);
        assert_eq!(parse_probability("-0.2"), None);
        assert_eq!(parse_probability("n/a"), None);
    }

    #[test]
    fn test_fixture_cache_roundtrip() {
        let fixture = ExternalFixture {
            id: 42,
            home_id: Some(1),
            away_id: None,
            home_name: "Valletta".to_string(),
            away_name: "Floriana".to_string(),
            league_name: "Premier League".to_string(),
            kickoff: DateTime::parse_from_rfc3339("2024-03-30T15:00:00+01:00").unwrap(),
            venue: None,
            odds_payload: json!([]),
            injuries: vec![],
            h2h_payload: vec![],
            lineups: vec![],
        };
        let path = temp_path("fixtures.json");
        save_fixtures_to_cache(&[fixture], &path).unwrap();
        let loaded = load_fixtures_from_cache(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 42);
        assert_eq!(loaded[0].home_name, "Valletta");
        assert!(load_fixtures_from_cache(&temp_path("missing.json")).is_err());
    }

    #[test]
    fn test_save_top_bets_to_csv() {
        let bet = RankedBet {
            match_index: 0,
            match_label: "Bayern vs Dortmund".to_string(),
            league: "Bundesliga".to_string(),
            date: None,
            recommendation: Recommendation {
                market: Market::HomeWin,
                model_probability: 0.65,
                adjusted_probability: 0.65,
                bookmaker_odds: Some(1.8),
                implied_probability: Some(1.0 / 1.8),
                edge: 0.65 - 1.0 / 1.8,
                is_value_bet: true,
                confidence: ConfidenceTier::Medium,
                risk: RiskTier::Medium,
                kelly_stake: 0.05,
                injury_factor: 1.0,
                historical_adjustment: 0.0,
            },
        };
        let path = temp_path("top_bets.csv");
        save_top_bets_to_csv(&[bet], &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Match,League,Date,Market,Odds"));
        assert_eq!(
            lines[1],
            "Bayern vs Dortmund,Bundesliga,,Home Win,1.80,9.44,65.0,65.0,55.6,MEDIUM,Medium,5.00"
        );
    }
}
