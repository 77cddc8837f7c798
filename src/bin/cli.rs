use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use soccer_betting_ev::accumulator::AccumulatorComposer;
use soccer_betting_ev::api::ApiFootballClient;
use soccer_betting_ev::data::{load_predictions_csv, save_top_bets_to_csv};
use soccer_betting_ev::history::{HistoryStore, SqliteHistory};
use soccer_betting_ev::merger::Merger;
use soccer_betting_ev::{
    build_report, load_or_fetch_fixtures, refresh_team_history, save_h2h_history,
    AccumulatorLeg, Market, Settings,
};
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// predictions sheet (CSV)
    #[clap(short = 'p', long)]
    predictions: String,

    /// fixture date, YYYY-MM-DD (defaults to today)
    #[clap(short = 'd', long)]
    date: Option<NaiveDate>,

    /// API-Football league id to fetch; repeat for several leagues
    #[clap(short = 'l', long = "league")]
    leagues: Vec<i64>,

    /// fixtures cache file (defaults to cache/fixtures_<date>.json)
    #[clap(short = 'f', long)]
    fixtures: Option<String>,

    /// read fixtures from the cache file when it exists
    #[clap(long)]
    use_cache: bool,

    /// legs per accumulator
    #[clap(long, default_value_t = 4)]
    legs: usize,

    /// number of top bets to list
    #[clap(long, default_value_t = 10)]
    top: usize,

    /// write the top bets to this CSV file
    #[clap(long)]
    save_csv: Option<String>,

    /// team history database (overrides HISTORY_DB)
    #[clap(long)]
    history_db: Option<PathBuf>,

    /// skip the team history cache entirely
    #[clap(long)]
    no_history: bool,

    /// fetch recent results for linked teams whose history is stale
    #[clap(long)]
    refresh_history: bool,

    /// refetch history for every linked team, fresh or not (implies --refresh-history)
    #[clap(long)]
    force_refresh: bool,

    /// empty the team history cache before running
    #[clap(long)]
    clear_history: bool,

    /// minimum edge for a value bet (overrides VALUE_THRESHOLD)
    #[clap(long)]
    value_threshold: Option<f64>,

    /// build a custom accumulator around ROW:MARKET, e.g. 3:home_win (ROW counts from 1)
    #[clap(long)]
    anchor: Option<String>,
}

fn parse_anchor(spec: &str) -> Option<(usize, Market)> {
    let (row, market) = spec.split_once(':')?;
    let row: usize = row.trim().parse().ok()?;
    Some((row.checked_sub(1)?, Market::from_key(market.trim())?))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let settings = Settings::from_env();
    let mut engine = settings.engine;
    if let Some(threshold) = args.value_threshold {
        engine.value_threshold = threshold.clamp(0.0, 0.5);
    }

    println!("Soccer Betting Value Finder\n");

    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let rows = load_predictions_csv(&args.predictions).context("Failed to load predictions")?;
    println!("Loaded {} predictions from {}\n", rows.len(), args.predictions);

    let cache_file = args
        .fixtures
        .clone()
        .unwrap_or_else(|| format!("cache/fixtures_{}.json", date.format("%Y-%m-%d")));
    let fixtures = load_or_fetch_fixtures(
        settings.api_key.as_deref(),
        date,
        &args.leagues,
        &cache_file,
        args.use_cache || settings.use_cache,
    )
    .await?;
    println!("Using {} provider fixtures for {}\n", fixtures.len(), date);

    let outcome = Merger::default().merge(&rows, &fixtures);

    let history = if args.no_history {
        None
    } else {
        let path = args.history_db.clone().unwrap_or(settings.history_db.clone());
        match SqliteHistory::open(&path) {
            Ok(store) => Some(store),
            Err(e) => {
                warn!("History cache unavailable at {}: {}", path.display(), e);
                None
            }
        }
    };

    if let Some(store) = &history {
        if args.clear_history {
            store.clear().context("Failed to clear history cache")?;
            println!("Cleared history cache\n");
        }
        let saved = save_h2h_history(store, &outcome.records);
        println!("Saved {} head-to-head records to history\n", saved);

        if args.refresh_history || args.force_refresh {
            match &settings.api_key {
                Some(api_key) => {
                    let client = ApiFootballClient::new(api_key.clone());
                    let refreshed =
                        refresh_team_history(&client, store, &outcome.records, args.force_refresh)
                            .await;
                    println!("Refreshed form for {} teams\n", refreshed);
                }
                None => warn!("--refresh-history needs API_FOOTBALL_KEY"),
            }
        }
    }

    let store: Option<&dyn HistoryStore> = history.as_ref().map(|s| s as &dyn HistoryStore);
    let report = build_report(outcome, store, &engine, args.legs, args.top);

    println!("MATCH ANALYSIS\n");
    let with_picks: Vec<_> = report
        .analyses
        .iter()
        .filter(|a| !a.recommendations.is_empty())
        .collect();
    if with_picks.is_empty() {
        println!("No recommendations cleared the filters.");
    }
    for analysis in with_picks {
        println!("{}\n", analysis.format());
    }

    if !report.unmatched.is_empty() {
        println!("UNMATCHED PREDICTIONS ({})\n", report.unmatched.len());
        for row in &report.unmatched {
            println!("  {}", row.format());
        }
        println!();
    }

    println!("TOP BETS\n");
    if report.top_bets.is_empty() {
        println!("No priced bets found.");
    } else {
        for (i, bet) in report.top_bets.iter().enumerate() {
            println!("{}. {}", i + 1, bet.format());
        }
    }

    if let Some(path) = &args.save_csv {
        if !report.top_bets.is_empty() {
            save_top_bets_to_csv(&report.top_bets, path)?;
            println!("\nSaved top bets to {}", path);
        }
    }

    println!("\nACCUMULATORS\n");
    if report.accumulators.is_empty() {
        println!("Not enough qualifying legs for a {}-fold.", args.legs);
    }
    for acca in &report.accumulators {
        println!("{}\n", acca.format());
    }

    if let Some(spec) = &args.anchor {
        match parse_anchor(spec) {
            Some((index, market)) => {
                let anchor = report
                    .analyses
                    .iter()
                    .find(|a| a.match_index == index)
                    .and_then(|a| {
                        a.recommendations
                            .iter()
                            .find(|r| r.market == market)
                            .map(|r| AccumulatorLeg::from_recommendation(a, r))
                    });
                match anchor {
                    Some(anchor) => {
                        let custom = AccumulatorComposer::new(engine).build_custom(
                            anchor,
                            &report.analyses,
                            args.legs.saturating_sub(1),
                        );
                        match custom {
                            Some(acca) => println!("{}\n", acca.format()),
                            None => println!("Not enough other matches to build around {}", spec),
                        }
                    }
                    None => warn!("Row {} has no {} recommendation", index + 1, market.label()),
                }
            }
            None => warn!("--anchor must look like ROW:MARKET, got {}", spec),
        }
    }

    if let Some(store) = &history {
        match store.stats() {
            Ok(stats) => println!("\n{}", stats.format()),
            Err(e) => warn!("Failed to read history stats: {}", e),
        }
    }

    Ok(())
}
