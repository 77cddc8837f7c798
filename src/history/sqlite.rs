use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

use super::form::{TeamForm, TeamRatings, Trend};
use super::h2h::H2hRecord;
use super::{HistoryError, HistoryStore};
use crate::utils::team_names::NameMatcher;

/// Row counts per table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub teams: u64,
    pub form_records: u64,
    pub h2h_records: u64,
    pub location: String,
}

impl CacheStats {
    pub fn format(&self) -> String {
        format!(
            "History cache {} | teams: {} | form: {} | h2h: {}",
            self.location, self.teams, self.form_records, self.h2h_records
        )
    }
}

/// SQLite-backed team history, keyed by normalized team name.
/// Writes overwrite the previous entry for the same key.
pub struct SqliteHistory {
    conn: Mutex<Connection>,
    matcher: NameMatcher,
    location: String,
}

impl SqliteHistory {
    pub fn open(path: &Path) -> Result<Self, HistoryError> {
        let conn = Connection::open(path)?;
        let store = Self::with_connection(conn, path.display().to_string())?;
        info!("Opened history cache at {}", store.location);
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, HistoryError> {
        Self::with_connection(Connection::open_in_memory()?, ":memory:".to_string())
    }

    fn with_connection(conn: Connection, location: String) -> Result<Self, HistoryError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS team_form (
                team_key TEXT PRIMARY KEY,
                team_name TEXT NOT NULL,
                form_string TEXT NOT NULL,
                points INTEGER NOT NULL,
                goals_for INTEGER NOT NULL,
                goals_against INTEGER NOT NULL,
                clean_sheets INTEGER NOT NULL,
                trend TEXT NOT NULL,
                trend_strength REAL NOT NULL,
                last_updated TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS team_ratings (
                team_key TEXT PRIMARY KEY,
                team_name TEXT NOT NULL,
                attack REAL NOT NULL,
                defense REAL NOT NULL,
                form REAL NOT NULL,
                home REAL NOT NULL,
                away REAL NOT NULL,
                consistency REAL NOT NULL,
                last_updated TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS h2h_records (
                team1_key TEXT NOT NULL,
                team2_key TEXT NOT NULL,
                team1_name TEXT NOT NULL,
                team2_name TEXT NOT NULL,
                total_matches INTEGER NOT NULL,
                team1_wins INTEGER NOT NULL,
                draws INTEGER NOT NULL,
                team2_wins INTEGER NOT NULL,
                team1_goals INTEGER NOT NULL,
                team2_goals INTEGER NOT NULL,
                last_matches_json TEXT NOT NULL,
                last_updated TEXT NOT NULL,
                PRIMARY KEY (team1_key, team2_key)
            );
            "#,
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
            matcher: NameMatcher::new(),
            location,
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, HistoryError> {
        self.conn.lock().map_err(|_| HistoryError::Poisoned)
    }

    fn key(&self, team: &str) -> String {
        self.matcher.normalize(team)
    }

    /// Remove every cached entry
    pub fn clear(&self) -> Result<(), HistoryError> {
        self.conn()?.execute_batch(
            "DELETE FROM team_form; DELETE FROM team_ratings; DELETE FROM h2h_records;",
        )?;
        Ok(())
    }

    pub fn stats(&self) -> Result<CacheStats, HistoryError> {
        let conn = self.conn()?;
        let count = |table: &str| -> Result<u64, HistoryError> {
            let n: i64 =
                conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
            Ok(n as u64)
        };
        Ok(CacheStats {
            teams: count("team_ratings")?,
            form_records: count("team_form")?,
            h2h_records: count("h2h_records")?,
            location: self.location.clone(),
        })
    }
}

impl HistoryStore for SqliteHistory {
    fn team_form(&self, team: &str) -> Result<Option<TeamForm>, HistoryError> {
        let conn = self.conn()?;
        let form = conn
            .query_row(
                "SELECT team_name, form_string, points, goals_for, goals_against, clean_sheets, trend, trend_strength
                 FROM team_form WHERE team_key = ?1",
                params![self.key(team)],
                |row| {
                    let trend: String = row.get(6)?;
                    Ok(TeamForm {
                        team: row.get(0)?,
                        form_string: row.get(1)?,
                        points: row.get(2)?,
                        goals_for: row.get(3)?,
                        goals_against: row.get(4)?,
                        clean_sheets: row.get(5)?,
                        trend: Trend::parse(&trend),
                        trend_strength: row.get(7)?,
                    })
                },
            )
            .optional()?;
        Ok(form)
    }

    fn team_ratings(&self, team: &str) -> Result<Option<TeamRatings>, HistoryError> {
        let conn = self.conn()?;
        let ratings = conn
            .query_row(
                "SELECT team_name, attack, defense, form, home, away, consistency
                 FROM team_ratings WHERE team_key = ?1",
                params![self.key(team)],
                |row| {
                    Ok(TeamRatings {
                        team: row.get(0)?,
                        attack: row.get(1)?,
                        defense: row.get(2)?,
                        form: row.get(3)?,
                        home: row.get(4)?,
                        away: row.get(5)?,
                        consistency: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(ratings)
    }

    fn h2h(&self, home: &str, away: &str) -> Result<Option<H2hRecord>, HistoryError> {
        let home_key = self.key(home);
        let away_key = self.key(away);
        let (first, second) = if home_key <= away_key {
            (&home_key, &away_key)
        } else {
            (&away_key, &home_key)
        };

        let conn = self.conn()?;
        let stored = conn
            .query_row(
                "SELECT team1_name, team2_name, total_matches, team1_wins, draws, team2_wins,
                        team1_goals, team2_goals, last_matches_json
                 FROM h2h_records WHERE team1_key = ?1 AND team2_key = ?2",
                params![first, second],
                |row| {
                    let json: String = row.get(8)?;
                    Ok((
                        H2hRecord {
                            team1: row.get(0)?,
                            team2: row.get(1)?,
                            total_matches: row.get(2)?,
                            team1_wins: row.get(3)?,
                            draws: row.get(4)?,
                            team2_wins: row.get(5)?,
                            team1_goals: row.get(6)?,
                            team2_goals: row.get(7)?,
                            last_matches: Vec::new(),
                        },
                        json,
                    ))
                },
            )
            .optional()?;

        let Some((mut record, json)) = stored else {
            return Ok(None);
        };
        record.last_matches = serde_json::from_str(&json)?;

        // stored with the smaller key as team1; orient so team1 is the home side
        if *first == home_key {
            Ok(Some(record))
        } else {
            Ok(Some(record.swapped()))
        }
    }

    fn team_updated_at(&self, team: &str) -> Result<Option<DateTime<Utc>>, HistoryError> {
        let conn = self.conn()?;
        let updated: Option<String> = conn
            .query_row(
                "SELECT last_updated FROM team_form WHERE team_key = ?1",
                params![self.key(team)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(updated
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }

    fn save_form(&self, form: &TeamForm) -> Result<(), HistoryError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO team_form (
                team_key, team_name, form_string, points, goals_for, goals_against,
                clean_sheets, trend, trend_strength, last_updated
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                self.key(&form.team),
                form.team,
                form.form_string,
                form.points,
                form.goals_for,
                form.goals_against,
                form.clean_sheets,
                form.trend.as_str(),
                form.trend_strength,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn save_ratings(&self, ratings: &TeamRatings) -> Result<(), HistoryError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO team_ratings (
                team_key, team_name, attack, defense, form, home, away, consistency, last_updated
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                self.key(&ratings.team),
                ratings.team,
                ratings.attack,
                ratings.defense,
                ratings.form,
                ratings.home,
                ratings.away,
                ratings.consistency,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn save_h2h(&self, record: &H2hRecord) -> Result<(), HistoryError> {
        let key1 = self.key(&record.team1);
        let key2 = self.key(&record.team2);
        let (record, key1, key2) = if key1 <= key2 {
            (record.clone(), key1, key2)
        } else {
            (record.swapped(), key2, key1)
        };
        let last_matches = serde_json::to_string(&record.last_matches)?;

        self.conn()?.execute(
            "INSERT OR REPLACE INTO h2h_records (
                team1_key, team2_key, team1_name, team2_name, total_matches, team1_wins, draws,
                team2_wins, team1_goals, team2_goals, last_matches_json, last_updated
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                key1,
                key2,
                record.team1,
                record.team2,
                record.total_matches,
                record.team1_wins,
                record.draws,
                record.team2_wins,
                record.team1_goals,
                record.team2_goals,
                last_matches,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}
