use crate::app_dirs::AppDirs;
use crate::error::Result;
use crate::session::SessionSummary;
use chrono::{DateTime, Local};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

/// Personal bests and the number of completed sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Records {
    pub best_wpm: u32,
    pub best_accuracy: u32,
    pub streak: u32,
}

impl Records {
    /// Fold one finished session in: bests only move up, the streak always does.
    pub fn apply(self, wpm: u32, accuracy: u32) -> Self {
        Self {
            best_wpm: self.best_wpm.max(wpm),
            best_accuracy: self.best_accuracy.max(accuracy),
            streak: self.streak.saturating_add(1),
        }
    }
}

/// One row of session history
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub timestamp: DateTime<Local>,
    pub mode: String,
    pub difficulty: String,
    pub wpm: u32,
    pub accuracy: u32,
    pub score: u32,
    pub elapsed_secs: f64,
}

pub trait RecordStore {
    fn load(&self) -> Result<Records>;
    /// Store a finished session and return the updated records
    fn record(&mut self, summary: &SessionSummary) -> Result<Records>;
}

/// Records kept in a SQLite database under the state directory
#[derive(Debug)]
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    pub fn open_default() -> Result<Self> {
        let path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("typemaster_records.db"));
        Self::open(path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                best_wpm INTEGER NOT NULL,
                best_accuracy INTEGER NOT NULL,
                streak INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                mode TEXT NOT NULL,
                difficulty TEXT NOT NULL,
                wpm INTEGER NOT NULL,
                accuracy INTEGER NOT NULL,
                score INTEGER NOT NULL,
                elapsed_secs REAL NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_sessions_timestamp ON sessions(timestamp)",
            [],
        )?;

        Ok(Self { conn })
    }

    /// Most recent sessions, newest first
    pub fn recent(&self, limit: usize) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT timestamp, mode, difficulty, wpm, accuracy, score, elapsed_secs
            FROM sessions
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map([limit as i64], |row| {
            let timestamp_str: String = row.get(0)?;
            let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        0,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?
                .with_timezone(&Local);

            Ok(SessionRecord {
                timestamp,
                mode: row.get(1)?,
                difficulty: row.get(2)?,
                wpm: row.get(3)?,
                accuracy: row.get(4)?,
                score: row.get(5)?,
                elapsed_secs: row.get(6)?,
            })
        })?;

        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }

    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM records", [])?;
        self.conn.execute("DELETE FROM sessions", [])?;
        Ok(())
    }
}

impl RecordStore for SqliteRecordStore {
    fn load(&self) -> Result<Records> {
        let records = self
            .conn
            .query_row(
                "SELECT best_wpm, best_accuracy, streak FROM records WHERE id = 1",
                [],
                |row| {
                    Ok(Records {
                        best_wpm: row.get(0)?,
                        best_accuracy: row.get(1)?,
                        streak: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(records.unwrap_or_default())
    }

    fn record(&mut self, summary: &SessionSummary) -> Result<Records> {
        let updated = self.load()?.apply(summary.wpm, summary.accuracy);

        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO records (id, best_wpm, best_accuracy, streak)
            VALUES (1, ?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                best_wpm = excluded.best_wpm,
                best_accuracy = excluded.best_accuracy,
                streak = excluded.streak
            "#,
            params![updated.best_wpm, updated.best_accuracy, updated.streak],
        )?;
        tx.execute(
            r#"
            INSERT INTO sessions
            (timestamp, mode, difficulty, wpm, accuracy, score, elapsed_secs)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                Local::now().to_rfc3339(),
                summary.mode.to_string(),
                summary.difficulty.to_string(),
                summary.wpm,
                summary.accuracy,
                summary.score,
                summary.elapsed_secs,
            ],
        )?;
        tx.commit()?;

        Ok(updated)
    }
}
