//! Persistent storage for emitted metric records.
//!
//! Each record is kept whole as JSON, with the handful of metrics that get
//! averaged promoted into their own columns. Uses SQLite with WAL mode so a
//! recording sampler and a reporting command can share the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bytesize::ByteSize;
use chrono::Utc;
use hardmon_protocol::MetricRecord;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

const CURRENT_SCHEMA_VERSION: i32 = 1;

/// A persisted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSample {
    pub id: Option<i64>,
    /// Assigned by the store when the record is written.
    pub timestamp: i64,
    pub cpu_load: Option<f64>,
    pub cpu_temp: Option<f64>,
    pub gpu_load: Option<f64>,
    pub vram_load: Option<f64>,
    pub average_gpu: Option<f64>,
    pub mem_used: Option<i64>,
    pub mem_available: Option<i64>,
    /// The full record as JSON.
    pub data: String,
}

impl StoredSample {
    pub fn from_record(record: &MetricRecord, timestamp: i64) -> Result<Self> {
        let number = |key: &str| record.get(key).and_then(|v| v.as_f64());
        let integer = |key: &str| record.get(key).and_then(|v| v.as_i64());

        Ok(Self {
            id: None,
            timestamp,
            cpu_load: number("cpu_load"),
            cpu_temp: number("cpu_temp"),
            gpu_load: number("gpu_load"),
            vram_load: number("vram_load"),
            average_gpu: number("average_gpu"),
            mem_used: integer("mem_used"),
            mem_available: integer("mem_available"),
            data: record.to_json()?,
        })
    }
}

/// Averages over the samples stored within one window ending now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowAverage {
    pub window: Duration,
    pub sample_count: i64,
    pub cpu_load: Option<f64>,
    pub gpu_load: Option<f64>,
    pub vram_load: Option<f64>,
    pub average_gpu: Option<f64>,
    pub mem_used: Option<f64>,
    pub mem_available: Option<f64>,
}

/// Errors that can occur during history storage operations
#[derive(Debug, thiserror::Error)]
pub enum HistoryStoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HistoryStoreError>;

/// History storage backed by SQLite
pub struct HistoryStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl HistoryStore {
    /// Open or create the history database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA busy_timeout=5000;",
        )?;

        Self::with_connection(conn, Some(path.to_path_buf()))
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, None)
    }

    fn with_connection(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        let mut store = Self { conn, path };
        store.initialize_schema()?;
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the database file size in bytes
    pub fn size_bytes(&self) -> Result<u64> {
        match &self.path {
            Some(path) => Ok(std::fs::metadata(path)?.len()),
            None => Ok(0),
        }
    }

    fn initialize_schema(&mut self) -> Result<()> {
        if self.get_schema_version()? == 0 {
            self.create_initial_schema()?;
        }
        Ok(())
    }

    /// Get the current schema version (0 if not initialized)
    fn get_schema_version(&self) -> Result<i32> {
        let exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )?;

        if !exists {
            return Ok(0);
        }

        let version: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        Ok(version)
    }

    fn create_initial_schema(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute_batch(
            r#"
            CREATE TABLE schema_version (
                version INTEGER NOT NULL
            );

            -- One row per persisted record; the full record lives in data
            CREATE TABLE samples (
                id INTEGER PRIMARY KEY,
                timestamp INTEGER NOT NULL,
                cpu_load REAL,
                cpu_temp REAL,
                gpu_load REAL,
                vram_load REAL,
                average_gpu REAL,
                mem_used INTEGER,
                mem_available INTEGER,
                data TEXT NOT NULL
            );

            CREATE INDEX idx_samples_timestamp ON samples(timestamp);
            "#,
        )?;

        tx.execute(
            "INSERT INTO schema_version (version) VALUES (?)",
            [CURRENT_SCHEMA_VERSION],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Persist a record stamped with the current time
    pub fn record(&self, record: &MetricRecord) -> Result<i64> {
        self.record_at(record, Utc::now().timestamp())
    }

    pub fn record_at(&self, record: &MetricRecord, timestamp: i64) -> Result<i64> {
        let sample = StoredSample::from_record(record, timestamp)?;
        self.conn.execute(
            "INSERT INTO samples (timestamp, cpu_load, cpu_temp, gpu_load, vram_load,
                                  average_gpu, mem_used, mem_available, data)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                sample.timestamp,
                sample.cpu_load,
                sample.cpu_temp,
                sample.gpu_load,
                sample.vram_load,
                sample.average_gpu,
                sample.mem_used,
                sample.mem_available,
                sample.data,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get samples in a time range
    pub fn get_samples(&self, from: i64, to: i64) -> Result<Vec<StoredSample>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, cpu_load, cpu_temp, gpu_load, vram_load,
                    average_gpu, mem_used, mem_available, data
             FROM samples
             WHERE timestamp >= ? AND timestamp <= ?
             ORDER BY timestamp ASC",
        )?;

        let samples = stmt
            .query_map(params![from, to], |row| {
                Ok(StoredSample {
                    id: Some(row.get(0)?),
                    timestamp: row.get(1)?,
                    cpu_load: row.get(2)?,
                    cpu_temp: row.get(3)?,
                    gpu_load: row.get(4)?,
                    vram_load: row.get(5)?,
                    average_gpu: row.get(6)?,
                    mem_used: row.get(7)?,
                    mem_available: row.get(8)?,
                    data: row.get(9)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(samples)
    }

    /// Average the promoted columns over each window ending now
    pub fn windowed_average(&self, windows: &[Duration]) -> Result<Vec<WindowAverage>> {
        self.windowed_average_at(Utc::now().timestamp(), windows)
    }

    pub fn windowed_average_at(
        &self,
        now: i64,
        windows: &[Duration],
    ) -> Result<Vec<WindowAverage>> {
        let mut stmt = self.conn.prepare(
            "SELECT COUNT(*), AVG(cpu_load), AVG(gpu_load), AVG(vram_load),
                    AVG(average_gpu), AVG(mem_used), AVG(mem_available)
             FROM samples
             WHERE timestamp > ? AND timestamp <= ?",
        )?;

        windows
            .iter()
            .map(|window| -> Result<WindowAverage> {
                let since = window_start(now, *window);
                let average = stmt.query_row(params![since, now], |row| {
                    Ok(WindowAverage {
                        window: *window,
                        sample_count: row.get(0)?,
                        cpu_load: row.get(1)?,
                        gpu_load: row.get(2)?,
                        vram_load: row.get(3)?,
                        average_gpu: row.get(4)?,
                        mem_used: row.get(5)?,
                        mem_available: row.get(6)?,
                    })
                })?;
                Ok(average)
            })
            .collect()
    }

    /// Get database statistics
    pub fn get_stats(&self) -> Result<DatabaseStats> {
        let (sample_count, oldest_sample, newest_sample): (i64, Option<i64>, Option<i64>) =
            self.conn.query_row(
                "SELECT COUNT(*), MIN(timestamp), MAX(timestamp) FROM samples",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;

        Ok(DatabaseStats {
            sample_count,
            oldest_sample,
            newest_sample,
            size_bytes: self.size_bytes()?,
        })
    }
}

/// Start of the window ending at `now`, clamped for windows longer than the
/// representable timestamp range.
pub fn window_start(now: i64, window: Duration) -> i64 {
    now.saturating_sub(i64::try_from(window.as_secs()).unwrap_or(i64::MAX))
}

/// Database statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub sample_count: i64,
    pub oldest_sample: Option<i64>,
    pub newest_sample: Option<i64>,
    pub size_bytes: u64,
}

impl DatabaseStats {
    /// Format size as human-readable string
    pub fn size_formatted(&self) -> String {
        ByteSize::b(self.size_bytes).to_string()
    }
}
