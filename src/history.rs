//! Durable SQLite history store.
//!
//! Holds every persisted grade record plus the arithmetic calculation log.
//! Both tables are append-only; schema creation is idempotent.

use std::path::Path;
use std::str::FromStr;

use chrono::Local;
use sqlx::FromRow;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::error::PersistenceError;
use crate::record::{GradeRecord, TIMESTAMP_FORMAT};

/// One persisted grade record, as stored.
#[derive(Debug, Clone, FromRow)]
pub struct HistoryRow {
    pub id: i64,
    pub student_name: String,
    /// JSON object of subject name to mark.
    pub marks: String,
    pub total: f64,
    pub average: f64,
    pub final_grade: String,
    pub timestamp: String,
}

/// One logged arithmetic calculation.
#[derive(Debug, Clone, FromRow)]
pub struct CalculationRow {
    pub timestamp: String,
    pub operation: String,
    pub result: String,
}

pub struct HistoryStore {
    pool: SqlitePool,
}

impl HistoryStore {
    /// Opens (creating if missing) the history database at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        Self::connect(options).await
    }

    /// Opens a throwaway in-memory store.
    pub async fn in_memory() -> Result<Self, PersistenceError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        Self::connect(options).await
    }

    async fn connect(options: SqliteConnectOptions) -> Result<Self, PersistenceError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        let store = HistoryStore { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), PersistenceError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                student_name TEXT NOT NULL,
                marks TEXT NOT NULL,
                total REAL NOT NULL,
                average REAL NOT NULL,
                final_grade TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS calculations (
                timestamp TEXT NOT NULL,
                operation TEXT NOT NULL,
                result TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Appends one grade record and returns its assigned row id.
    pub async fn append(&self, record: &GradeRecord) -> Result<i64, PersistenceError> {
        let result = sqlx::query(
            "INSERT INTO history (student_name, marks, total, average, final_grade, timestamp)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.student_name)
        .bind(record.marks_json()?)
        .bind(record.total)
        .bind(record.average)
        .bind(record.grade.as_str())
        .bind(record.timestamp_string())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, student = %record.student_name, "History row appended");
        Ok(id)
    }

    /// Returns up to `limit` grade records, most recent first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<HistoryRow>, PersistenceError> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            "SELECT id, student_name, marks, total, average, final_grade, timestamp
             FROM history
             ORDER BY timestamp DESC, id DESC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Appends one arithmetic calculation to the log.
    pub async fn log_calculation(
        &self,
        operation: &str,
        result: f64,
    ) -> Result<(), PersistenceError> {
        sqlx::query("INSERT INTO calculations (timestamp, operation, result) VALUES (?, ?, ?)")
            .bind(Local::now().format(TIMESTAMP_FORMAT).to_string())
            .bind(operation)
            .bind(result.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Returns up to `limit` logged calculations, most recent first.
    pub async fn calculations(&self, limit: i64) -> Result<Vec<CalculationRow>, PersistenceError> {
        let rows = sqlx::query_as::<_, CalculationRow>(
            "SELECT timestamp, operation, result
             FROM calculations
             ORDER BY timestamp DESC, rowid DESC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
