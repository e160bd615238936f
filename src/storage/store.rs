use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use tracing::info;

use crate::analysis::AnalysisReport;
use crate::config::DatabaseConfig;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS analyses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    video_id TEXT NOT NULL,
    video_title TEXT,
    total_comments INTEGER,
    positive_count INTEGER,
    negative_count INTEGER,
    analysis_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    results TEXT
)";

/// One row per completed analysis, keyed by an auto-incrementing id.
#[derive(Clone)]
pub struct AnalysisStore {
    pool: SqlitePool,
}

/// Listing row; the serialized report stays in the table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnalysisSummary {
    pub id: i64,
    pub video_id: String,
    pub video_title: String,
    pub total_comments: i64,
    pub positive_count: i64,
    pub negative_count: i64,
    pub analysis_date: DateTime<Utc>,
}

/// A stored analysis with its full report deserialized back out.
#[derive(Debug, Clone, Serialize)]
pub struct StoredAnalysis {
    #[serde(flatten)]
    pub summary: AnalysisSummary,
    pub results: AnalysisReport,
}

#[derive(FromRow)]
struct AnalysisRow {
    id: i64,
    video_id: String,
    video_title: String,
    total_comments: i64,
    positive_count: i64,
    negative_count: i64,
    analysis_date: DateTime<Utc>,
    results: String,
}

impl AnalysisStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .context("Failed to open SQLite database")?;

        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .context("Failed to create analyses table")?;

        info!("SQLite store ready at {}", config.path.display());
        Ok(Self { pool })
    }

    #[cfg(test)]
    pub(crate) async fn open_in_memory() -> Self {
        // A single connection keeps every query on the same in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory SQLite opens");
        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .expect("schema applies");
        Self { pool }
    }

    pub async fn insert(&self, report: &AnalysisReport) -> Result<i64> {
        let results =
            serde_json::to_string(report).context("Failed to serialize analysis report")?;
        let stats = &report.statistics;

        let row = sqlx::query(
            "INSERT INTO analyses \
             (video_id, video_title, total_comments, positive_count, negative_count, analysis_date, results) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&report.video_info.id)
        .bind(&report.video_info.title)
        .bind(stats.total_comments as i64)
        .bind(stats.positive_count as i64)
        .bind(stats.negative_count as i64)
        .bind(Utc::now())
        .bind(results)
        .execute(&self.pool)
        .await
        .context("Failed to insert analysis")?;

        Ok(row.last_insert_rowid())
    }

    pub async fn get(&self, id: i64) -> Result<Option<StoredAnalysis>> {
        let row: Option<AnalysisRow> = sqlx::query_as(
            "SELECT id, video_id, video_title, total_comments, positive_count, negative_count, \
             analysis_date, results \
             FROM analyses WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to load analysis")?;

        row.map(|row| {
            let results = serde_json::from_str(&row.results)
                .context("Stored analysis report is not valid JSON")?;
            Ok(StoredAnalysis {
                summary: AnalysisSummary {
                    id: row.id,
                    video_id: row.video_id,
                    video_title: row.video_title,
                    total_comments: row.total_comments,
                    positive_count: row.positive_count,
                    negative_count: row.negative_count,
                    analysis_date: row.analysis_date,
                },
                results,
            })
        })
        .transpose()
    }

    pub async fn list(&self) -> Result<Vec<AnalysisSummary>> {
        sqlx::query_as(
            "SELECT id, video_id, video_title, total_comments, positive_count, negative_count, \
             analysis_date \
             FROM analyses ORDER BY analysis_date DESC",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list analyses")
    }
}
