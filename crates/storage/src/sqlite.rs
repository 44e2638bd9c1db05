//! SQLite-backed row store using sqlx.
//!
//! Rows live in `image_scans(depth REAL PRIMARY KEY, pixel_data BLOB)`;
//! dataset provenance lives in a `metadata(key, value)` table. The database
//! runs in WAL mode so the API can read while an ingestion run writes.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use depth_common::{DatasetMetadata, DepthFrameError, DepthFrameResult, ScanRow};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::metadata::build_metadata;
use crate::row_store::RowStore;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS image_scans (
        depth REAL PRIMARY KEY,
        pixel_data BLOB NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_depth ON image_scans(depth)",
    r#"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
    "#,
];

fn db_err(context: &str) -> impl FnOnce(sqlx::Error) -> DepthFrameError + '_ {
    move |e| DepthFrameError::DatabaseError(format!("{}: {}", context, e))
}

/// Persistent row store.
#[derive(Clone)]
pub struct SqliteRowStore {
    pool: SqlitePool,
}

impl SqliteRowStore {
    /// Open or create the store at the given path.
    pub async fn open(path: &Path) -> DepthFrameResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(db_err("Connection failed"))?;

        let store = Self { pool };
        store.initialize_schema().await?;

        info!(path = %path.display(), "Opened scan row database");
        Ok(store)
    }

    /// Open an in-memory database (for testing).
    pub async fn open_memory() -> DepthFrameResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(db_err("Invalid connection string"))?;

        // A single connection that never expires, otherwise the database vanishes.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(db_err("Connection failed"))?;

        let store = Self { pool };
        store.initialize_schema().await?;
        Ok(store)
    }

    async fn initialize_schema(&self) -> DepthFrameResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(db_err("Migration failed"))?;
        }
        Ok(())
    }

    /// Insert rows in a single transaction, replacing rows at existing depths.
    ///
    /// All rows must share the width of the first row.
    pub async fn bulk_insert_rows(&self, rows: &[ScanRow]) -> DepthFrameResult<usize> {
        let Some(first) = rows.first() else {
            return Ok(0);
        };
        let expected = first.width();
        if let Some(bad) = rows.iter().find(|r| r.width() != expected) {
            return Err(DepthFrameError::InconsistentWidth {
                depth: bad.depth,
                expected,
                actual: bad.width(),
            });
        }

        let mut tx = self.pool.begin().await.map_err(db_err("Begin failed"))?;
        for row in rows {
            sqlx::query("INSERT OR REPLACE INTO image_scans (depth, pixel_data) VALUES (?, ?)")
                .bind(row.depth)
                .bind(row.pixels.as_slice())
                .execute(&mut *tx)
                .await
                .map_err(db_err("Insert failed"))?;
        }
        tx.commit().await.map_err(db_err("Commit failed"))?;

        debug!(rows = rows.len(), width = expected, "Inserted scan rows");
        Ok(rows.len())
    }

    pub async fn set_metadata(&self, key: &str, value: &str) -> DepthFrameResult<()> {
        sqlx::query("INSERT OR REPLACE INTO metadata (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(db_err("Update failed"))?;
        Ok(())
    }

    pub async fn get_metadata_value(&self, key: &str) -> DepthFrameResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT value FROM metadata WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Query failed"))
    }

    pub async fn all_metadata(&self) -> DepthFrameResult<BTreeMap<String, String>> {
        let rows = sqlx::query_as::<_, (String, String)>("SELECT key, value FROM metadata")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Query failed"))?;
        Ok(rows.into_iter().collect())
    }

    async fn first_row_width(&self) -> DepthFrameResult<Option<usize>> {
        let width = sqlx::query_scalar::<_, i64>(
            "SELECT length(pixel_data) FROM image_scans ORDER BY depth LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Query failed"))?;
        Ok(width.map(|w| w as usize))
    }

    /// Close the pool, flushing the WAL.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl RowStore for SqliteRowStore {
    async fn rows_in_range(&self, depth_min: f64, depth_max: f64) -> DepthFrameResult<Vec<ScanRow>> {
        let rows = sqlx::query_as::<_, (f64, Vec<u8>)>(
            "SELECT depth, pixel_data FROM image_scans WHERE depth >= ? AND depth <= ? ORDER BY depth",
        )
        .bind(depth_min)
        .bind(depth_max)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Query failed"))?;

        Ok(rows
            .into_iter()
            .map(|(depth, pixels)| ScanRow { depth, pixels })
            .collect())
    }

    async fn get_metadata(&self) -> DepthFrameResult<DatasetMetadata> {
        let row_count = self.row_count().await?;
        let bounds = self.depth_bounds().await?;
        let first_width = self.first_row_width().await?;
        let entries = self.all_metadata().await?;
        build_metadata(entries, row_count, bounds, first_width)
    }

    async fn depth_bounds(&self) -> DepthFrameResult<Option<(f64, f64)>> {
        let (min, max) = sqlx::query_as::<_, (Option<f64>, Option<f64>)>(
            "SELECT MIN(depth), MAX(depth) FROM image_scans",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Query failed"))?;

        Ok(min.zip(max))
    }

    async fn row_count(&self) -> DepthFrameResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM image_scans")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Query failed"))?;
        Ok(count as u64)
    }
}
