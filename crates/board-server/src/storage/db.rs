//! SQLite record store (embedded, no external dependencies)
//!
//! Every record is one row holding its JSON form. Filters are pushed down
//! with `json_extract`, guarded by `json_type` so a number never compares
//! against text.

use anyhow::{Context, Result};
use async_trait::async_trait;
use board_core::{BoardError, FieldValue, Query, Record, RecordStore, StoredRecord};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    pub async fn new(database_path: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        if let Some(parent) = std::path::Path::new(database_path).parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_path)
            })?;

        tracing::info!("SQLite connection established, running migrations...");

        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Database initialization complete");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                key TEXT PRIMARY KEY,
                body TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

fn unavailable(e: sqlx::Error) -> BoardError {
    BoardError::StoreUnavailable(e.to_string())
}

fn select_sql(query: &Query) -> String {
    let mut sql = String::from("SELECT key, body FROM records");

    for (i, filter) in query.filters.iter().enumerate() {
        sql.push_str(if i == 0 { " WHERE " } else { " AND " });
        sql.push_str("(json_type(body, ?) = ? AND json_extract(body, ?) ");
        sql.push_str(filter.op.as_sql());
        sql.push_str(" ?)");
    }

    // SQLite treats a negative LIMIT as no limit.
    sql.push_str(" LIMIT ?");
    sql
}

#[async_trait]
impl RecordStore for Database {
    async fn get(&self, key: &str) -> board_core::Result<Option<Record>> {
        let row: Option<RecordRow> = sqlx::query_as(
            r#"
            SELECT key, body FROM records WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&*self.pool)
        .await
        .map_err(unavailable)?;

        row.map(|r| r.into_stored().map(|s| s.record)).transpose()
    }

    async fn query(&self, query: &Query) -> board_core::Result<Vec<StoredRecord>> {
        let sql = select_sql(query);
        let mut statement = sqlx::query_as::<sqlx::Sqlite, RecordRow>(&sql);

        for filter in &query.filters {
            let path = format!("$.{}", filter.field);
            let json_type = match filter.value {
                FieldValue::Int(_) => "integer",
                FieldValue::Text(_) => "text",
            };
            statement = statement.bind(path.clone()).bind(json_type).bind(path);
            statement = match &filter.value {
                FieldValue::Int(v) => statement.bind(*v),
                FieldValue::Text(v) => statement.bind(v.clone()),
            };
        }

        let limit = query.limit.map(|l| l as i64).unwrap_or(-1);
        let rows = statement
            .bind(limit)
            .fetch_all(&*self.pool)
            .await
            .map_err(unavailable)?;

        rows.into_iter().map(RecordRow::into_stored).collect()
    }

    async fn insert(&self, record: &Record) -> board_core::Result<String> {
        let key = uuid::Uuid::new_v4().simple().to_string();

        sqlx::query(
            r#"
            INSERT INTO records (key, body) VALUES (?1, ?2)
            "#,
        )
        .bind(&key)
        .bind(serde_json::to_string(record)?)
        .execute(&*self.pool)
        .await
        .map_err(unavailable)?;

        Ok(key)
    }

    async fn put(&self, key: &str, record: &Record) -> board_core::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO records (key, body) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET body = excluded.body
            "#,
        )
        .bind(key)
        .bind(serde_json::to_string(record)?)
        .execute(&*self.pool)
        .await
        .map_err(unavailable)?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> board_core::Result<()> {
        sqlx::query(
            r#"
            DELETE FROM records WHERE key = ?1
            "#,
        )
        .bind(key)
        .execute(&*self.pool)
        .await
        .map_err(unavailable)?;

        Ok(())
    }
}

// Helper struct for sqlx query_as
#[derive(sqlx::FromRow)]
struct RecordRow {
    key: String,
    body: String,
}

impl RecordRow {
    fn into_stored(self) -> board_core::Result<StoredRecord> {
        Ok(StoredRecord {
            record: serde_json::from_str(&self.body)?,
            key: self.key,
        })
    }
}
