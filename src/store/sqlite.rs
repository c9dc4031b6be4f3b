use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

use super::{MappingStore, StoreError};
use crate::models::UrlMapping;

/// SQL text for one mapping table. The table name is configurable, so the
/// statements are rendered once at construction instead of being literals.
#[derive(Debug)]
struct Statements {
    create_table: String,
    insert: String,
    select: String,
    increment: String,
}

impl Statements {
    fn for_table(table: &str) -> Self {
        Self {
            create_table: format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    short_url    TEXT PRIMARY KEY NOT NULL,
                    long_url     TEXT NOT NULL,
                    created_at   TEXT NOT NULL,
                    access_count INTEGER NOT NULL DEFAULT 0
                )"
            ),
            insert: format!(
                "INSERT INTO {table} (short_url, long_url, created_at, access_count)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (short_url) DO NOTHING"
            ),
            select: format!(
                "SELECT short_url, long_url, created_at, access_count
                 FROM {table} WHERE short_url = ?1"
            ),
            increment: format!(
                "UPDATE {table} SET access_count = access_count + ?1 WHERE short_url = ?2"
            ),
        }
    }
}

/// `MappingStore` backed by a SQLite connection pool.
#[derive(Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
    sql: Statements,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `database_url` and make sure
    /// the mapping table exists.
    pub async fn connect(database_url: &str, table: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(
                database_url
                    .parse::<SqliteConnectOptions>()?
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal),
            )
            .await?;

        Self::new(pool, table).await
    }

    /// Wrap an existing pool. The caller is responsible for having validated
    /// `table` as a plain identifier.
    pub async fn new(pool: SqlitePool, table: &str) -> Result<Self, StoreError> {
        let sql = Statements::for_table(table);
        sqlx::query(&sql.create_table).execute(&pool).await?;
        tracing::info!("Mapping table '{}' ready", table);
        Ok(Self { pool, sql })
    }

    /// Close every pooled connection. Used on shutdown once the server has drained.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl MappingStore for SqliteStore {
    async fn insert(&self, mapping: &UrlMapping) -> Result<(), StoreError> {
        let inserted = sqlx::query(&self.sql.insert)
            .bind(&mapping.short_url)
            .bind(&mapping.long_url)
            .bind(mapping.created_at)
            .bind(mapping.access_count)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if inserted == 0 {
            return Err(StoreError::Conflict(mapping.short_url.clone()));
        }
        Ok(())
    }

    async fn get(&self, short_url: &str) -> Result<Option<UrlMapping>, StoreError> {
        let mapping: Option<UrlMapping> = sqlx::query_as(&self.sql.select)
            .bind(short_url)
            .fetch_optional(&self.pool)
            .await?;

        Ok(mapping)
    }

    async fn increment(&self, short_url: &str, delta: i64) -> Result<(), StoreError> {
        let affected = sqlx::query(&self.sql.increment)
            .bind(delta)
            .bind(short_url)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(StoreError::Missing(short_url.to_owned()));
        }
        Ok(())
    }
}
