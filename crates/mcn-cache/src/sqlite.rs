use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::{day_key, DailySignal, SignalCache};

const CREATE_TABLE: &str = r#"
create table if not exists daily_news_signal (
    symbol        text    not null,
    day           text    not null,
    sentiment     real    not null,
    article_count integer not null,
    primary key (symbol, day)
)
"#;

/// SQLite-backed cache. The schema is created on connect.
#[derive(Debug, Clone)]
pub struct SqliteSignalCache {
    pool: SqlitePool,
}

impl SqliteSignalCache {
    /// Open (creating if missing) a database file.
    pub async fn connect_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(opts)
            .await
            .with_context(|| format!("failed to open signal db at {}", path.display()))?;
        Self::from_pool(pool).await
    }

    /// Private in-memory database, one connection so every query sees it.
    pub async fn connect_in_memory() -> Result<Self> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("invalid sqlite memory url")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .context("failed to open in-memory signal db")?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .context("create daily_news_signal failed")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl SignalCache for SqliteSignalCache {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn get(&self, symbol: &str, day: NaiveDate) -> Result<Option<DailySignal>> {
        let row: Option<(f64, i64)> = sqlx::query_as::<_, (f64, i64)>(
            r#"
            select sentiment, article_count
            from daily_news_signal
            where symbol = ?1 and day = ?2
            "#,
        )
        .bind(symbol)
        .bind(day_key(day))
        .fetch_optional(&self.pool)
        .await
        .context("signal cache get failed")?;

        Ok(row.map(|(sentiment, count)| {
            DailySignal::new(sentiment, u32::try_from(count.max(0)).unwrap_or(u32::MAX))
        }))
    }

    async fn put(&self, symbol: &str, day: NaiveDate, signal: DailySignal) -> Result<()> {
        sqlx::query(
            r#"
            insert or replace into daily_news_signal (symbol, day, sentiment, article_count)
            values (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(symbol)
        .bind(day_key(day))
        .bind(signal.sentiment)
        .bind(i64::from(signal.article_count))
        .execute(&self.pool)
        .await
        .context("signal cache put failed")?;

        Ok(())
    }
}
