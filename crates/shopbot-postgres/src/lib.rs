//! PostgreSQL adapter (sqlx).
//!
//! Implements the `shopbot-core` ActivityLog port over the `logs` table.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};

use shopbot_core::{
    activity::{now_local, ActivityLog, LogEntry},
    domain::UserProfile,
    errors::Error,
    Result,
};

const CREATE_LOGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS logs (
    user_id     BIGINT    NOT NULL,
    username    TEXT,
    first_name  TEXT,
    action      TEXT      NOT NULL,
    "timestamp" TIMESTAMP NOT NULL
)"#;

const INSERT_LOG: &str = r#"
INSERT INTO logs (user_id, username, first_name, action, "timestamp")
VALUES ($1, $2, $3, $4, $5)"#;

const SELECT_RECENT: &str = r#"
SELECT user_id, username, first_name, action, "timestamp"
FROM logs
ORDER BY "timestamp" DESC
LIMIT $1"#;

#[derive(Debug, FromRow)]
struct LogRow {
    user_id: i64,
    username: Option<String>,
    first_name: Option<String>,
    action: String,
    timestamp: NaiveDateTime,
}

impl From<LogRow> for LogEntry {
    fn from(row: LogRow) -> Self {
        Self {
            user_id: row.user_id,
            username: row.username,
            first_name: row.first_name.unwrap_or_default(),
            action: row.action,
            timestamp: row.timestamp,
        }
    }
}

#[derive(Clone)]
pub struct PgActivityLog {
    pool: PgPool,
}

impl PgActivityLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(map_err)?;
        Ok(Self::new(pool))
    }

    /// Create the `logs` table on a fresh database; existing tables are left alone.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_LOGS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        tracing::debug!("logs table ready");
        Ok(())
    }
}

fn map_err(e: sqlx::Error) -> Error {
    Error::Store(format!("postgres error: {e}"))
}

fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl ActivityLog for PgActivityLog {
    async fn record(&self, user: &UserProfile, action: &str) -> Result<()> {
        sqlx::query(INSERT_LOG)
            .bind(user.id.0)
            .bind(user.username.as_deref())
            .bind(&user.first_name)
            .bind(action)
            .bind(now_local())
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let rows: Vec<LogRow> = sqlx::query_as(SELECT_RECENT)
            .bind(limit_param(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(rows.into_iter().map(LogEntry::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn row_with_null_first_name_maps_to_empty() {
        let ts = NaiveDate::from_ymd_opt(2026, 1, 2)
            .and_then(|d| d.and_hms_opt(3, 4, 5))
            .unwrap();
        let entry = LogEntry::from(LogRow {
            user_id: 7,
            username: None,
            first_name: None,
            action: "start".to_string(),
            timestamp: ts,
        });
        assert_eq!(entry.first_name, "");
        assert_eq!(entry.display_line(), "2026-01-02 03:04:05 |  (@-) | start");
    }

    #[test]
    fn limit_is_clamped_to_bigint() {
        assert_eq!(limit_param(20), 20);
        assert_eq!(limit_param(usize::MAX), i64::MAX);
    }

    #[test]
    fn store_errors_map_to_store_variant() {
        assert!(matches!(map_err(sqlx::Error::PoolTimedOut), Error::Store(_)));
    }

    /// Pool pinned to a throwaway schema so the real `logs` table is never touched.
    async fn scratch_pool(url: &str, schema: &str) -> PgPool {
        let schema = schema.to_string();
        PgPoolOptions::new()
            .max_connections(1)
            .after_connect(move |conn, _meta| {
                let schema = schema.clone();
                Box::pin(async move {
                    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {schema}"))
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query(&format!("SET search_path TO {schema}"))
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(url)
            .await
            .unwrap()
    }

    // Needs a reachable PostgreSQL; skipped when DATABASE_URL is unset.
    #[tokio::test]
    async fn recent_returns_newest_first_and_respects_limit() {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping");
            return;
        };
        let schema = format!("shopbot_test_{}", std::process::id());
        let pool = scratch_pool(&url, &schema).await;
        let log = PgActivityLog::new(pool.clone());
        log.ensure_schema().await.unwrap();
        // Idempotent on an existing table.
        log.ensure_schema().await.unwrap();

        assert!(log.recent(20).await.unwrap().is_empty());

        let user = UserProfile {
            id: shopbot_core::domain::UserId(4_200_000_000),
            username: Some("ana".to_string()),
            first_name: "Ana".to_string(),
            is_bot: false,
        };
        for i in 0..25 {
            log.record(&user, &format!("klik_beli_p{i}")).await.unwrap();
            // Keep timestamps strictly increasing.
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let rows = log.recent(20).await.unwrap();
        let actions: Vec<String> = rows.iter().map(|r| r.action.clone()).collect();
        let expected: Vec<String> = (5..25).rev().map(|i| format!("klik_beli_p{i}")).collect();
        assert_eq!(actions, expected);
        assert!(rows.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
        assert!(rows.iter().all(|r| r.user_id == 4_200_000_000
            && r.username.as_deref() == Some("ana")
            && r.first_name == "Ana"));

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM logs")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(total, 25);

        sqlx::query(&format!("DROP SCHEMA {schema} CASCADE"))
            .execute(&pool)
            .await
            .unwrap();
    }
}
