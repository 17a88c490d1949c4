use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::{domain::UserProfile, Result};

/// Timestamp format used when listing log rows back to a chat.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the `logs` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub action: String,
    pub timestamp: NaiveDateTime,
}

impl LogEntry {
    pub fn new(user: &UserProfile, action: &str, timestamp: NaiveDateTime) -> Self {
        Self {
            user_id: user.id.0,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            action: action.to_string(),
            timestamp,
        }
    }

    /// `timestamp | first_name (@username) | action`
    pub fn display_line(&self) -> String {
        format!(
            "{} | {} (@{}) | {}",
            self.timestamp.format(LOG_TIMESTAMP_FORMAT),
            self.first_name,
            self.username.as_deref().unwrap_or("-"),
            self.action
        )
    }
}

/// Append-only store of notable user actions.
///
/// Each call is one logical unit of work; failures surface as `Error::Store`.
#[async_trait]
pub trait ActivityLog: Send + Sync {
    async fn record(&self, user: &UserProfile, action: &str) -> Result<()>;

    /// Newest first, at most `limit` rows.
    async fn recent(&self, limit: usize) -> Result<Vec<LogEntry>>;
}

/// Local wall-clock time, matching the `TIMESTAMP` (without time zone) column.
pub fn now_local() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
