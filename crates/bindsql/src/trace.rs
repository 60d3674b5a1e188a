//! Per-request statement logging.
//!
//! [`TracedClient`] wraps any [`GenericClient`] together with the
//! [`TraceId`] of the unit of work it serves and emits one `tracing` event per
//! statement. Both are passed in explicitly; nothing is looked up from ambient
//! state.
//!
//! ```ignore
//! let trace_id = TraceId::new();
//! let conn = TracedClient::new(pool.get().await?, trace_id.clone());
//!
//! let mut q = sql("SELECT * FROM users WHERE ");
//! q.writep("id = {}", params![user_id]);
//! let user = q.fetch_one(&conn).await?;
//! ```

use crate::client::GenericClient;
use crate::error::SqlResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;
use tracing::Level;

/// Identifier correlating the statements of one request or job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceId(String);

impl TraceId {
    /// A random id: 16 bytes as 32 lowercase hex chars.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for TraceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Event settings for [`TracedClient`].
#[derive(Debug, Clone)]
pub struct TraceConfig {
    /// Level for successful statements. Failures are always `WARN`.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl TraceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    fn truncate_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => {
                let mut end = max;
                while end > 0 && !sql.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &sql[..end]).into()
            }
            _ => sql.into(),
        }
    }
}

/// A [`GenericClient`] that logs every statement with its trace id.
pub struct TracedClient<C> {
    client: C,
    trace_id: TraceId,
    config: TraceConfig,
}

impl<C: GenericClient> TracedClient<C> {
    pub fn new(client: C, trace_id: TraceId) -> Self {
        Self {
            client,
            trace_id,
            config: TraceConfig::default(),
        }
    }

    /// Set the event configuration.
    pub fn with_config(mut self, config: TraceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn trace_id(&self) -> &TraceId {
        &self.trace_id
    }

    /// Get a reference to the inner client.
    pub fn inner(&self) -> &C {
        &self.client
    }

    /// Get the inner client, consuming this wrapper.
    pub fn into_inner(self) -> C {
        self.client
    }

    fn record<T>(&self, sql: &str, param_count: usize, elapsed: Duration, result: &SqlResult<T>) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.config.truncate_sql(sql);
        let trace_id = self.trace_id.as_str();
        match result {
            Ok(_) => emit_at_level!(
                self.config.level,
                target: "bindsql.sql",
                trace_id,
                param_count,
                sql = %sql,
                duration = ?elapsed,
                "executed statement"
            ),
            Err(err) => tracing::warn!(
                target: "bindsql.sql",
                trace_id,
                param_count,
                sql = %sql,
                duration = ?elapsed,
                error = %err,
                "statement failed"
            ),
        }
    }
}

impl<C: GenericClient> GenericClient for TracedClient<C> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> SqlResult<Vec<Row>> {
        let start = Instant::now();
        let result = self.client.query(sql, params).await;
        self.record(sql, params.len(), start.elapsed(), &result);
        result
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> SqlResult<Row> {
        let start = Instant::now();
        let result = self.client.query_one(sql, params).await;
        self.record(sql, params.len(), start.elapsed(), &result);
        result
    }

    async fn query_opt(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> SqlResult<Option<Row>> {
        let start = Instant::now();
        let result = self.client.query_opt(sql, params).await;
        self.record(sql, params.len(), start.elapsed(), &result);
        result
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> SqlResult<u64> {
        let start = Instant::now();
        let result = self.client.execute(sql, params).await;
        self.record(sql, params.len(), start.elapsed(), &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SqlError;
    use crate::{Values, params, sql};

    struct DummyClient;

    impl GenericClient for DummyClient {
        async fn query(&self, _: &str, _: &[&(dyn ToSql + Sync)]) -> SqlResult<Vec<Row>> {
            Ok(vec![])
        }
        async fn query_one(&self, _: &str, _: &[&(dyn ToSql + Sync)]) -> SqlResult<Row> {
            Err(SqlError::not_found("no rows"))
        }
        async fn query_opt(&self, _: &str, _: &[&(dyn ToSql + Sync)]) -> SqlResult<Option<Row>> {
            Ok(None)
        }
        async fn execute(&self, _: &str, params: &[&(dyn ToSql + Sync)]) -> SqlResult<u64> {
            Ok(params.len() as u64)
        }
    }

    #[test]
    fn trace_id_is_hex() {
        let id = TraceId::new();
        assert_eq!(id.as_str().len(), 32);
        assert!(
            id.as_str()
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        );
        assert_ne!(id, TraceId::new());
    }

    #[test]
    fn trace_id_serializes_as_string() {
        let id = TraceId::from("abc123".to_string());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc123\"");
        assert_eq!(id.to_string(), "abc123");
    }

    #[test]
    fn truncates_on_char_boundary() {
        let config = TraceConfig::new().max_sql_length(4);
        assert_eq!(config.truncate_sql("SELECT 1"), "SELE...");
        assert_eq!(config.truncate_sql("SEL"), "SEL");
        assert_eq!(config.truncate_sql("ab€cd"), "ab...");
        assert_eq!(TraceConfig::new().no_truncate().truncate_sql("SELECT 1"), "SELECT 1");
    }

    #[tokio::test]
    async fn forwards_results_unchanged() {
        let conn = TracedClient::new(DummyClient, TraceId::from("t-1".to_string()))
            .with_config(TraceConfig::new().level(Level::INFO));
        assert_eq!(conn.trace_id().as_str(), "t-1");

        let mut q = sql("DELETE FROM sessions WHERE ");
        q.writep("user_id IN ({}, {}, {})", params![Values::new([1, 2, 3])]);

        assert_eq!(q.execute(&conn).await.unwrap(), 3);
        assert!(q.fetch_all(&conn).await.unwrap().is_empty());
        assert!(q.fetch_opt(&conn).await.unwrap().is_none());
        assert!(q.fetch_one(&conn).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn wraps_borrowed_clients() {
        let inner = DummyClient;
        let conn = TracedClient::new(&inner, TraceId::new());
        let q = sql("SELECT 1");
        assert_eq!(q.execute(&conn).await.unwrap(), 0);
        let _ = conn.into_inner();
    }
}
