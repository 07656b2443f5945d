use std::time::Instant;

use tracing::debug_span;

/// What the engine reports after a successful execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub rows_affected: Option<u64>
}

/// Failure reported by the engine, as the engine phrased it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    pub message: String
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into()
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EngineError {}

impl From<duckdb::Error> for EngineError {
    fn from(err: duckdb::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Query engine used for dry runs.
///
/// Every call must run against an empty database that no other call can
/// observe.
pub trait QueryEngine: Send + Sync {
    fn execute(&self, sql: &str) -> Result<ExecutionOutcome, EngineError>;
}

/// Empty in-memory DuckDB database, created per call and dropped afterwards
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDbSandbox;

impl QueryEngine for DuckDbSandbox {
    fn execute(&self, sql: &str) -> Result<ExecutionOutcome, EngineError> {
        let span = debug_span!(
            "dry_run.exec",
            duration_ms = tracing::field::Empty
        );
        let _guard = span.enter();
        let start = Instant::now();

        let conn = duckdb::Connection::open_in_memory()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.execute(duckdb::params![])?;

        span.record("duration_ms", start.elapsed().as_millis() as u64);
        Ok(ExecutionOutcome {
            rows_affected: Some(rows as u64)
        })
    }
}
