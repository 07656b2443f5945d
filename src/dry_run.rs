//! Dry-run simulation against an empty in-memory engine.
//!
//! [`DryRunCoordinator`] never fails outward: every engine failure is folded
//! into a [`DryRunResult`] or an [`EngineValidation`].
//!
//! Because the sandbox holds no tables, most statements touching real data
//! fail with a missing-relation error. That case is expected and reported
//! with a [`MISSING_RELATION_NOTE`] instead of being treated as a SQL error.
//! Which failures count as "missing relation" is decided by
//! [`FailureKind::of`] and nowhere else.

mod engine;

use std::sync::LazyLock;

pub use engine::{DuckDbSandbox, EngineError, ExecutionOutcome, QueryEngine};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::SafetyError;

/// Note attached when the sandbox lacks the referenced tables
pub const MISSING_RELATION_NOTE: &str = "Dry run could not execute because referenced tables do not exist in this sandbox; this does not indicate a SQL error.";

static MISSING_RELATION: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\b(table|relation|view)\b(\s+with\s+name)?\s+("[^"]*"|\S+)\s+(does not exist|not found)|no such table"#
    )
    .ok()
});

static SYNTAX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)(syntax error|parser error|parse error)").ok());

/// Coarse category of an engine failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A referenced table or view is absent from the sandbox
    MissingRelation,
    /// The engine could not parse the statement
    Syntax,
    Other
}

impl FailureKind {
    /// Classify an engine error message
    pub fn of(message: &str) -> Self {
        let matches = |re: &LazyLock<Option<Regex>>| {
            re.as_ref().is_some_and(|re| re.is_match(message))
        };
        if matches(&SYNTAX) {
            Self::Syntax
        } else if matches(&MISSING_RELATION) {
            Self::MissingRelation
        } else {
            Self::Other
        }
    }
}

/// Outcome of simulating one statement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DryRunResult {
    pub simulation_successful:   bool,
    pub estimated_rows_affected: Option<u64>,
    /// Set only for expected limitations of the sandbox
    pub note:                    Option<String>,
    pub error:                   Option<String>
}

/// Engine verdict embedded in structured validation results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct EngineValidation {
    pub syntax_valid:       bool,
    pub dry_run_successful: bool,
    pub error:              Option<String>
}

/// Runs statements through a [`QueryEngine`] and normalises the outcome
#[derive(Debug, Clone, Default)]
pub struct DryRunCoordinator<E = DuckDbSandbox> {
    engine: E
}

impl DryRunCoordinator<DuckDbSandbox> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: QueryEngine> DryRunCoordinator<E> {
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Simulate a statement
    pub fn simulate(&self, sql: &str) -> DryRunResult {
        match self.engine.execute(sql) {
            Ok(outcome) => {
                debug!(rows = ?outcome.rows_affected, "dry run succeeded");
                DryRunResult {
                    simulation_successful:   true,
                    estimated_rows_affected: outcome.rows_affected,
                    note:                    None,
                    error:                   None
                }
            }
            Err(err) => match FailureKind::of(&err.message) {
                FailureKind::MissingRelation => {
                    debug!(error = %err, "dry run skipped: relation missing in sandbox");
                    DryRunResult {
                        simulation_successful:   false,
                        estimated_rows_affected: None,
                        note:                    Some(MISSING_RELATION_NOTE.to_string()),
                        error:                   Some(err.message)
                    }
                }
                FailureKind::Syntax | FailureKind::Other => {
                    let failure = SafetyError::Simulation(err.message.clone());
                    warn!(code = failure.code(), error = %err, "dry run failed");
                    DryRunResult {
                        simulation_successful:   false,
                        estimated_rows_affected: None,
                        note:                    None,
                        error:                   Some(err.message)
                    }
                }
            }
        }
    }

    /// Syntax and executability verdict for the structured pipeline
    ///
    /// Only a syntax failure marks the statement invalid; any other failure
    /// (usually a missing table) leaves it syntactically valid but not run.
    pub fn validate(&self, sql: &str) -> EngineValidation {
        match self.engine.execute(sql) {
            Ok(_) => EngineValidation {
                syntax_valid:       true,
                dry_run_successful: true,
                error:              None
            },
            Err(err) => EngineValidation {
                syntax_valid:       FailureKind::of(&err.message) != FailureKind::Syntax,
                dry_run_successful: false,
                error:              Some(err.message)
            }
        }
    }
}

impl<E: QueryEngine + Clone + 'static> DryRunCoordinator<E> {
    /// [`simulate`](Self::simulate) on the blocking thread pool
    pub async fn spawn_simulate(&self, sql: &str) -> DryRunResult {
        let coordinator = self.clone();
        let sql = sql.to_string();
        tokio::task::spawn_blocking(move || coordinator.simulate(&sql))
            .await
            .unwrap_or_else(|err| {
                warn!(error = %err, "dry run task aborted");
                DryRunResult {
                    error: Some(format!("Dry run task failed: {}", err)),
                    ..DryRunResult::default()
                }
            })
    }

    /// [`validate`](Self::validate) on the blocking thread pool
    pub async fn spawn_validate(&self, sql: &str) -> EngineValidation {
        let coordinator = self.clone();
        let sql = sql.to_string();
        tokio::task::spawn_blocking(move || coordinator.validate(&sql))
            .await
            .unwrap_or_else(|err| {
                warn!(error = %err, "engine validation task aborted");
                EngineValidation {
                    syntax_valid:       false,
                    dry_run_successful: false,
                    error:              Some(format!("Engine validation task failed: {}", err))
                }
            })
    }
}
