//! Structured validation: the whole assessment comes from one model call.
//!
//! The chain has three stages, and any of them failing aborts the run:
//!
//! 1. build a prompt from the schema summary, the SQL and the engine's
//!    [`EngineValidation`]
//! 2. send it to the selected model
//! 3. parse the reply as a JSON object with `risk_level`, `warnings` and
//!    `rollback_sql`
//!
//! A reply that is not such an object yields
//! [`SafetyError::MalformedResponse`] carrying the raw text. There is no
//! retry and no partial result.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    dry_run::{DryRunCoordinator, DuckDbSandbox, EngineValidation, QueryEngine},
    error::{SafetyError, malformed_response_error},
    llm::{ModelSelection, strip_code_fences},
    schema::Schema
};

/// The object the model is asked to return
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelAssessment {
    pub risk_level:   String,
    pub warnings:     Vec<String>,
    pub rollback_sql: String
}

/// Output of the structured pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredValidationResult {
    pub risk_level:        String,
    pub warnings:          Vec<String>,
    pub rollback_sql:      String,
    pub duckdb_validation: EngineValidation
}

/// Single-call validation pipeline
#[derive(Debug, Clone)]
pub struct StructuredValidationChain<E = DuckDbSandbox> {
    model:          ModelSelection,
    dry_run:        DryRunCoordinator<E>,
    schema_summary: String
}

impl StructuredValidationChain<DuckDbSandbox> {
    /// Chain over the DuckDB sandbox and the built-in mock schema
    pub fn new(model: ModelSelection) -> Self {
        Self::with_parts(model, DryRunCoordinator::new(), &Schema::mock())
    }
}

impl<E: QueryEngine> StructuredValidationChain<E> {
    pub fn with_parts(model: ModelSelection, dry_run: DryRunCoordinator<E>, schema: &Schema) -> Self {
        Self {
            model,
            dry_run,
            schema_summary: schema.to_summary()
        }
    }

    /// Replace the schema shown to the model
    pub fn with_schema(mut self, schema: &Schema) -> Self {
        self.schema_summary = schema.to_summary();
        self
    }

    pub fn schema_summary(&self) -> &str {
        &self.schema_summary
    }
}

impl<E: QueryEngine + Clone + 'static> StructuredValidationChain<E> {
    /// Run all three stages for one statement
    ///
    /// Fails with [`SafetyError::Configuration`] before touching the engine
    /// when no model is configured.
    pub async fn validate(&self, sql: &str) -> Result<StructuredValidationResult, SafetyError> {
        let model = self.model.model()?;

        let engine_validation = self.dry_run.spawn_validate(sql).await;
        debug!(
            syntax_valid = engine_validation.syntax_valid,
            dry_run_successful = engine_validation.dry_run_successful,
            "engine validation finished"
        );

        let prompt = build_validation_prompt(&self.schema_summary, sql, &engine_validation);
        let reply = model.complete(&prompt).await?;
        let assessment = parse_assessment(&reply)?;
        info!(provider = model.name(), risk_level = %assessment.risk_level, "structured validation finished");

        Ok(StructuredValidationResult {
            risk_level:        assessment.risk_level,
            warnings:          assessment.warnings,
            rollback_sql:      assessment.rollback_sql,
            duckdb_validation: engine_validation
        })
    }
}

/// Composite prompt for the structured pipeline
pub fn build_validation_prompt(schema_summary: &str, sql: &str, validation: &EngineValidation) -> String {
    let validation_json =
        serde_json::to_string_pretty(validation).unwrap_or_else(|_| format!("{:?}", validation));
    format!(
        "You are a Senior Database Engineer specializing in SQL safety analysis.\n\n\
         Context:\n{schema}\n\
         Analyze the SQL statement below and respond with a JSON object with exactly these keys:\n\
         1. risk_level: \"Low\", \"Medium\", or \"High\"\n\
         \x20  - Low: SELECT statements (read-only)\n\
         \x20  - Medium: UPDATE, DELETE, INSERT statements\n\
         \x20  - High: ALTER, DROP, TRUNCATE statements\n\
         2. warnings: array of strings explaining potential risks\n\
         \x20  - flag missing WHERE clauses in UPDATE/DELETE\n\
         \x20  - flag DDL operations that modify structure\n\
         \x20  - flag operations that affect all rows\n\
         3. rollback_sql: SQL script that undoes the operation (idempotent)\n\
         \x20  - UPDATE: restore previous values\n\
         \x20  - DELETE: re-insert the deleted rows if possible\n\
         \x20  - INSERT: delete the inserted rows\n\
         \x20  - DDL: restoration script or backup recommendation\n\n\
         Return ONLY valid JSON, no markdown formatting.\n\n\
         SQL Statement:\n```sql\n{sql}\n```\n\n\
         DuckDB Validation:\n{validation}",
        schema = schema_summary,
        sql = sql.trim(),
        validation = validation_json
    )
}

/// Parse a model reply into a [`ModelAssessment`]
///
/// Code fences around the JSON are tolerated. Anything else (prose, a JSON
/// array, missing keys, wrong types) is a malformed response.
pub fn parse_assessment(reply: &str) -> Result<ModelAssessment, SafetyError> {
    let body = strip_code_fences(reply);
    serde_json::from_str(&body)
        .map_err(|e| malformed_response_error(format!("Expected JSON assessment: {}", e), reply))
}
