//! Model-generated rollback scripts.
//!
//! [`RollbackCoordinator::generate_rollback`] never fails outward. Missing
//! credentials, transport failures and replies that are not SQL all end up in
//! [`RollbackResult::error`]. Scripts are advisory and need human review.

use serde::Serialize;
use sqlparser::parser::Parser;
use tracing::{debug, warn};

use crate::{
    error::{SafetyError, malformed_response_error},
    llm::{ModelSelection, strip_code_fences},
    query::{SqlDialect, StatementClassification, StatementType}
};

/// Error text for statements that need no rollback
pub const NOT_APPLICABLE: &str = "Not applicable";

/// Dialects a generated script may be written in
const SCRIPT_DIALECTS: [SqlDialect; 4] = [
    SqlDialect::Generic,
    SqlDialect::PostgreSQL,
    SqlDialect::MySQL,
    SqlDialect::DuckDB
];

/// Generated script or the reason there is none; exactly one is set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollbackResult {
    pub script: Option<String>,
    pub error:  Option<String>
}

impl RollbackResult {
    pub fn script(script: impl Into<String>) -> Self {
        Self {
            script: Some(script.into()),
            error:  None
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            script: None,
            error:  Some(error.into())
        }
    }

    pub fn not_applicable() -> Self {
        Self::failed(NOT_APPLICABLE)
    }

    pub fn is_success(&self) -> bool {
        self.script.is_some()
    }
}

/// Asks the selected model for an inverse statement
#[derive(Debug, Clone)]
pub struct RollbackCoordinator {
    model: ModelSelection
}

impl RollbackCoordinator {
    pub fn new(model: ModelSelection) -> Self {
        Self {
            model
        }
    }

    /// Generate a rollback script for `sql`
    ///
    /// Read-only statements short-circuit to [`NOT_APPLICABLE`] without
    /// contacting the model.
    pub async fn generate_rollback(&self, sql: &str, classification: &StatementClassification) -> RollbackResult {
        if classification.is_read_only() {
            return RollbackResult::not_applicable();
        }
        match self.request_script(sql, classification).await {
            Ok(script) => RollbackResult::script(script),
            Err(err) => {
                warn!(code = err.code(), stage = err.stage(), error = %err, "rollback generation failed");
                RollbackResult::failed(err.to_string())
            }
        }
    }

    async fn request_script(&self, sql: &str, classification: &StatementClassification) -> Result<String, SafetyError> {
        let model = self.model.model()?;
        let prompt = build_rollback_prompt(sql, classification);
        let reply = model.complete(&prompt).await?;
        debug!(provider = model.name(), reply_len = reply.len(), "rollback reply received");

        let script = strip_code_fences(&reply);
        if !is_plausible_sql(&script) {
            return Err(malformed_response_error(
                "Model reply is not a SQL script",
                reply
            ));
        }
        Ok(script)
    }
}

/// Provider-agnostic rollback prompt
pub fn build_rollback_prompt(sql: &str, classification: &StatementClassification) -> String {
    let columns: Vec<String> = classification
        .columns_by_table
        .iter()
        .filter(|(_, cols)| !cols.is_empty())
        .map(|(table, cols)| {
            let names: Vec<&str> = cols.iter().map(|c| c.as_str()).collect();
            format!("{}({})", table, names.join(", "))
        })
        .collect();
    let columns = if columns.is_empty() {
        String::from("implicit / all columns")
    } else {
        columns.join("; ")
    };

    let caveat = match classification.statement_type {
        StatementType::Drop | StatementType::Truncate => {
            "\nThis statement destroys data and has no data-preserving inverse. Do NOT invent \
             the lost rows. State this limitation in a SQL comment, then give only what can be \
             restored (for example recreating the structure) and recommend restoring from a \
             backup.\n"
        }
        _ => ""
    };

    format!(
        "You are a Senior Database Engineer. Generate an IDEMPOTENT rollback SQL script that \
         undoes the following SQL statement.\n\n\
         Requirements:\n\
         1. The script MUST be idempotent (safe to run more than once)\n\
         2. The script MUST be syntactically correct SQL\n\
         3. UPDATE: restore the previous values\n\
         4. DELETE: restore the deleted rows, or describe a backup/restore approach\n\
         5. INSERT: remove the inserted rows\n\
         6. ALTER/DROP/TRUNCATE: recreate the object or restore from backup\n\
         7. Explain what the rollback does, and any limitation, in SQL comments\n\
         {caveat}\n\
         Original SQL Statement:\n```sql\n{sql}\n```\n\n\
         Statement Type: {kind}\n\
         Affected Tables: {tables}\n\
         Affected Columns: {columns}\n\
         Has WHERE clause: {has_where}\n\n\
         If the rollback needs data that may not be available (such as previous values), say \
         so in comments and suggest taking a backup first. Return ONLY the SQL script.",
        caveat = caveat,
        sql = sql.trim(),
        kind = classification.statement_type,
        tables = if classification.tables.is_empty() {
            String::from("Unknown")
        } else {
            classification.table_list()
        },
        columns = columns,
        has_where = if classification.has_where_clause { "yes" } else { "no" }
    )
}

/// Whether a reply is SQL rather than prose or a refusal
///
/// The script must parse in at least one common dialect. A script made only
/// of comments parses to nothing and passes: that is how an honest "no
/// inverse exists" answer looks.
pub fn is_plausible_sql(script: &str) -> bool {
    let trimmed = script.trim();
    if trimmed.is_empty() {
        return false;
    }
    SCRIPT_DIALECTS.iter().any(|dialect| {
        let parser_dialect = dialect.into_parser_dialect();
        Parser::parse_sql(parser_dialect.as_ref(), trimmed).is_ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plausible_sql() {
        assert!(is_plausible_sql("UPDATE users SET status = 'active';"));
        assert!(is_plausible_sql("-- restores rows\nINSERT INTO t VALUES (1);"));
        assert!(is_plausible_sql("/* header */\nbegin;\ndelete from t;\ncommit;"));
        assert!(is_plausible_sql("-- DROP TABLE has no data-preserving inverse.\n-- Restore from backup."));
    }

    #[test]
    fn test_prose_rejected() {
        assert!(!is_plausible_sql(""));
        assert!(!is_plausible_sql("I'm sorry, I cannot generate a rollback for this."));
        assert!(!is_plausible_sql("Here is the rollback script you asked for"));
    }

    #[test]
    fn test_prose_opening_with_keyword_rejected() {
        assert!(!is_plausible_sql(
            "Delete operations cannot be reversed without a backup. Please restore the table from your latest snapshot."
        ));
        assert!(!is_plausible_sql("Update the status column back to its old values manually."));
    }
}
