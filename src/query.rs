//! Statement classification.
//!
//! Turns raw SQL text into a [`StatementClassification`]: the statement's
//! primary verb, every table it touches, the columns it names per table and
//! whether it carries a WHERE clause. Parsing is delegated to [`sqlparser`];
//! text that does not parse into exactly one statement is rejected instead of
//! guessed at.
//!
//! # Example
//!
//! ```
//! use safesheet::query::{SqlDialect, StatementType, classify};
//!
//! let c = classify("UPDATE users SET status = 'inactive'", SqlDialect::Generic).unwrap();
//! assert_eq!(c.statement_type, StatementType::Update);
//! assert!(c.tables.contains("users"));
//! assert!(!c.has_where_clause);
//! ```

mod extract;
mod types;

use extract::{
    alter_operations, assignment_columns, collect_cte_names, collect_relations,
    extract_from_table_with_joins, set_expr_has_where
};
use sqlparser::{
    ast::{FromTable, Statement},
    dialect::{
        Dialect, DuckDbDialect, GenericDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect
    },
    parser::Parser
};
use tracing::debug;
pub use types::{AlterKind, AlterOperation, NameSet, StatementClassification, StatementType};

use crate::error::{SafetyError, parse_error};

/// SQL dialect for parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum SqlDialect {
    #[default]
    Generic,
    MySQL,
    PostgreSQL,
    SQLite,
    DuckDB
}

impl SqlDialect {
    /// Convert to sqlparser dialect for parsing
    pub fn into_parser_dialect(self) -> Box<dyn Dialect> {
        match self {
            Self::Generic => Box::new(GenericDialect {}),
            Self::MySQL => Box::new(MySqlDialect {}),
            Self::PostgreSQL => Box::new(PostgreSqlDialect {}),
            Self::SQLite => Box::new(SQLiteDialect {}),
            Self::DuckDB => Box::new(DuckDbDialect {})
        }
    }
}

/// Classify a single SQL statement
///
/// # Errors
///
/// Returns [`SafetyError::Parse`] when the text is empty, does not parse, or
/// contains more than one statement.
pub fn classify(sql: &str, dialect: SqlDialect) -> Result<StatementClassification, SafetyError> {
    let trimmed = sql.trim();
    if trimmed.is_empty() {
        return Err(parse_error("No SQL statement provided"));
    }
    let parser_dialect = dialect.into_parser_dialect();
    let statements = Parser::parse_sql(parser_dialect.as_ref(), trimmed)
        .map_err(|e| parse_error(e.to_string()))?;
    let statement = match statements.as_slice() {
        [single] => single,
        [] => return Err(parse_error("No SQL statement provided")),
        many => {
            return Err(parse_error(format!(
                "Expected exactly one SQL statement, found {}",
                many.len()
            )));
        }
    };
    let classification = classify_statement(trimmed, statement);
    debug!(
        statement_type = %classification.statement_type,
        tables = classification.tables.len(),
        has_where_clause = classification.has_where_clause,
        "classified statement"
    );
    Ok(classification)
}

fn classify_statement(raw: &str, stmt: &Statement) -> StatementClassification {
    let mut c = match stmt {
        Statement::Query(query) => {
            let mut c = StatementClassification::new(raw, StatementType::Select);
            c.has_where_clause = set_expr_has_where(&query.body);
            c
        }
        Statement::Insert(insert) => {
            let mut c = StatementClassification::new(raw, StatementType::Insert);
            let target = insert.table.to_string();
            c.add_table(target.as_str());
            for column in &insert.columns {
                c.add_column(&target, column.to_string());
            }
            c
        }
        Statement::Update(update) => {
            let mut c = StatementClassification::new(raw, StatementType::Update);
            extract_from_table_with_joins(&update.table, &mut c);
            if let Some(target) = c.tables.first().cloned() {
                for column in assignment_columns(&update.assignments) {
                    c.add_column(&target, column);
                }
            }
            c.has_where_clause = update.selection.is_some();
            c
        }
        Statement::Delete(delete) => {
            let mut c = StatementClassification::new(raw, StatementType::Delete);
            if let FromTable::WithFromKeyword(items) | FromTable::WithoutKeyword(items) =
                &delete.from
            {
                for item in items {
                    extract_from_table_with_joins(item, &mut c);
                }
            }
            c.has_where_clause = delete.selection.is_some();
            c
        }
        Statement::Truncate(truncate) => {
            let mut c = StatementClassification::new(raw, StatementType::Truncate);
            for table in &truncate.table_names {
                c.add_table(table.name.to_string());
            }
            c
        }
        Statement::Drop {
            names, ..
        } => {
            let mut c = StatementClassification::new(raw, StatementType::Drop);
            for name in names {
                c.add_table(name.to_string());
            }
            c
        }
        Statement::AlterTable(alter) => {
            let mut c = StatementClassification::new(raw, StatementType::Alter);
            let target = alter.name.to_string();
            c.add_table(target.as_str());
            let operations = alter_operations(&alter.operations);
            for operation in &operations {
                for column in &operation.columns {
                    c.add_column(&target, column.clone());
                }
            }
            c.alter_operations = operations;
            c
        }
        Statement::AlterView {
            name, ..
        }
        | Statement::AlterIndex {
            name, ..
        } => {
            let mut c = StatementClassification::new(raw, StatementType::Alter);
            c.add_table(name.to_string());
            c
        }
        _ => StatementClassification::new(raw, StatementType::Other)
    };
    let cte_names = collect_cte_names(stmt);
    for relation in collect_relations(stmt, &cte_names) {
        c.add_table(relation);
    }
    c
}
