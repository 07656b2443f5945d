//! Database schema parsing and prompt summaries.
//!
//! The structured validation pipeline gives the model a schema to reason
//! about. By default that is the built-in [`MOCK_SCHEMA_SQL`]; callers may
//! substitute their own DDL.
//!
//! # Supported Statements
//!
//! - `CREATE TABLE` with columns, types, constraints
//! - `CREATE INDEX` with column lists and uniqueness
//! - Primary key and NOT NULL column options
//!
//! # Example
//!
//! ```
//! use safesheet::{query::SqlDialect, schema::Schema};
//!
//! let sql = r#"
//!     CREATE TABLE users (
//!         id INT PRIMARY KEY,
//!         email VARCHAR(255) NOT NULL
//!     );
//!     CREATE INDEX idx_email ON users(email);
//! "#;
//!
//! let schema = Schema::parse(sql, SqlDialect::Generic).unwrap();
//!
//! let users = schema.tables.get("users").unwrap();
//! assert_eq!(users.columns.len(), 2);
//! assert_eq!(users.indexes.len(), 1);
//!
//! let summary = schema.to_summary();
//! assert!(summary.contains("- users (id: INT PK, email: VARCHAR(255) NOT NULL)"));
//! ```

use indexmap::IndexMap;
use sqlparser::{
    ast::{ColumnOption, Statement, TableConstraint},
    parser::Parser
};

use crate::{
    error::{AppResult, schema_parse_error},
    query::SqlDialect
};

/// Schema shown to the model when none is supplied
pub const MOCK_SCHEMA_SQL: &str = "\
CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR, email VARCHAR, status VARCHAR, created_at TIMESTAMP);
CREATE TABLE orders (id INTEGER PRIMARY KEY, user_id INTEGER, total DECIMAL, status VARCHAR, created_at TIMESTAMP);
CREATE TABLE products (id INTEGER PRIMARY KEY, name VARCHAR, price DECIMAL, stock INTEGER);
CREATE TABLE logs (id INTEGER PRIMARY KEY, message TEXT, level VARCHAR, timestamp TIMESTAMP);
CREATE TABLE temp_data (id INTEGER PRIMARY KEY, data TEXT);
";

/// Table metadata.
#[derive(Debug, Clone)]
pub struct TableInfo {
    pub name:    String,
    /// Columns in declaration order
    pub columns: Vec<ColumnInfo>,
    pub indexes: Vec<IndexInfo>
}

/// Column metadata extracted from CREATE TABLE.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub name:        String,
    /// SQL data type as written (e.g., "INTEGER", "VARCHAR(255)")
    pub data_type:   String,
    pub is_nullable: bool,
    pub is_primary:  bool
}

/// Index metadata extracted from CREATE INDEX or table constraints.
#[derive(Debug, Clone)]
pub struct IndexInfo {
    /// Index name (may be empty for anonymous indexes)
    pub name:      String,
    pub columns:   Vec<String>,
    pub is_unique: bool
}

/// Parsed database schema.
///
/// Tables keep their declaration order.
#[derive(Debug, Default, Clone)]
pub struct Schema {
    pub tables: IndexMap<String, TableInfo>
}

impl Schema {
    /// Parse DDL text with the given dialect
    ///
    /// Statements other than CREATE TABLE and CREATE INDEX are ignored.
    ///
    /// # Errors
    ///
    /// Returns error if SQL parsing fails
    pub fn parse(sql: &str, dialect: SqlDialect) -> AppResult<Self> {
        let parser_dialect = dialect.into_parser_dialect();
        let statements = Parser::parse_sql(parser_dialect.as_ref(), sql)
            .map_err(|e| schema_parse_error(e.to_string()))?;
        let mut schema = Self::default();
        for stmt in statements {
            schema.process_statement(stmt);
        }
        Ok(schema)
    }

    /// The built-in mock schema (users, orders, products, logs, temp_data)
    pub fn mock() -> Self {
        Self::parse(MOCK_SCHEMA_SQL, SqlDialect::Generic).unwrap_or_default()
    }

    fn process_statement(&mut self, stmt: Statement) {
        match stmt {
            Statement::CreateTable(create) => {
                let table_name = create.name.to_string();
                let mut columns = Vec::new();
                let mut indexes = Vec::new();
                for column in create.columns {
                    let is_primary = column
                        .options
                        .iter()
                        .any(|opt| matches!(opt.option, ColumnOption::PrimaryKey(_)));
                    let not_null = column
                        .options
                        .iter()
                        .any(|opt| matches!(opt.option, ColumnOption::NotNull));
                    columns.push(ColumnInfo {
                        name: column.name.to_string(),
                        data_type: column.data_type.to_string(),
                        is_nullable: !is_primary && !not_null,
                        is_primary
                    });
                }
                for constraint in create.constraints {
                    match constraint {
                        TableConstraint::PrimaryKey(pk) => {
                            let keys: Vec<String> = pk.columns.iter().map(|c| c.to_string()).collect();
                            for column in columns.iter_mut().filter(|c| keys.contains(&c.name)) {
                                column.is_primary = true;
                                column.is_nullable = false;
                            }
                        }
                        TableConstraint::Unique(unique) => indexes.push(IndexInfo {
                            name:      unique.name.map(|n| n.to_string()).unwrap_or_default(),
                            columns:   unique.columns.iter().map(|c| c.to_string()).collect(),
                            is_unique: true
                        }),
                        TableConstraint::Index(index) => indexes.push(IndexInfo {
                            name:      index.name.map(|n| n.to_string()).unwrap_or_default(),
                            columns:   index.columns.iter().map(|c| c.to_string()).collect(),
                            is_unique: false
                        }),
                        _ => {}
                    }
                }
                self.tables.insert(
                    table_name.clone(),
                    TableInfo {
                        name: table_name,
                        columns,
                        indexes
                    }
                );
            }
            Statement::CreateIndex(create_index) => {
                let table_name = create_index.table_name.to_string();
                if let Some(table) = self.tables.get_mut(&table_name) {
                    table.indexes.push(IndexInfo {
                        name:      create_index.name.map(|n| n.to_string()).unwrap_or_default(),
                        columns:   create_index.columns.iter().map(|c| c.to_string()).collect(),
                        is_unique: create_index.unique
                    });
                }
            }
            _ => {}
        }
    }

    /// One line per table, in the form the validation prompt uses
    ///
    /// ```text
    /// Database Schema:
    /// - users (id: INTEGER PK, name: VARCHAR, email: VARCHAR NOT NULL)
    ///   indexes: UNIQUE idx_email (email)
    /// ```
    pub fn to_summary(&self) -> String {
        let mut summary = String::from("Database Schema:\n");
        for table in self.tables.values() {
            let columns: Vec<String> = table
                .columns
                .iter()
                .map(|col| {
                    let flag = if col.is_primary {
                        " PK"
                    } else if !col.is_nullable {
                        " NOT NULL"
                    } else {
                        ""
                    };
                    format!("{}: {}{}", col.name, col.data_type, flag)
                })
                .collect();
            summary.push_str(&format!("- {} ({})\n", table.name, columns.join(", ")));
            if !table.indexes.is_empty() {
                let indexes: Vec<String> = table
                    .indexes
                    .iter()
                    .map(|idx| {
                        let unique = if idx.is_unique { "UNIQUE " } else { "" };
                        format!("{}{} ({})", unique, idx.name, idx.columns.join(", "))
                    })
                    .collect();
                summary.push_str(&format!("  indexes: {}\n", indexes.join("; ")));
            }
        }
        summary
    }
}
