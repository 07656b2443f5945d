use compact_str::CompactString;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Ordered, de-duplicated set of identifiers
pub type NameSet = IndexSet<CompactString>;

/// Structural facts extracted from one SQL statement
///
/// Produced once per statement by [`classify`](crate::query::classify) and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementClassification {
    pub statement_type:   StatementType,
    /// Primary target first, then every other referenced relation
    pub tables:           NameSet,
    /// One entry per table; an empty set means implicit or all columns
    pub columns_by_table: IndexMap<CompactString, NameSet>,
    /// Syntactic presence of the statement's own WHERE clause
    pub has_where_clause: bool,
    pub raw_sql:          String,
    /// Changes made by an ALTER TABLE, in statement order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alter_operations: Vec<AlterOperation>
}

impl StatementClassification {
    pub fn new(raw_sql: impl Into<String>, statement_type: StatementType) -> Self {
        Self {
            statement_type,
            tables: NameSet::new(),
            columns_by_table: IndexMap::new(),
            has_where_clause: false,
            raw_sql: raw_sql.into(),
            alter_operations: Vec::new()
        }
    }

    /// Register a table, keeping first-seen order
    pub fn add_table(&mut self, name: impl Into<CompactString>) {
        let name = name.into();
        self.columns_by_table.entry(name.clone()).or_default();
        self.tables.insert(name);
    }

    /// Register a column against a table, registering the table if needed
    pub fn add_column(&mut self, table: &str, column: impl Into<CompactString>) {
        if !self.tables.contains(table) {
            self.add_table(table);
        }
        if let Some(columns) = self.columns_by_table.get_mut(table) {
            columns.insert(column.into());
        }
    }

    /// Table names joined for human-readable messages
    pub fn table_list(&self) -> String {
        if self.tables.is_empty() {
            return String::from("the target table(s)");
        }
        let names: Vec<&str> = self.tables.iter().map(|t| t.as_str()).collect();
        names.join(", ")
    }

    /// Total number of explicitly named columns across all tables
    pub fn column_count(&self) -> usize {
        self.columns_by_table.values().map(|cols| cols.len()).sum()
    }

    /// What an ALTER does to the table, most disruptive change first
    ///
    /// `None` for statements other than ALTER TABLE.
    pub fn alter_impact(&self) -> Option<&'static str> {
        if self.statement_type != StatementType::Alter || self.alter_operations.is_empty() {
            return None;
        }
        let has = |kinds: &[AlterKind]| {
            self.alter_operations
                .iter()
                .any(|op| kinds.contains(&op.kind))
        };
        let impact = if has(&[AlterKind::RenameColumn]) {
            "Will rename columns (data preserved)"
        } else if has(&[AlterKind::DropColumn, AlterKind::DropConstraint]) {
            "Will permanently remove columns or constraints"
        } else if has(&[AlterKind::AddColumn, AlterKind::AddConstraint]) {
            "Will add new columns or constraints"
        } else if has(&[AlterKind::ModifyColumn]) {
            "Will modify existing column structure"
        } else {
            "Will modify table structure"
        };
        Some(impact)
    }

    /// Whether the statement only reads data
    pub fn is_read_only(&self) -> bool {
        self.statement_type == StatementType::Select
    }
}

/// Primary verb of a SQL statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatementType {
    Select,
    Insert,
    Update,
    Delete,
    Alter,
    Drop,
    Truncate,
    Other
}

impl StatementType {
    /// Structure-changing statements without a data-preserving inverse
    pub fn is_destructive_ddl(self) -> bool {
        matches!(self, Self::Alter | Self::Drop | Self::Truncate)
    }

    /// Row-level writes that can be bounded by WHERE
    pub fn is_filterable_write(self) -> bool {
        matches!(self, Self::Update | Self::Delete)
    }
}

impl std::fmt::Display for StatementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Select => write!(f, "SELECT"),
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::Alter => write!(f, "ALTER"),
            Self::Drop => write!(f, "DROP"),
            Self::Truncate => write!(f, "TRUNCATE"),
            Self::Other => write!(f, "OTHER")
        }
    }
}

/// Category of one ALTER TABLE change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlterKind {
    AddColumn,
    DropColumn,
    RenameColumn,
    ModifyColumn,
    AddConstraint,
    DropConstraint,
    Other
}

/// One change made by an ALTER TABLE statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlterOperation {
    pub kind:        AlterKind,
    /// Columns the change names; renames list the old name first
    pub columns:     Vec<CompactString>,
    /// e.g. `ADD COLUMN age (INT)`
    pub description: String
}
