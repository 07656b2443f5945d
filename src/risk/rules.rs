use super::{Finding, RiskLevel, RiskRule, RuleInfo};
use crate::query::{StatementClassification, StatementType};

/// Statements with no data-preserving inverse at all
///
/// ALTER rewrites table structure, DROP removes the object with its data,
/// TRUNCATE empties the table without logging individual rows. None of them
/// can be bounded by a WHERE clause.
pub struct DestructiveDdl;

impl RiskRule for DestructiveDdl {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:   "RISK001",
            name: "Destructive DDL"
        }
    }

    fn evaluate(&self, c: &StatementClassification) -> Option<Finding> {
        let detail = match c.statement_type {
            StatementType::Alter => "ALTER statements modify table structure and cannot be easily undone",
            StatementType::Drop => "DROP statements permanently delete database objects and their data",
            StatementType::Truncate => {
                "TRUNCATE permanently deletes all rows without logging individual row deletions"
            }
            _ => return None
        };
        Some(
            Finding::verdict(
                RiskLevel::High,
                format!(
                    "This is a {} statement, which permanently modifies database structure or deletes data without row-level logging",
                    c.statement_type
                )
            )
            .with_warning(format!(
                "HIGH RISK: {}. Affected: {}.",
                detail,
                c.table_list()
            ))
        )
    }
}

/// UPDATE or DELETE without WHERE touches every row
pub struct UnboundedWrite;

impl RiskRule for UnboundedWrite {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:   "RISK002",
            name: "Write without WHERE"
        }
    }

    fn evaluate(&self, c: &StatementClassification) -> Option<Finding> {
        if !c.statement_type.is_filterable_write() || c.has_where_clause {
            return None;
        }
        let tables = c.table_list();
        Some(
            Finding::verdict(
                RiskLevel::High,
                format!(
                    "This {} statement will affect ALL rows in {} because it lacks a WHERE clause",
                    c.statement_type, tables
                )
            )
            .with_warning(format!(
                "CRITICAL: This {} statement lacks a WHERE clause and will affect ALL rows in {}.",
                c.statement_type, tables
            ))
        )
    }
}

/// UPDATE or DELETE limited by a WHERE clause
pub struct BoundedWrite;

impl RiskRule for BoundedWrite {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:   "RISK003",
            name: "Write with WHERE"
        }
    }

    fn evaluate(&self, c: &StatementClassification) -> Option<Finding> {
        if !c.statement_type.is_filterable_write() || !c.has_where_clause {
            return None;
        }
        Some(Finding::verdict(
            RiskLevel::Medium,
            format!(
                "This {} statement will modify data in {}",
                c.statement_type,
                c.table_list()
            )
        ))
    }
}

/// Reads and appends
pub struct ReadOrAppend;

impl RiskRule for ReadOrAppend {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:   "RISK004",
            name: "Read or append"
        }
    }

    fn evaluate(&self, c: &StatementClassification) -> Option<Finding> {
        let reason = match c.statement_type {
            StatementType::Select => {
                String::from("This is a SELECT statement (read-only), which poses minimal risk")
            }
            StatementType::Insert => {
                format!(
                    "This INSERT statement will add new rows to {}",
                    c.table_list()
                )
            }
            _ => return None
        };
        Some(Finding::verdict(RiskLevel::Low, reason))
    }
}

/// Anything the classifier could not map to a known verb
pub struct UnknownOperation;

impl RiskRule for UnknownOperation {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:   "RISK005",
            name: "Unrecognised operation"
        }
    }

    fn evaluate(&self, c: &StatementClassification) -> Option<Finding> {
        if c.statement_type != StatementType::Other {
            return None;
        }
        Some(Finding::verdict(
            RiskLevel::Medium,
            "The statement type is not recognised, so it is treated conservatively"
        ))
    }
}

/// Statements spanning many tables
pub struct WideBlastRadius;

/// Table count above which the wide-blast-radius warning fires
pub const WIDE_BLAST_RADIUS_TABLES: usize = 3;

impl RiskRule for WideBlastRadius {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:   "RISK006",
            name: "Wide blast radius"
        }
    }

    fn evaluate(&self, c: &StatementClassification) -> Option<Finding> {
        let count = c.tables.len();
        if count <= WIDE_BLAST_RADIUS_TABLES {
            return None;
        }
        Some(Finding::warning_only(format!(
            "WARNING: This statement affects {} tables, increasing the risk of unintended side effects.",
            count
        )))
    }
}
