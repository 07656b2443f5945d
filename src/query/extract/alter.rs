use compact_str::CompactString;
use sqlparser::ast::{AlterTableOperation, Ident};

use crate::query::types::{AlterKind, AlterOperation};

/// Break an ALTER TABLE down into its individual changes
pub fn alter_operations(operations: &[AlterTableOperation]) -> Vec<AlterOperation> {
    operations.iter().map(describe).collect()
}

fn describe(operation: &AlterTableOperation) -> AlterOperation {
    match operation {
        AlterTableOperation::AddColumn {
            column_def, ..
        } => AlterOperation {
            kind:        AlterKind::AddColumn,
            columns:     vec![name(&column_def.name)],
            description: format!(
                "ADD COLUMN {} ({})",
                column_def.name.value, column_def.data_type
            )
        },
        AlterTableOperation::DropColumn {
            column_names, ..
        } => {
            let names: Vec<&str> = column_names.iter().map(|c| c.value.as_str()).collect();
            AlterOperation {
                kind:        AlterKind::DropColumn,
                columns:     column_names.iter().map(name).collect(),
                description: format!("DROP COLUMN {}", names.join(", "))
            }
        }
        AlterTableOperation::RenameColumn {
            old_column_name,
            new_column_name,
            ..
        } => AlterOperation {
            kind:        AlterKind::RenameColumn,
            columns:     vec![name(old_column_name), name(new_column_name)],
            description: format!(
                "RENAME COLUMN {} TO {}",
                old_column_name.value, new_column_name.value
            )
        },
        AlterTableOperation::AlterColumn {
            column_name, ..
        }
        | AlterTableOperation::ModifyColumn {
            col_name: column_name,
            ..
        } => AlterOperation {
            kind:        AlterKind::ModifyColumn,
            columns:     vec![name(column_name)],
            description: format!("MODIFY COLUMN {}", column_name.value)
        },
        AlterTableOperation::ChangeColumn {
            old_name,
            new_name,
            ..
        } => AlterOperation {
            kind:        AlterKind::ModifyColumn,
            columns:     vec![name(old_name), name(new_name)],
            description: format!("CHANGE COLUMN {} TO {}", old_name.value, new_name.value)
        },
        AlterTableOperation::AddConstraint {
            constraint, ..
        } => AlterOperation {
            kind:        AlterKind::AddConstraint,
            columns:     Vec::new(),
            description: format!("ADD {}", constraint)
        },
        AlterTableOperation::DropConstraint {
            name: constraint, ..
        } => AlterOperation {
            kind:        AlterKind::DropConstraint,
            columns:     Vec::new(),
            description: format!("DROP CONSTRAINT {}", constraint.value)
        },
        AlterTableOperation::DropPrimaryKey {
            ..
        } => AlterOperation {
            kind:        AlterKind::DropConstraint,
            columns:     Vec::new(),
            description: String::from("DROP PRIMARY KEY")
        },
        other => AlterOperation {
            kind:        AlterKind::Other,
            columns:     Vec::new(),
            description: other.to_string()
        }
    }
}

fn name(ident: &Ident) -> CompactString {
    CompactString::from(ident.value.as_str())
}
