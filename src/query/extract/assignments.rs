use compact_str::CompactString;
use sqlparser::ast::{Assignment, AssignmentTarget, ObjectName};

/// Column names written by an UPDATE's SET list
pub fn assignment_columns(assignments: &[Assignment]) -> Vec<CompactString> {
    let mut columns = Vec::new();
    for assignment in assignments {
        match &assignment.target {
            AssignmentTarget::ColumnName(name) => columns.push(column_name(name)),
            AssignmentTarget::Tuple(names) => columns.extend(names.iter().map(column_name))
        }
    }
    columns
}

// `users.status` -> `status`
fn column_name(name: &ObjectName) -> CompactString {
    let full = name.to_string();
    full.rsplit('.').next().unwrap_or(full.as_str()).into()
}
