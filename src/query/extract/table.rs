use crate::query::types::StatementClassification;

/// Register the tables named directly in a FROM/UPDATE target, joins included
pub fn extract_from_table_with_joins(
    table_with_joins: &sqlparser::ast::TableWithJoins,
    out: &mut StatementClassification
) {
    extract_from_table_factor(&table_with_joins.relation, out);
    for join in &table_with_joins.joins {
        extract_from_table_factor(&join.relation, out);
    }
}

fn extract_from_table_factor(
    table_factor: &sqlparser::ast::TableFactor,
    out: &mut StatementClassification
) {
    use sqlparser::ast::TableFactor;

    match table_factor {
        TableFactor::Table {
            name, ..
        } => {
            out.add_table(name.to_string());
        }
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => {
            extract_from_table_with_joins(table_with_joins, out);
        }
        // derived tables are reached through the relation visitor
        _ => {}
    }
}
