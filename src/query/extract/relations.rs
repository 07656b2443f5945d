use std::ops::ControlFlow;

use compact_str::CompactString;
use sqlparser::ast::{Statement, visit_relations};

use crate::query::types::NameSet;

/// Every relation the statement references, in visiting order, CTEs excluded
pub fn collect_relations(statement: &Statement, cte_names: &NameSet) -> Vec<CompactString> {
    let mut found = Vec::new();
    let _ = visit_relations(statement, |relation| {
        let name = relation.to_string();
        if !cte_names.contains(name.as_str()) {
            found.push(CompactString::from(name));
        }
        ControlFlow::<()>::Continue(())
    });
    found
}

/// Names introduced by the statement's WITH clause
pub fn collect_cte_names(statement: &Statement) -> NameSet {
    let mut names = NameSet::new();
    let query = match statement {
        Statement::Query(query) => Some(query.as_ref()),
        Statement::Insert(insert) => insert.source.as_deref(),
        _ => None
    };
    if let Some(query) = query {
        for cte in query.with.iter().flat_map(|w| &w.cte_tables) {
            names.insert(cte.alias.name.value.as_str().into());
        }
    }
    names
}
