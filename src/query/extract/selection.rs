/// Whether the query body carries its own WHERE clause
///
/// Only the statement's own selection counts; WHERE clauses inside nested
/// sub-queries do not. Tautologies such as `WHERE 1 = 1` still count.
pub fn set_expr_has_where(set_expr: &sqlparser::ast::SetExpr) -> bool {
    use sqlparser::ast::SetExpr;

    match set_expr {
        SetExpr::Select(select) => select.selection.is_some(),
        SetExpr::SetOperation {
            left,
            right,
            ..
        } => set_expr_has_where(left) || set_expr_has_where(right),
        SetExpr::Query(query) => set_expr_has_where(&query.body),
        _ => false
    }
}
