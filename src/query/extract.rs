mod alter;
mod assignments;
mod relations;
mod selection;
mod table;

pub use alter::alter_operations;
pub use assignments::assignment_columns;
pub use relations::{collect_cte_names, collect_relations};
pub use selection::set_expr_has_where;
pub use table::extract_from_table_with_joins;
