use super::*;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub table: Arc<TableRef>,

    /// Rows to return. `None` returns every row.
    pub filter: Option<Expr>,

    pub order_by: Vec<String>,
}

impl Select {
    /// Selects the rows matching `filter`, ordered by primary key.
    pub fn new(table: Arc<TableRef>, filter: Option<Expr>) -> Select {
        let order_by = table.primary_key.clone();
        Select {
            table,
            filter,
            order_by,
        }
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Self::Select(value)
    }
}
