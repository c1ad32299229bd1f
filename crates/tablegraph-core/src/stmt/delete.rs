use super::*;
use std::sync::Arc;

/// Deletes the matching rows and returns their last state.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: Arc<TableRef>,
    pub filter: Option<Expr>,
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}
