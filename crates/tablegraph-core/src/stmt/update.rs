use super::*;
use std::sync::Arc;

/// Updates the matching rows and returns them as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: Arc<TableRef>,
    pub assignments: Record,
    pub filter: Option<Expr>,
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Self::Update(value)
    }
}
