use super::*;
use std::sync::Arc;

/// Inserts one row and returns it as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: Arc<TableRef>,
    pub values: Record,
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
