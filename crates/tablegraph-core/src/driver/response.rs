use crate::{stmt::Record, Result};

#[derive(Debug)]
pub enum Response {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Rows returned by the operation
    Rows(Vec<Record>),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self::Count(count)
    }

    pub fn rows(rows: Vec<Record>) -> Self {
        Self::Rows(rows)
    }

    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_rows(&self) -> bool {
        matches!(self, Self::Rows(_))
    }

    pub fn into_rows(self) -> Result<Vec<Record>> {
        match self {
            Self::Rows(rows) => Ok(rows),
            Self::Count(count) => crate::bail!("expected rows, got count={count}"),
        }
    }
}
