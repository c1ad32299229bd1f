mod transaction;
pub use transaction::Transaction;

use crate::stmt::Statement;

#[derive(Debug)]
pub enum Operation {
    /// Execute a statement
    Query(Statement),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),
}

impl From<Statement> for Operation {
    fn from(value: Statement) -> Operation {
        Operation::Query(value)
    }
}
