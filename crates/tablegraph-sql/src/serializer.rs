#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Delimited, Period};

mod flavor;
use flavor::Flavor;

mod ident;
use ident::Ident;

mod params;
pub use params::{Params, Placeholder, TypedValue};
use params::Param;

// Fragment serializers
mod expr;
mod statement;

use tablegraph_core::{
    driver::operation::Transaction,
    stmt::{Statement, TableRef},
};

/// Alias given to the target table in PostgreSQL statements, so rows can be
/// returned as a single JSON value.
const ROW_ALIAS: &str = "_row";

/// Serialize a statement to a SQL string
#[derive(Debug)]
pub struct Serializer {
    /// The database flavor handles the differences between SQL dialects.
    flavor: Flavor,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,

    /// Table the statement targets. Supplies column types for parameter
    /// casts.
    table: &'a TableRef,
}

impl Serializer {
    pub fn serialize(&self, stmt: &Statement, params: &mut impl Params) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
            table: stmt.table(),
        };

        stmt.to_sql(&mut fmt);

        ret.push(';');
        ret
    }

    /// Serialize a transaction control operation to a SQL string.
    pub fn serialize_transaction(&self, op: Transaction) -> String {
        op.as_sql().to_string()
    }

    /// Returns true when rows come back as one JSON column per row.
    pub fn returns_json_rows(&self) -> bool {
        self.flavor.is_postgresql()
    }
}
