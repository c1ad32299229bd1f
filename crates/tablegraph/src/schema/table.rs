use super::{Column, Resolver};
use crate::hook::Events;

use heck::ToUpperCamelCase;
use indexmap::IndexMap;
use std::sync::Arc;
use tablegraph_core::stmt::{Record, TableRef, Value};

/// Index of a table in the final schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(pub usize);

#[derive(Debug, Clone)]
pub struct Table {
    pub id: TableId,

    pub schema: String,

    /// Physical table name.
    pub name: String,

    /// `<schema>_<table>`, or `<table>` in the default schema. Root fields are
    /// named after it.
    pub key: String,

    /// Name of the object type; the input type is `Input<type_name>`.
    pub type_name: String,

    /// Stored columns in catalog order, followed by relationship columns.
    pub columns: IndexMap<String, Column>,

    pub primary_key: Vec<String>,

    pub unique_keys: Vec<UniqueKey>,

    pub queries: IndexMap<String, Resolver>,

    pub mutations: IndexMap<String, Resolver>,

    pub events: Events,

    pub(crate) table_ref: Arc<TableRef>,
}

/// An alternate lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueKey {
    pub name: String,
    pub columns: Vec<String>,
}

impl Table {
    pub(crate) fn key_for(schema: &str, name: &str, default_schema: &str) -> String {
        if schema == default_schema {
            name.to_string()
        } else {
            format!("{schema}_{name}")
        }
    }

    pub(crate) fn type_name_for(key: &str) -> String {
        key.to_upper_camel_case()
    }

    pub fn input_type_name(&self) -> String {
        format!("Input{}", self.type_name)
    }

    /// `true` if the table accepts writes.
    pub fn has_primary_key(&self) -> bool {
        !self.primary_key.is_empty()
    }

    /// `true` if `name` is a column persisted in the table.
    pub fn is_stored(&self, name: &str) -> bool {
        self.table_ref.has_column(name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub(crate) fn table_ref(&self) -> &Arc<TableRef> {
        &self.table_ref
    }

    /// Converts driver values to the representation of each column's
    /// synthesized type.
    pub(crate) fn decode_row(&self, mut row: Record) -> Record {
        for (name, value) in row.iter_mut() {
            let Some(column) = self.columns.get(name) else {
                continue;
            };

            let decoded = match (column.ty.name.as_str(), &*value) {
                ("Boolean", Value::I64(n)) => Value::Bool(*n != 0),
                ("Float", Value::I64(n)) => Value::F64(*n as f64),
                ("JSON", Value::String(text)) => match serde_json::from_str::<serde_json::Value>(text) {
                    Ok(json) => Value::from(json),
                    Err(_) => continue,
                },
                _ => continue,
            };

            *value = decoded;
        }

        row
    }

    /// Values of the primary key columns in `row`, if all are present and
    /// non-null.
    pub(crate) fn primary_key_of(&self, row: &Record) -> Option<Vec<(String, Value)>> {
        key_of(&self.primary_key, row)
    }
}

/// The `(column, value)` pairs of `columns` in `row`, or `None` when one is
/// missing or null.
pub(crate) fn key_of(columns: &[String], row: &Record) -> Option<Vec<(String, Value)>> {
    columns
        .iter()
        .map(|column| match row.get(column) {
            Some(value) if !value.is_null() => Some((column.clone(), value.clone())),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_drop_the_default_schema() {
        assert_eq!(Table::key_for("public", "user", "public"), "user");
        assert_eq!(Table::key_for("audit", "log_entry", "public"), "audit_log_entry");
        assert_eq!(Table::type_name_for("audit_log_entry"), "AuditLogEntry");
    }

    #[test]
    fn key_of_requires_every_column() {
        let row = Record::from_iter([
            ("a".to_string(), Value::I64(1)),
            ("b".to_string(), Value::Null),
        ]);

        assert_eq!(
            key_of(&["a".to_string()], &row),
            Some(vec![("a".to_string(), Value::I64(1))])
        );
        assert_eq!(key_of(&["a".to_string(), "b".to_string()], &row), None);
        assert_eq!(key_of(&["c".to_string()], &row), None);
    }
}
