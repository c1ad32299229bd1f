//! Rows produced by catalog reflection.
//!
//! Drivers read their system catalog into these rows. [`Filters::apply`]
//! then drops what the configuration excludes and puts everything into a
//! deterministic order, so that reflecting an unchanged database twice
//! produces identical rows.

use serde::{Deserialize, Serialize};

/// One reflected table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub schema: String,
    pub table: String,

    /// Columns in ordinal order.
    pub columns: Vec<ColumnRow>,

    pub foreign_keys: Vec<ForeignKeyRow>,
    pub unique_keys: Vec<UniqueKeyRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRow {
    pub name: String,

    /// Catalog type name, lowercased.
    pub ty: String,

    pub is_primary_key: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyRow {
    pub constraint_name: String,

    /// Schema of the referenced table. `None` means the owning table's schema.
    pub referenced_schema: Option<String>,
    pub referenced_table: String,

    pub column_associations: Vec<ColumnAssociation>,
}

/// One `local column -> referenced column` pair of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnAssociation {
    pub column: String,
    pub referenced_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniqueKeyRow {
    pub constraint_name: String,
    pub columns: Vec<String>,
}

/// Catalog filters.
///
/// Table entries are either `table` or `schema.table`; column entries are
/// `column`, `table.column` or `schema.table.column`. The custom filters are
/// raw SQL predicates, trusted as-is, that drivers splice into their catalog
/// queries: `t` aliases the table source and `c` the column source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Filters {
    /// Only reflect these schemas. Empty reflects every schema.
    pub schemas: Vec<String>,

    /// Only reflect these tables. Empty reflects every table.
    pub tables: Vec<String>,

    pub ignore_tables: Vec<String>,
    pub ignore_columns: Vec<String>,

    pub table_custom_filter: Option<String>,
    pub column_custom_filter: Option<String>,
}

impl Filters {
    pub fn allows_schema(&self, schema: &str) -> bool {
        self.schemas.is_empty() || self.schemas.iter().any(|s| s == schema)
    }

    pub fn allows_table(&self, schema: &str, table: &str) -> bool {
        if !self.allows_schema(schema) {
            return false;
        }

        let matches = |entry: &String| match entry.split_once('.') {
            Some((s, t)) => s == schema && t == table,
            None => entry == table,
        };

        if !self.tables.is_empty() && !self.tables.iter().any(matches) {
            return false;
        }

        !self.ignore_tables.iter().any(matches)
    }

    pub fn allows_column(&self, schema: &str, table: &str, column: &str) -> bool {
        !self.ignore_columns.iter().any(|entry| {
            let mut parts = entry.rsplitn(3, '.');
            let c = parts.next();
            let t = parts.next();
            let s = parts.next();

            c == Some(column)
                && t.map_or(true, |t| t == table)
                && s.map_or(true, |s| s == schema)
        })
    }

    /// Drops filtered tables and columns and sorts the result.
    ///
    /// Foreign and unique keys that reference an ignored column are removed
    /// with it. Tables left without columns are dropped.
    pub fn apply(&self, tables: Vec<TableRow>) -> Vec<TableRow> {
        let mut out: Vec<TableRow> = tables
            .into_iter()
            .filter(|t| self.allows_table(&t.schema, &t.table))
            .filter_map(|mut t| {
                let (schema, table) = (t.schema.clone(), t.table.clone());
                let keep = |column: &str| self.allows_column(&schema, &table, column);

                t.columns.retain(|c| keep(&c.name));
                t.foreign_keys.retain(|fk| {
                    !fk.column_associations.is_empty()
                        && fk.column_associations.iter().all(|a| keep(&a.column))
                });
                t.unique_keys
                    .retain(|uk| !uk.columns.is_empty() && uk.columns.iter().all(|c| keep(c)));

                t.foreign_keys
                    .sort_by(|a, b| a.constraint_name.cmp(&b.constraint_name));
                t.unique_keys
                    .sort_by(|a, b| a.constraint_name.cmp(&b.constraint_name));

                (!t.columns.is_empty()).then_some(t)
            })
            .collect();

        out.sort_by(|a, b| (&a.schema, &a.table).cmp(&(&b.schema, &b.table)));
        out
    }
}
