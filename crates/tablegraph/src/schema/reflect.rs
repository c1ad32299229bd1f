use super::{Column, Table, TableId, TypeMapper, TypeRef, UniqueKey};
use crate::{hook::Events, Db, Result};

use indexmap::IndexMap;
use std::sync::Arc;
use tablegraph_core::{
    catalog::{Filters, TableRow},
    stmt::TableRef,
    Error,
};

/// Reads the filtered catalog. Any failure aborts with a reflection error.
pub(super) async fn catalog(db: &Db, filters: &Filters) -> Result<Vec<TableRow>> {
    let rows = db.reflect(filters).await.map_err(Error::reflection)?;

    tracing::info!(
        driver = db.capability().name,
        tables = rows.len(),
        "catalog reflected"
    );

    Ok(rows)
}

/// Creates the table node for one catalog row, without operations or
/// relationships.
pub(super) fn table(
    row: &TableRow,
    id: TableId,
    default_schema: &str,
    mapper: &TypeMapper,
) -> Result<Table> {
    let key = Table::key_for(&row.schema, &row.table, default_schema);

    let mut columns = IndexMap::new();
    let mut source_types = IndexMap::new();
    let mut primary_key = vec![];

    for column in &row.columns {
        let ty = if column.is_primary_key {
            primary_key.push(column.name.clone());
            TypeRef::named("ID")
        } else {
            let Some(name) = mapper.map(&column.ty) else {
                return Err(Error::unmappable_type(&column.ty, &key, &column.name));
            };
            TypeRef::named(name)
        };

        source_types.insert(column.name.clone(), column.ty.clone());
        columns.insert(
            column.name.clone(),
            Column::stored(&column.name, &column.ty, ty, column.is_primary_key),
        );
    }

    let unique_keys = row
        .unique_keys
        .iter()
        .map(|unique| UniqueKey {
            name: unique.constraint_name.clone(),
            columns: unique.columns.clone(),
        })
        .collect();

    let table_ref = Arc::new(TableRef {
        schema: row.schema.clone(),
        name: row.table.clone(),
        columns: source_types,
        primary_key: primary_key.clone(),
    });

    Ok(Table {
        id,
        schema: row.schema.clone(),
        name: row.table.clone(),
        type_name: Table::type_name_for(&key),
        key,
        columns,
        primary_key,
        unique_keys,
        queries: IndexMap::new(),
        mutations: IndexMap::new(),
        events: Events::default(),
        table_ref,
    })
}
