//! Catalog reflection through `information_schema` and `pg_catalog`.
//!
//! Custom filters are spliced into the table query (aliased `t`, over
//! `information_schema.tables`) and the column query (aliased `c`, over
//! `information_schema.columns`).

use indexmap::IndexMap;
use tablegraph_core::{
    catalog::{ColumnAssociation, ColumnRow, Filters, ForeignKeyRow, TableRow, UniqueKeyRow},
    Error, Result,
};
use tokio_postgres::Client;

const SYSTEM_SCHEMAS: &str = "('pg_catalog', 'information_schema', 'pg_toast')";

type Key = (String, String);

pub(crate) async fn reflect(client: &Client, filters: &Filters) -> Result<Vec<TableRow>> {
    let mut tables: IndexMap<Key, TableRow> = IndexMap::new();

    for (schema, table) in table_names(client, filters).await? {
        if !filters.allows_table(&schema, &table) {
            continue;
        }

        tables.insert(
            (schema.clone(), table.clone()),
            TableRow {
                schema,
                table,
                columns: vec![],
                foreign_keys: vec![],
                unique_keys: vec![],
            },
        );
    }

    load_columns(client, filters, &mut tables).await?;
    load_foreign_keys(client, &mut tables).await?;
    load_unique_keys(client, &mut tables).await?;

    Ok(filters.apply(tables.into_values().collect()))
}

async fn table_names(client: &Client, filters: &Filters) -> Result<Vec<Key>> {
    let mut sql = format!(
        "SELECT t.table_schema::text, t.table_name::text \
         FROM information_schema.tables AS t \
         WHERE t.table_type = 'BASE TABLE' AND t.table_schema NOT IN {SYSTEM_SCHEMAS}"
    );
    push_custom_filter(&mut sql, filters.table_custom_filter.as_deref());
    sql.push_str(" ORDER BY 1, 2");

    let rows = client
        .query(&sql, &[])
        .await
        .map_err(Error::driver_operation_failed)?;

    rows.iter()
        .map(|row| Ok((get(row, 0)?, get(row, 1)?)))
        .collect()
}

async fn load_columns(
    client: &Client,
    filters: &Filters,
    tables: &mut IndexMap<Key, TableRow>,
) -> Result<()> {
    let mut sql = format!(
        "SELECT c.table_schema::text, c.table_name::text, c.column_name::text, \
           CASE WHEN c.data_type IN ('USER-DEFINED', 'ARRAY') \
             THEN c.udt_name::text ELSE c.data_type::text END, \
           EXISTS ( \
             SELECT 1 FROM information_schema.table_constraints AS tc \
             JOIN information_schema.key_column_usage AS kcu \
               ON kcu.constraint_schema = tc.constraint_schema \
              AND kcu.constraint_name = tc.constraint_name \
             WHERE tc.constraint_type = 'PRIMARY KEY' \
               AND tc.table_schema = c.table_schema \
               AND tc.table_name = c.table_name \
               AND kcu.column_name = c.column_name \
           ) \
         FROM information_schema.columns AS c \
         WHERE c.table_schema NOT IN {SYSTEM_SCHEMAS}"
    );
    push_custom_filter(&mut sql, filters.column_custom_filter.as_deref());
    sql.push_str(" ORDER BY c.table_schema, c.table_name, c.ordinal_position");

    let rows = client
        .query(&sql, &[])
        .await
        .map_err(Error::driver_operation_failed)?;

    for row in &rows {
        let key: Key = (get(row, 0)?, get(row, 1)?);
        let Some(table) = tables.get_mut(&key) else {
            continue;
        };

        let ty: String = get(row, 3)?;
        table.columns.push(ColumnRow {
            name: get(row, 2)?,
            ty: ty.to_lowercase(),
            is_primary_key: get(row, 4)?,
        });
    }

    Ok(())
}

async fn load_foreign_keys(client: &Client, tables: &mut IndexMap<Key, TableRow>) -> Result<()> {
    let rows = client
        .query(
            "SELECT ns.nspname::text, cl.relname::text, con.conname::text, \
               fns.nspname::text, fcl.relname::text, a.attname::text, fa.attname::text \
             FROM pg_constraint AS con \
             JOIN pg_class AS cl ON cl.oid = con.conrelid \
             JOIN pg_namespace AS ns ON ns.oid = cl.relnamespace \
             JOIN pg_class AS fcl ON fcl.oid = con.confrelid \
             JOIN pg_namespace AS fns ON fns.oid = fcl.relnamespace \
             CROSS JOIN LATERAL unnest(con.conkey, con.confkey) WITH ORDINALITY AS k(attnum, fattnum, ord) \
             JOIN pg_attribute AS a ON a.attrelid = con.conrelid AND a.attnum = k.attnum \
             JOIN pg_attribute AS fa ON fa.attrelid = con.confrelid AND fa.attnum = k.fattnum \
             WHERE con.contype = 'f' \
             ORDER BY 1, 2, 3, k.ord",
            &[],
        )
        .await
        .map_err(Error::driver_operation_failed)?;

    for row in &rows {
        let key: Key = (get(row, 0)?, get(row, 1)?);
        let Some(table) = tables.get_mut(&key) else {
            continue;
        };

        let constraint_name: String = get(row, 2)?;
        let association = ColumnAssociation {
            column: get(row, 5)?,
            referenced_column: get(row, 6)?,
        };

        match table.foreign_keys.last_mut() {
            Some(fk) if fk.constraint_name == constraint_name => {
                fk.column_associations.push(association)
            }
            _ => table.foreign_keys.push(ForeignKeyRow {
                constraint_name,
                referenced_schema: Some(get(row, 3)?),
                referenced_table: get(row, 4)?,
                column_associations: vec![association],
            }),
        }
    }

    Ok(())
}

async fn load_unique_keys(client: &Client, tables: &mut IndexMap<Key, TableRow>) -> Result<()> {
    let rows = client
        .query(
            "SELECT ns.nspname::text, cl.relname::text, con.conname::text, a.attname::text \
             FROM pg_constraint AS con \
             JOIN pg_class AS cl ON cl.oid = con.conrelid \
             JOIN pg_namespace AS ns ON ns.oid = cl.relnamespace \
             CROSS JOIN LATERAL unnest(con.conkey) WITH ORDINALITY AS k(attnum, ord) \
             JOIN pg_attribute AS a ON a.attrelid = con.conrelid AND a.attnum = k.attnum \
             WHERE con.contype = 'u' \
             ORDER BY 1, 2, 3, k.ord",
            &[],
        )
        .await
        .map_err(Error::driver_operation_failed)?;

    for row in &rows {
        let key: Key = (get(row, 0)?, get(row, 1)?);
        let Some(table) = tables.get_mut(&key) else {
            continue;
        };

        let constraint_name: String = get(row, 2)?;
        let column: String = get(row, 3)?;

        match table.unique_keys.last_mut() {
            Some(uk) if uk.constraint_name == constraint_name => uk.columns.push(column),
            _ => table.unique_keys.push(UniqueKeyRow {
                constraint_name,
                columns: vec![column],
            }),
        }
    }

    Ok(())
}

fn get<'a, T: tokio_postgres::types::FromSql<'a>>(
    row: &'a tokio_postgres::Row,
    index: usize,
) -> Result<T> {
    row.try_get(index).map_err(Error::driver_operation_failed)
}

fn push_custom_filter(sql: &mut String, filter: Option<&str>) {
    if let Some(filter) = filter {
        sql.push_str(" AND (");
        sql.push_str(filter);
        sql.push(')');
    }
}
