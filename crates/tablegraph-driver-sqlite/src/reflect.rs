//! Catalog reflection through `sqlite_master` and the `pragma_*` table-valued
//! functions.
//!
//! Custom filters are spliced into the table query (aliased `t`, columns of
//! `sqlite_master`) and the column query (aliased `c`, columns of
//! `pragma_table_info`).

use rusqlite::{params, Connection};
use tablegraph_core::{
    catalog::{ColumnAssociation, ColumnRow, Filters, ForeignKeyRow, TableRow, UniqueKeyRow},
    Error, Result,
};

pub(crate) fn reflect(connection: &Connection, filters: &Filters) -> Result<Vec<TableRow>> {
    let mut tables = vec![];

    for schema in schemas(connection)? {
        if !filters.allows_schema(&schema) {
            continue;
        }

        for table in table_names(connection, &schema, filters)? {
            if !filters.allows_table(&schema, &table) {
                continue;
            }

            tables.push(TableRow {
                columns: columns(connection, &schema, &table, filters)?,
                foreign_keys: foreign_keys(connection, &schema, &table)?,
                unique_keys: unique_keys(connection, &schema, &table)?,
                schema: schema.clone(),
                table,
            });
        }
    }

    Ok(filters.apply(tables))
}

fn schemas(connection: &Connection) -> Result<Vec<String>> {
    query_strings(
        connection,
        "SELECT name FROM pragma_database_list WHERE name <> 'temp' ORDER BY name",
        params![],
    )
}

fn table_names(connection: &Connection, schema: &str, filters: &Filters) -> Result<Vec<String>> {
    let mut sql = format!(
        "SELECT t.name FROM {}.sqlite_master AS t \
         WHERE t.type = 'table' AND t.name NOT LIKE 'sqlite_%'",
        quote(schema)
    );
    push_custom_filter(&mut sql, filters.table_custom_filter.as_deref());
    sql.push_str(" ORDER BY t.name");

    query_strings(connection, &sql, params![])
}

fn columns(
    connection: &Connection,
    schema: &str,
    table: &str,
    filters: &Filters,
) -> Result<Vec<ColumnRow>> {
    let mut sql = "SELECT c.name, c.type, c.pk FROM pragma_table_info(?1, ?2) AS c WHERE 1 = 1"
        .to_string();
    push_custom_filter(&mut sql, filters.column_custom_filter.as_deref());
    sql.push_str(" ORDER BY c.cid");

    let mut stmt = connection
        .prepare(&sql)
        .map_err(Error::driver_operation_failed)?;

    let rows = stmt
        .query_map(params![table, schema], |row| {
            let ty: String = row.get(1)?;
            let pk: i64 = row.get(2)?;

            Ok(ColumnRow {
                name: row.get(0)?,
                ty: normalize_type(&ty),
                is_primary_key: pk > 0,
            })
        })
        .map_err(Error::driver_operation_failed)?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Error::driver_operation_failed)
}

fn primary_key(connection: &Connection, schema: &str, table: &str) -> Result<Vec<String>> {
    query_strings(
        connection,
        "SELECT c.name FROM pragma_table_info(?1, ?2) AS c WHERE c.pk > 0 ORDER BY c.pk",
        params![table, schema],
    )
}

fn foreign_keys(connection: &Connection, schema: &str, table: &str) -> Result<Vec<ForeignKeyRow>> {
    let mut stmt = connection
        .prepare(
            "SELECT f.id, f.\"table\", f.\"from\", f.\"to\" \
             FROM pragma_foreign_key_list(?1, ?2) AS f ORDER BY f.id, f.seq",
        )
        .map_err(Error::driver_operation_failed)?;

    let rows = stmt
        .query_map(params![table, schema], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })
        .map_err(Error::driver_operation_failed)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Error::driver_operation_failed)?;

    let mut groups: Vec<(i64, String, Vec<(String, Option<String>)>)> = vec![];
    for (id, referenced_table, from, to) in rows {
        match groups.last_mut() {
            Some((last, _, pairs)) if *last == id => pairs.push((from, to)),
            _ => groups.push((id, referenced_table, vec![(from, to)])),
        }
    }

    let mut out = vec![];
    for (_, referenced_table, pairs) in groups {
        // A missing target column refers to the referenced primary key.
        let implicit = if pairs.iter().any(|(_, to)| to.is_none()) {
            primary_key(connection, schema, &referenced_table)?
        } else {
            vec![]
        };

        let column_associations: Vec<_> = pairs
            .into_iter()
            .enumerate()
            .filter_map(|(i, (column, to))| {
                let referenced_column = to.or_else(|| implicit.get(i).cloned())?;
                Some(ColumnAssociation {
                    column,
                    referenced_column,
                })
            })
            .collect();

        let constraint_name = format!(
            "{}_{}_fkey",
            table,
            column_associations
                .iter()
                .map(|a| a.column.as_str())
                .collect::<Vec<_>>()
                .join("_")
        );

        out.push(ForeignKeyRow {
            constraint_name,
            referenced_schema: None,
            referenced_table,
            column_associations,
        });
    }

    Ok(out)
}

fn unique_keys(connection: &Connection, schema: &str, table: &str) -> Result<Vec<UniqueKeyRow>> {
    let indexes = query_strings(
        connection,
        "SELECT i.name FROM pragma_index_list(?1, ?2) AS i \
         WHERE i.\"unique\" = 1 AND i.origin IN ('u', 'c') AND i.partial = 0 \
         ORDER BY i.name",
        params![table, schema],
    )?;

    let mut out = vec![];
    for index in indexes {
        let mut stmt = connection
            .prepare("SELECT ii.name FROM pragma_index_info(?1, ?2) AS ii ORDER BY ii.seqno")
            .map_err(Error::driver_operation_failed)?;

        let columns = stmt
            .query_map(params![index, schema], |row| row.get::<_, Option<String>>(0))
            .map_err(Error::driver_operation_failed)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::driver_operation_failed)?;

        // Expression indexes have unnamed columns.
        if let Some(columns) = columns.into_iter().collect::<Option<Vec<_>>>() {
            out.push(UniqueKeyRow {
                constraint_name: index,
                columns,
            });
        }
    }

    Ok(out)
}

fn query_strings(
    connection: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<String>> {
    let mut stmt = connection
        .prepare(sql)
        .map_err(Error::driver_operation_failed)?;

    let rows = stmt
        .query_map(params, |row| row.get::<_, String>(0))
        .map_err(Error::driver_operation_failed)?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Error::driver_operation_failed)
}

fn push_custom_filter(sql: &mut String, filter: Option<&str>) {
    if let Some(filter) = filter {
        sql.push_str(" AND (");
        sql.push_str(filter);
        sql.push(')');
    }
}

/// `VARCHAR(255)` becomes `varchar`.
fn normalize_type(ty: &str) -> String {
    let base = match ty.find('(') {
        Some(pos) => &ty[..pos],
        None => ty,
    };
    base.trim().to_lowercase()
}

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
