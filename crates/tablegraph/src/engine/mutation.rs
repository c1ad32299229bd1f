//! Upsert, insert and update with nested writes through relationships.

use crate::{
    hook::Event,
    pipeline::Site,
    schema::{key_of, Relationship, Table},
    ResolverRequest, Result,
};

use async_recursion::async_recursion;
use tablegraph_core::{
    stmt::{Expr, Insert, Record, Update, Value},
    Error,
};

/// How the row to update is found.
pub(crate) enum Match {
    /// From the primary key in the data, or a unique key for nested writes.
    Derive,

    /// Always insert.
    Insert,

    /// The given key must match an existing row.
    Update(Expr),
}

/// Writes `data` and every nested relationship write it carries.
///
/// Single-valued relationships are written first so their keys can be
/// stored on this row. Collections are written after this row exists, with
/// its key injected into each element.
#[async_recursion]
pub(crate) async fn mutate(request: &ResolverRequest, mode: Match) -> Result<Value> {
    let schema = request.schema();
    let table = request.table();

    let mut data = match request.args.get("data") {
        Some(Value::Record(data)) => data.clone(),
        Some(_) => return Err(Error::invalid_argument("data", "expected an object")),
        None => Record::new(),
    };

    // Nested writes through single-valued relationships, and collections
    // set aside until this row exists.
    let mut deferred = vec![];

    for field in data.keys().cloned().collect::<Vec<_>>() {
        let Some(column) = table.column(&field) else {
            return Err(Error::invalid_argument(
                "data",
                format!("`{}` has no field `{field}`", table.type_name),
            ));
        };

        let Some(relationship) = &column.relationship else {
            continue;
        };

        let Some(companion) = &relationship.mutation else {
            return Err(Error::invalid_argument(
                "data",
                format!("`{}.{field}` cannot be written", table.type_name),
            ));
        };

        let value = data.shift_remove(&field).unwrap_or_default();

        if relationship.many {
            deferred.push((field, relationship, companion, value));
            continue;
        }

        if value.is_null() {
            for (local, _) in &relationship.pairs {
                data.insert(local.clone(), Value::Null);
            }
            continue;
        }

        let child = schema
            .call(
                relationship.target,
                Site::Mutation(companion.clone()),
                Some(data.clone()),
                Record::from_iter([("data".to_string(), value)]),
                &request.context,
            )
            .await?
            .into_record()?;

        for (local, target) in &relationship.pairs {
            data.insert(local.clone(), child.get(target).cloned().unwrap_or_default());
        }
    }

    let explicit = matches!(mode, Match::Update(_));
    let update = match mode {
        Match::Insert => None,
        Match::Update(key) => Some(key),
        Match::Derive => derive_key(request, table, &data).await?,
    };

    let existing = match &update {
        Some(key) => super::select(request, Some(key.clone())).await?.into_iter().next(),
        None => None,
    };

    let mut row = match existing {
        Some(current) => {
            tracing::debug!(table = %table.key, "updating existing row");
            update_row(request, table, current, data).await?
        }
        None if explicit => return Err(Error::no_record(&table.key)),
        None => {
            tracing::debug!(table = %table.key, "inserting row");
            insert_row(request, table, data).await?
        }
    };

    for (field, relationship, companion, value) in deferred {
        let items = match value {
            Value::List(items) => items,
            Value::Null => vec![],
            _ => {
                return Err(Error::invalid_argument(
                    "data",
                    format!("`{}.{field}` expects a list", table.type_name),
                ))
            }
        };

        let mut written = Vec::with_capacity(items.len());
        for item in items {
            let item = inject_parent_key(item, relationship, &row, &table.type_name, &field)?;

            let child = schema
                .call(
                    relationship.target,
                    Site::Mutation(companion.clone()),
                    Some(row.clone()),
                    Record::from_iter([("data".to_string(), Value::Record(item))]),
                    &request.context,
                )
                .await?;
            written.push(child);
        }

        row.insert(field, Value::List(written));
    }

    Ok(Value::Record(row))
}

/// The key of the row a write without an explicit match updates.
///
/// A fully supplied primary key wins. Nested writes without one fall back to
/// the unique keys; every fully supplied unique key must agree on the row,
/// and a partly supplied one is an error.
async fn derive_key(request: &ResolverRequest, table: &Table, data: &Record) -> Result<Option<Expr>> {
    let supplied: Vec<&String> = table
        .primary_key
        .iter()
        .filter(|column| data.get(*column).is_some_and(|v| !v.is_null()))
        .collect();

    if !supplied.is_empty() {
        let missing: Vec<&String> = table
            .primary_key
            .iter()
            .filter(|column| !supplied.contains(column))
            .collect();

        if !missing.is_empty() {
            return Err(Error::missing_key(&table.key, missing));
        }

        return Ok(table.primary_key_of(data).map(Expr::key));
    }

    if request.is_root() {
        return Ok(None);
    }

    let mut found: Option<(Vec<(String, Value)>, &str)> = None;

    for unique in &table.unique_keys {
        let missing: Vec<&String> = unique
            .columns
            .iter()
            .filter(|column| data.get(*column).map_or(true, Value::is_null))
            .collect();

        if missing.len() == unique.columns.len() {
            continue;
        }

        if !missing.is_empty() {
            return Err(Error::missing_key(&table.key, missing));
        }

        let Some(pairs) = key_of(&unique.columns, data) else {
            continue;
        };

        let Some(row) = super::select(request, Some(Expr::key(pairs)))
            .await?
            .into_iter()
            .next()
        else {
            continue;
        };

        let Some(key) = table.primary_key_of(&row) else {
            continue;
        };

        match &found {
            Some((first, _)) if *first == key => {}
            Some((_, first)) => {
                return Err(Error::ambiguous_match(&table.key, [*first, unique.name.as_str()]))
            }
            None => found = Some((key, unique.name.as_str())),
        }
    }

    Ok(found.map(|(key, _)| Expr::key(key)))
}

async fn insert_row(request: &ResolverRequest, table: &Table, data: Record) -> Result<Record> {
    table
        .events
        .emit(Event::BeforeInsert, request, &Value::Record(data.clone()))
        .await?;

    let row = request
        .transaction()?
        .exec(Insert {
            table: table.table_ref().clone(),
            values: data,
        })
        .await?
        .into_iter()
        .next()
        .map(|row| table.decode_row(row))
        .ok_or_else(|| Error::no_record(&table.key))?;

    table
        .events
        .emit(Event::AfterInsert, request, &Value::Record(row.clone()))
        .await?;

    Ok(row)
}

async fn update_row(
    request: &ResolverRequest,
    table: &Table,
    current: Record,
    data: Record,
) -> Result<Record> {
    let Some(key) = table.primary_key_of(&current) else {
        return Err(Error::no_record(&table.key));
    };

    table
        .events
        .emit(Event::BeforeUpdate, request, &Value::Record(current))
        .await?;

    let row = request
        .transaction()?
        .exec(Update {
            table: table.table_ref().clone(),
            assignments: data,
            filter: Some(Expr::key(key)),
        })
        .await?
        .into_iter()
        .next()
        .map(|row| table.decode_row(row))
        .ok_or_else(|| Error::no_record(&table.key))?;

    table
        .events
        .emit(Event::AfterUpdate, request, &Value::Record(row.clone()))
        .await?;

    Ok(row)
}

/// Points a collection element at the parent row.
fn inject_parent_key(
    item: Value,
    relationship: &Relationship,
    parent: &Record,
    type_name: &str,
    field: &str,
) -> Result<Record> {
    let Value::Record(mut item) = item else {
        return Err(Error::invalid_argument(
            "data",
            format!("elements of `{type_name}.{field}` must be objects"),
        ));
    };

    for (local, target) in &relationship.pairs {
        item.insert(target.clone(), parent.get(local).cloned().unwrap_or_default());
    }

    Ok(item)
}
