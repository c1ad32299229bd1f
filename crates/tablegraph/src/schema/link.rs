//! Turns foreign keys into relationship columns on both tables.

use super::{Column, Relationship, Resolver, ResolverKind, Table, TableId, TypeRef};

use std::collections::HashMap;
use tablegraph_core::catalog::ForeignKeyRow;

/// Links every foreign key of `foreign_keys` (grouped by owning table).
///
/// Runs after all table nodes exist, so both ends of a constraint are
/// addressed by index. Constraints whose referenced table is not part of
/// the schema are skipped.
pub(super) fn link(tables: &mut [Table], foreign_keys: &[(TableId, Vec<ForeignKeyRow>)]) {
    let by_name: HashMap<(String, String), TableId> = tables
        .iter()
        .map(|table| ((table.schema.clone(), table.name.clone()), table.id))
        .collect();

    for (local, constraints) in foreign_keys {
        for fk in constraints {
            let schema = fk
                .referenced_schema
                .clone()
                .unwrap_or_else(|| tables[local.0].schema.clone());

            let Some(&target) = by_name.get(&(schema, fk.referenced_table.clone())) else {
                tracing::warn!(
                    table = %tables[local.0].key,
                    constraint = %fk.constraint_name,
                    referenced_table = %fk.referenced_table,
                    "skipping foreign key; referenced table is not in the schema"
                );
                continue;
            };

            let pairs: Vec<(String, String)> = fk
                .column_associations
                .iter()
                .map(|a| (a.column.clone(), a.referenced_column.clone()))
                .collect();

            let linkable = !pairs.is_empty()
                && pairs.iter().all(|(column, referenced)| {
                    tables[local.0].is_stored(column) && tables[target.0].is_stored(referenced)
                });

            if !linkable {
                tracing::warn!(
                    table = %tables[local.0].key,
                    constraint = %fk.constraint_name,
                    "skipping foreign key; columns are not in the schema"
                );
                continue;
            }

            link_one(tables, *local, target, &fk.constraint_name, pairs);
        }
    }
}

fn link_one(
    tables: &mut [Table],
    local: TableId,
    target: TableId,
    constraint: &str,
    pairs: Vec<(String, String)>,
) {
    let accessor = accessor_name(&pairs);

    // Owning side: a single row of the referenced table.
    let (name, column) = {
        let owner = &tables[local.0];
        let referenced = &tables[target.0];

        let name = free_name(owner, accessor.clone(), &referenced.key);
        let ty = TypeRef::named(&referenced.type_name);
        let mutation = referenced
            .mutations
            .get(&referenced.key)
            .map(|m| m.name.clone());

        let column = relationship_column(
            &name,
            ty.clone(),
            Relationship {
                target,
                constraint: constraint.to_string(),
                pairs: pairs.clone(),
                many: false,
                resolver: Resolver::new(&name, ResolverKind::Relationship, ty),
                mutation,
            },
        );

        (name, column)
    };

    let owner = &mut tables[local.0];
    for (column, _) in &pairs {
        let keeps_meaning = owner.primary_key.contains(column)
            || owner
                .unique_keys
                .iter()
                .any(|unique| unique.columns.contains(column));

        if let Some(column) = owner.columns.get_mut(column) {
            if !keeps_meaning {
                column.export = false;
                column.allow_input = false;
            }
        }
    }
    owner.columns.insert(name, column);

    // Referenced side: every row of the owning table pointing here.
    let (name, column) = {
        let owner = &tables[local.0];
        let referenced = &tables[target.0];

        let name = free_name(referenced, format!("{}_{accessor}", owner.key), &owner.key);
        let ty = TypeRef::list_of(&owner.type_name);
        let mutation = owner.mutations.get(&owner.key).map(|m| m.name.clone());

        let column = relationship_column(
            &name,
            ty.clone(),
            Relationship {
                target: local,
                constraint: constraint.to_string(),
                pairs: pairs
                    .iter()
                    .map(|(column, referenced)| (referenced.clone(), column.clone()))
                    .collect(),
                many: true,
                resolver: Resolver::new(&name, ResolverKind::Relationship, ty),
                mutation,
            },
        );

        (name, column)
    };

    tables[target.0].columns.insert(name, column);
}

fn relationship_column(name: &str, ty: TypeRef, relationship: Relationship) -> Column {
    Column {
        name: name.to_string(),
        source_ty: None,
        ty,
        primary_key: false,
        allow_input: relationship.mutation.is_some(),
        export: true,
        relationship: Some(relationship),
    }
}

/// `author_id -> id` is accessed as `author`. Composite keys join their
/// parts with `_`.
fn accessor_name(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(column, referenced)| {
            column
                .strip_suffix(&format!("_{referenced}"))
                .filter(|stripped| !stripped.is_empty())
                .unwrap_or(column.as_str())
        })
        .collect::<Vec<_>>()
        .join("_")
}

/// `candidate`, or a suffixed variant when the table already has a column
/// with that name.
fn free_name(table: &Table, candidate: String, suffix: &str) -> String {
    if !table.columns.contains_key(&candidate) {
        return candidate;
    }

    let suffixed = format!("{candidate}_{suffix}");
    if !table.columns.contains_key(&suffixed) {
        return suffixed;
    }

    (2..)
        .map(|n| format!("{suffixed}_{n}"))
        .find(|name| !table.columns.contains_key(name))
        .unwrap_or(suffixed)
}
