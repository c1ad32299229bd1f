use crate::{ResolverRequest, Result};

use tablegraph_core::{
    err,
    stmt::{Expr, Value},
};

/// Resolves a foreign key accessor on `request.parent`.
pub(super) async fn resolve(request: &ResolverRequest) -> Result<Value> {
    let name = &request.resolver().name;
    let Some(relationship) = request
        .table()
        .column(name)
        .and_then(|column| column.relationship.as_ref())
    else {
        return Err(err!("`{name}` is not a relationship"));
    };

    let Some(parent) = &request.parent else {
        return Err(err!("relationship `{name}` resolved without a parent"));
    };

    // Already loaded, e.g. the children written by a nested mutation.
    match parent.get(name) {
        Some(value @ Value::List(_)) if relationship.many => return Ok(value.clone()),
        Some(value @ Value::Record(_)) if !relationship.many => return Ok(value.clone()),
        _ => {}
    }

    let mut pairs = vec![];
    for (local, target) in &relationship.pairs {
        match parent.get(local) {
            Some(value) if !value.is_null() => pairs.push((target.clone(), value.clone())),
            _ if relationship.many => return Ok(Value::List(vec![])),
            _ => return Ok(Value::Null),
        }
    }

    let rows = super::select_from(request, relationship.target, Some(Expr::key(pairs))).await?;

    if relationship.many {
        Ok(Value::List(rows.into_iter().map(Value::Record).collect()))
    } else {
        Ok(rows.into_iter().next().map(Value::Record).unwrap_or_default())
    }
}
