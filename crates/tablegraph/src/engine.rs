//! The generated behavior behind each resolver kind.

mod delete;
mod mutation;
mod query;
mod relationship;

use crate::{schema::ResolverKind, ResolverRequest, Result};

use tablegraph_core::{
    stmt::{Expr, Record, Select, Value},
    Error,
};

pub(crate) async fn dispatch(request: &ResolverRequest) -> Result<Value> {
    match request.resolver().kind {
        ResolverKind::Query => query::list(request).await,
        ResolverKind::Mutation => mutation::mutate(request, mutation::Match::Derive).await,
        ResolverKind::Insert => mutation::mutate(request, mutation::Match::Insert).await,
        ResolverKind::Update => {
            let key = key_from_args(request)?;
            mutation::mutate(request, mutation::Match::Update(key)).await
        }
        ResolverKind::Delete => delete::delete(request).await,
        ResolverKind::Relationship => relationship::resolve(request).await,
    }
}

/// Primary key filter from the arguments of an update or delete.
fn key_from_args(request: &ResolverRequest) -> Result<Expr> {
    let table = request.table();

    let mut pairs = vec![];
    let mut missing = vec![];

    for column in &table.primary_key {
        match request.args.get(column) {
            Some(value) if !value.is_null() => pairs.push((column.clone(), value.clone())),
            _ => missing.push(column.clone()),
        }
    }

    if !missing.is_empty() {
        return Err(Error::missing_key(&table.key, missing));
    }

    Ok(Expr::key(pairs))
}

/// Rows of the request's table matching `filter`, decoded.
async fn select(request: &ResolverRequest, filter: Option<Expr>) -> Result<Vec<Record>> {
    select_from(request, request.table_id(), filter).await
}

async fn select_from(
    request: &ResolverRequest,
    table: crate::schema::TableId,
    filter: Option<Expr>,
) -> Result<Vec<Record>> {
    let table = request.schema().table_by_id(table);
    let rows = request
        .transaction()?
        .exec(Select::new(table.table_ref().clone(), filter))
        .await?;

    Ok(rows.into_iter().map(|row| table.decode_row(row)).collect())
}
