use crate::{hook::Event, ResolverRequest, Result};

use tablegraph_core::{
    stmt::{Delete, Value},
    Error,
};

/// Deletes the row named by the primary key arguments and returns it.
pub(super) async fn delete(request: &ResolverRequest) -> Result<Value> {
    let table = request.table();
    let key = super::key_from_args(request)?;

    if let Some(current) = super::select(request, Some(key.clone())).await?.into_iter().next() {
        table
            .events
            .emit(Event::BeforeDelete, request, &Value::Record(current))
            .await?;
    }

    let Some(removed) = request
        .transaction()?
        .exec(Delete {
            table: table.table_ref().clone(),
            filter: Some(key),
        })
        .await?
        .into_iter()
        .next()
    else {
        return Err(Error::no_record(&table.key));
    };

    let removed = Value::Record(table.decode_row(removed));

    table
        .events
        .emit(Event::AfterDelete, request, &removed)
        .await?;

    Ok(removed)
}
