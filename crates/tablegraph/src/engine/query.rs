use crate::{ResolverRequest, Result};

use tablegraph_core::{
    stmt::{filter, Value},
    Error,
};

/// The default list query: every row matching the optional `where`
/// argument.
pub(super) async fn list(request: &ResolverRequest) -> Result<Value> {
    let table = request.table();

    let filter = match request.args.get("where") {
        // Clients that cannot send JSON objects pass the filter as text.
        Some(Value::String(text)) => {
            let json: serde_json::Value = serde_json::from_str(text)
                .map_err(|err| Error::invalid_argument("where", err.to_string()))?;
            filter::parse(&Value::from(json), |column| table.is_stored(column))?
        }
        Some(input) => filter::parse(input, |column| table.is_stored(column))?,
        None => None,
    };

    let rows = super::select(request, filter).await?;
    Ok(Value::List(rows.into_iter().map(Value::Record).collect()))
}
