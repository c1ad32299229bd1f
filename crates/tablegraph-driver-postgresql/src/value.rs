use tablegraph_core::stmt::{Record, TableRef, Value as CoreValue};
use tablegraph_sql::TypedValue;

/// A statement parameter in PostgreSQL text form.
///
/// Statements cast every placeholder from `text` to the column type, so
/// parameters only need a faithful text rendering.
#[derive(Debug)]
pub struct Value(Option<String>);

impl Value {
    pub fn as_text(&self) -> &Option<String> {
        &self.0
    }
}

impl From<TypedValue> for Value {
    fn from(param: TypedValue) -> Self {
        let is_array = param.ty.as_deref().is_some_and(|ty| ty.starts_with('_'));
        Value(to_text(param.value, is_array))
    }
}

fn to_text(value: CoreValue, is_array: bool) -> Option<String> {
    match value {
        CoreValue::Null => None,
        CoreValue::Bool(v) => Some(v.to_string()),
        CoreValue::I64(v) => Some(v.to_string()),
        CoreValue::F64(v) => Some(v.to_string()),
        CoreValue::String(v) => Some(v),
        CoreValue::Bytes(v) => Some(bytea(&v)),
        CoreValue::List(items) if is_array => Some(array_literal(items)),
        value @ (CoreValue::List(_) | CoreValue::Record(_)) => {
            Some(serde_json::Value::from(value).to_string())
        }
    }
}

fn bytea(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("\\x");
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// Renders `{"a","b",NULL}`.
fn array_literal(items: Vec<CoreValue>) -> String {
    let elements: Vec<String> = items
        .into_iter()
        .map(|item| match to_text(item, true) {
            None => "NULL".to_string(),
            Some(text) if text.starts_with('{') => text,
            Some(text) => format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\"")),
        })
        .collect();

    format!("{{{}}}", elements.join(","))
}

/// Converts a `row_to_json` result into a record in column order.
///
/// Columns excluded from the table reference are dropped.
pub fn record_from_json(table: &TableRef, json: serde_json::Value) -> Record {
    let mut fields = match json {
        serde_json::Value::Object(fields) => fields,
        _ => Default::default(),
    };

    table
        .columns
        .keys()
        .map(|column| {
            let value = fields.remove(column).map(CoreValue::from).unwrap_or_default();
            (column.clone(), value)
        })
        .collect()
}
