use indexmap::IndexMap;

/// The physical table a statement targets.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub schema: String,
    pub name: String,

    /// Stored columns in catalog order, mapped to their source type.
    pub columns: IndexMap<String, String>,

    /// Primary key columns in declared order.
    pub primary_key: Vec<String>,
}

impl TableRef {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// The catalog type of `column`, used by drivers that bind typed
    /// parameters.
    pub fn column_ty(&self, column: &str) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }
}
