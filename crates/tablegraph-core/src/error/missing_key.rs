use super::Error;

/// Error when a mutation supplies only part of a composite primary key.
#[derive(Debug)]
pub(super) struct MissingKeyError {
    table: Box<str>,
    pub(super) columns: Vec<Box<str>>,
}

impl std::error::Error for MissingKeyError {}

impl core::fmt::Display for MissingKeyError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "missing primary key columns for `{}`: {}",
            self.table,
            self.columns.join(", ")
        )
    }
}

impl Error {
    /// Creates an error naming the primary key columns that were not supplied.
    pub fn missing_key(
        table: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Error {
        Error::from(super::ErrorKind::MissingKey(MissingKeyError {
            table: table.into().into(),
            columns: columns
                .into_iter()
                .map(|c| c.into().into_boxed_str())
                .collect(),
        }))
    }

    /// Returns `true` if this error is a missing key error.
    pub fn is_missing_key(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MissingKey(_))
    }
}
