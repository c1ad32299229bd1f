use super::Error;

/// Error when a column's source type has no GraphQL type mapping.
#[derive(Debug)]
pub(super) struct UnmappableTypeError {
    source_type: Box<str>,
    table: Box<str>,
    column: Box<str>,
}

impl std::error::Error for UnmappableTypeError {}

impl core::fmt::Display for UnmappableTypeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "could not get GraphQL type for source type `{}` of column `{}.{}`",
            self.source_type, self.table, self.column
        )
    }
}

impl Error {
    pub fn unmappable_type(
        source_type: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::UnmappableType(UnmappableTypeError {
            source_type: source_type.into().into(),
            table: table.into().into(),
            column: column.into().into(),
        }))
    }

    /// Returns `true` if this error is an unmappable type error.
    pub fn is_unmappable_type(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnmappableType(_))
    }
}
