use super::Error;

/// Error when the unique keys present in a mutation payload identify more
/// than one distinct row.
#[derive(Debug)]
pub(super) struct AmbiguousMatchError {
    table: Box<str>,
    constraints: Vec<Box<str>>,
}

impl std::error::Error for AmbiguousMatchError {}

impl core::fmt::Display for AmbiguousMatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unique keys of `{}` match different rows: {}",
            self.table,
            self.constraints.join(", ")
        )
    }
}

impl Error {
    /// Creates an error for a payload whose unique keys resolve to more than
    /// one row.
    pub fn ambiguous_match(
        table: impl Into<String>,
        constraints: impl IntoIterator<Item = impl Into<String>>,
    ) -> Error {
        Error::from(super::ErrorKind::AmbiguousMatch(AmbiguousMatchError {
            table: table.into().into(),
            constraints: constraints
                .into_iter()
                .map(|c| c.into().into_boxed_str())
                .collect(),
        }))
    }

    /// Returns `true` if this error is an ambiguous unique-key match.
    pub fn is_ambiguous_match(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::AmbiguousMatch(_))
    }
}
