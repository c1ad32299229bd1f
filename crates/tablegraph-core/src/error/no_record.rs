use super::Error;

/// Error when an insert, update, or delete yields no row.
#[derive(Debug)]
pub(super) struct NoRecordError {
    table: Box<str>,
}

impl std::error::Error for NoRecordError {}

impl core::fmt::Display for NoRecordError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "no record found: {}", self.table)
    }
}

impl Error {
    /// Creates an error for a write that affected no row of `table`.
    pub fn no_record(table: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::NoRecord(NoRecordError {
            table: table.into().into(),
        }))
    }

    /// Returns `true` if this error is a no-record error.
    pub fn is_no_record(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::NoRecord(_))
    }
}
