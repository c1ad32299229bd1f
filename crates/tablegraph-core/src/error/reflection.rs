use super::Error;

/// Error raised while reading the catalog from the database.
#[derive(Debug)]
pub(super) struct ReflectionError {
    cause: Error,
}

impl std::error::Error for ReflectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

impl core::fmt::Display for ReflectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "failed to reflect database catalog: {}", self.cause)
    }
}

impl Error {
    /// Wraps a failure that happened while reading the catalog.
    pub fn reflection(cause: Error) -> Error {
        Error::from(super::ErrorKind::Reflection(ReflectionError { cause }))
    }

    /// Returns `true` if this error is a reflection failure.
    pub fn is_reflection(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Reflection(_))
    }
}
