use super::Error;

/// Error when a permission check rejects an operation.
#[derive(Debug)]
pub(super) struct AuthorizationError {
    operation: Box<str>,
}

impl std::error::Error for AuthorizationError {}

impl core::fmt::Display for AuthorizationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "not authorized to call `{}`", self.operation)
    }
}

impl Error {
    /// Creates an authorization error for the named operation.
    pub fn authorization(operation: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Authorization(AuthorizationError {
            operation: operation.into().into(),
        }))
    }

    /// Returns `true` if this error is an authorization failure.
    pub fn is_authorization(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Authorization(_))
    }
}
