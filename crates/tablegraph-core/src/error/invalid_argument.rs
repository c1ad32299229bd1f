use super::Error;

/// Error when a resolver argument cannot be used as given.
#[derive(Debug)]
pub(super) struct InvalidArgumentError {
    pub(super) argument: Box<str>,
    message: Box<str>,
}

impl std::error::Error for InvalidArgumentError {}

impl core::fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid argument `{}`: {}", self.argument, self.message)
    }
}

impl Error {
    /// Creates an error for a malformed or unknown resolver argument.
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidArgument(InvalidArgumentError {
            argument: argument.into().into(),
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid argument error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidArgument(_))
    }
}
