mod adhoc;
mod ambiguous_match;
mod authorization;
mod connection_pool;
mod driver_operation_failed;
mod invalid_argument;
mod invalid_config;
mod missing_key;
mod no_record;
mod reflection;
mod unmappable_type;

use adhoc::AdhocError;
use ambiguous_match::AmbiguousMatchError;
use authorization::AuthorizationError;
use connection_pool::ConnectionPoolError;
use driver_operation_failed::DriverOperationFailed;
use invalid_argument::InvalidArgumentError;
use invalid_config::InvalidConfigError;
use missing_key::MissingKeyError;
use no_record::NoRecordError;
use reflection::ReflectionError;
use std::sync::Arc;
use unmappable_type::UnmappableTypeError;

/// Returns early with an ad-hoc error built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Builds an ad-hoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur while building or executing a schema.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Creates an ad-hoc error from format arguments.
    pub fn from_args(args: core::fmt::Arguments<'_>) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::new(args)))
    }

    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context
    /// is shown first, followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let message = consequent.kind().to_string();

        let mut err = match consequent.inner {
            Some(inner) => match Arc::try_unwrap(inner) {
                Ok(inner) if inner.cause.is_none() => Error {
                    inner: Some(Arc::new(inner)),
                },
                // Shared or already chained consequents are flattened to a
                // message so the cause slot is free.
                _ => Error::from_args(format_args!("{message}")),
            },
            None => Error::from(ErrorKind::Unknown),
        };

        if let Some(inner) = err.inner.as_mut().and_then(Arc::get_mut) {
            inner.cause = Some(self);
        }

        err
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }

    /// Returns the machine-readable code reported to API clients.
    ///
    /// Context layers added with [`Error::context`] are skipped; the first
    /// structured error in the chain decides the code.
    pub fn code(&self) -> &'static str {
        self.chain()
            .find_map(|err| err.kind().code())
            .unwrap_or("INTERNAL")
    }

    /// Returns the names of the arguments that caused this error, if any.
    pub fn invalid_args(&self) -> Vec<String> {
        for err in self.chain() {
            match err.kind() {
                ErrorKind::InvalidArgument(err) => return vec![err.argument.to_string()],
                ErrorKind::MissingKey(err) => {
                    return err.columns.iter().map(|c| c.to_string()).collect()
                }
                _ => {}
            }
        }

        vec![]
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::DriverOperationFailed(err) => Some(err),
            ErrorKind::ConnectionPool(err) => Some(err),
            ErrorKind::Reflection(err) => Some(err),
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    AmbiguousMatch(AmbiguousMatchError),
    Authorization(AuthorizationError),
    ConnectionPool(ConnectionPoolError),
    DriverOperationFailed(DriverOperationFailed),
    InvalidArgument(InvalidArgumentError),
    InvalidConfig(InvalidConfigError),
    MissingKey(MissingKeyError),
    NoRecord(NoRecordError),
    Reflection(ReflectionError),
    UnmappableType(UnmappableTypeError),
    Unknown,
}

impl ErrorKind {
    fn code(&self) -> Option<&'static str> {
        use self::ErrorKind::*;

        Some(match self {
            // Context messages defer to their cause.
            Adhoc(_) | Unknown => return None,
            Anyhow(_) => "INTERNAL",
            AmbiguousMatch(_) => "AMBIGUOUS_MATCH",
            Authorization(_) => "FORBIDDEN",
            ConnectionPool(_) | DriverOperationFailed(_) => "DATABASE_ERROR",
            InvalidArgument(_) => "BAD_USER_INPUT",
            InvalidConfig(_) => "INVALID_CONFIG",
            MissingKey(_) => "MISSING_KEY",
            NoRecord(_) => "NO_RECORD",
            Reflection(_) => "REFLECTION_FAILED",
            UnmappableType(_) => "UNMAPPABLE_TYPE",
        })
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            AmbiguousMatch(err) => core::fmt::Display::fmt(err, f),
            Authorization(err) => core::fmt::Display::fmt(err, f),
            ConnectionPool(err) => core::fmt::Display::fmt(err, f),
            DriverOperationFailed(err) => core::fmt::Display::fmt(err, f),
            InvalidArgument(err) => core::fmt::Display::fmt(err, f),
            InvalidConfig(err) => core::fmt::Display::fmt(err, f),
            MissingKey(err) => core::fmt::Display::fmt(err, f),
            NoRecord(err) => core::fmt::Display::fmt(err, f),
            Reflection(err) => core::fmt::Display::fmt(err, f),
            UnmappableType(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown tablegraph error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}
