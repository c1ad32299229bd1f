use serde::Serialize;
use tablegraph_core::Error;

/// The caller-facing shape of an error, as placed in a GraphQL response's
/// `errors` list.
///
/// Only the rendered message is exposed; sources and backtraces stay on the
/// server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub message: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,

    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extensions {
    pub code: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invalid_args: Vec<String>,
}

impl ErrorBody {
    /// Formats `err` raised while resolving the field at `path`.
    pub fn new(err: &Error, path: impl IntoIterator<Item = impl Into<String>>) -> ErrorBody {
        ErrorBody {
            message: err.to_string(),
            path: path.into_iter().map(Into::into).collect(),
            extensions: Extensions {
                code: err.code().to_string(),
                invalid_args: err.invalid_args(),
            },
        }
    }
}

impl From<&Error> for ErrorBody {
    fn from(err: &Error) -> ErrorBody {
        ErrorBody::new(err, Vec::<String>::new())
    }
}

impl From<Error> for ErrorBody {
    fn from(err: Error) -> ErrorBody {
        ErrorBody::from(&err)
    }
}
