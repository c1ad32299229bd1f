use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tablegraph_core::{catalog::Filters, Error, Result};

/// The declarative part of the schema configuration.
///
/// ```toml
/// [filters]
/// ignore_tables = ["migrations"]
/// schemas = ["public"]
///
/// [custom_types]
/// geometry = "JSON"
/// ```
///
/// Permission rules and interceptors hold code and are attached on the
/// [`Builder`](crate::Builder).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    pub filters: Filters,

    /// Source type to GraphQL type. Consulted before the built-in mapping.
    pub custom_types: IndexMap<String, String>,
}

impl Options {
    pub fn from_toml(src: &str) -> Result<Options> {
        toml::from_str(src).map_err(|err| Error::invalid_config(err.to_string()))
    }

    /// Reads options from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Options> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|err| {
            Error::invalid_config(format!("failed to read {}: {err}", path.display()))
        })?;
        Self::from_toml(&src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filters_and_custom_types() {
        let options = Options::from_toml(
            r#"
            [filters]
            ignore_tables = ["migrations"]
            ignore_columns = ["user.password"]
            table_custom_filter = "t.table_name not like 'tmp_%'"

            [custom_types]
            geometry = "JSON"
            money = "Money"
            "#,
        )
        .unwrap();

        assert_eq!(options.filters.ignore_tables, ["migrations"]);
        assert_eq!(options.filters.ignore_columns, ["user.password"]);
        assert!(options.filters.schemas.is_empty());
        assert_eq!(
            options.filters.table_custom_filter.as_deref(),
            Some("t.table_name not like 'tmp_%'")
        );
        assert_eq!(options.custom_types["money"], "Money");
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(Options::from_toml("").unwrap(), Options::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Options::from_toml("[filters]\nignore = []").unwrap_err();
        assert!(err.is_invalid_config());
        assert_eq!(err.code(), "INVALID_CONFIG");
    }
}
