use indexmap::IndexMap;
use std::fmt;

/// Built-in scalars every document may reference without declaring them.
pub const BUILTIN_SCALARS: &[&str] = &["ID", "Int", "Float", "String", "Boolean"];

/// Scalars the synthesizer declares itself.
pub const DECLARED_SCALARS: &[&str] = &["Date", "JSON"];

/// A GraphQL type reference: a named type, optionally wrapped as a list
/// and/or marked non-null.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub name: String,
    pub list: bool,
    pub required: bool,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> TypeRef {
        TypeRef {
            name: name.into(),
            list: false,
            required: false,
        }
    }

    pub fn list_of(name: impl Into<String>) -> TypeRef {
        TypeRef {
            list: true,
            ..TypeRef::named(name)
        }
    }

    pub fn required(mut self) -> TypeRef {
        self.required = true;
        self
    }

    pub fn is_id(&self) -> bool {
        !self.list && self.name == "ID"
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.list {
            write!(f, "[{}]", self.name)?;
        } else {
            f.write_str(&self.name)?;
        }

        if self.required {
            f.write_str("!")?;
        }

        Ok(())
    }
}

/// Maps catalog source types to GraphQL scalar names.
#[derive(Debug, Clone, Default)]
pub struct TypeMapper {
    custom: IndexMap<String, String>,
}

impl TypeMapper {
    pub fn new(custom: IndexMap<String, String>) -> TypeMapper {
        let custom = custom
            .into_iter()
            .map(|(source, target)| (source.to_lowercase(), target))
            .collect();
        TypeMapper { custom }
    }

    /// Custom mappings take precedence over the built-in table.
    pub fn map(&self, source_ty: &str) -> Option<&str> {
        let source_ty = source_ty.trim().to_lowercase();

        if let Some(target) = self.custom.get(&source_ty) {
            return Some(target);
        }

        builtin(&source_ty)
    }

    /// Scalars referenced by custom mappings that need a declaration.
    pub fn custom_scalars(&self) -> Vec<&str> {
        let mut scalars: Vec<&str> = self
            .custom
            .values()
            .map(String::as_str)
            .filter(|name| !BUILTIN_SCALARS.contains(name) && !DECLARED_SCALARS.contains(name))
            .collect();
        scalars.sort_unstable();
        scalars.dedup();
        scalars
    }
}

fn builtin(source_ty: &str) -> Option<&'static str> {
    Some(match source_ty {
        "bigint" | "bigserial" | "int" | "int2" | "int4" | "int8" | "integer" | "mediumint"
        | "serial" | "serial4" | "serial8" | "smallint" | "smallserial" | "tinyint" => "Int",
        "decimal" | "double" | "double precision" | "float" | "float4" | "float8" | "money"
        | "number" | "numeric" | "real" => "Float",
        "bool" | "boolean" => "Boolean",
        "bpchar" | "char" | "character" | "character varying" | "citext" | "clob" | "inet"
        | "interval" | "name" | "nchar" | "nvarchar" | "text" | "time"
        | "time with time zone" | "time without time zone" | "timetz" | "uuid" | "varchar" => {
            "String"
        }
        "date" | "datetime" | "timestamp" | "timestamp with time zone"
        | "timestamp without time zone" | "timestamptz" => "Date",
        "blob" | "bytea" | "json" | "jsonb" => "JSON",
        _ => return None,
    })
}
