use super::{Flavor, Formatter, ToSql};

use tablegraph_core::stmt;

pub trait Params {
    /// Stores a parameter and returns its placeholder. `ty` is the catalog
    /// type of the column the value is compared with or written to.
    fn push(&mut self, value: &stmt::Value, ty: Option<&str>) -> Placeholder;
}

/// A bound parameter along with the catalog type of its column.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    pub value: stmt::Value,
    pub ty: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder(pub usize);

/// A value to be bound, serialized as a placeholder.
pub(super) struct Param<'a> {
    pub(super) value: &'a stmt::Value,
    pub(super) ty: Option<&'a str>,
}

impl Params for Vec<stmt::Value> {
    fn push(&mut self, value: &stmt::Value, _ty: Option<&str>) -> Placeholder {
        self.push(value.clone());
        Placeholder(self.len())
    }
}

impl Params for Vec<TypedValue> {
    fn push(&mut self, value: &stmt::Value, ty: Option<&str>) -> Placeholder {
        self.push(TypedValue {
            value: value.clone(),
            ty: ty.map(str::to_string),
        });
        Placeholder(self.len())
    }
}

impl ToSql for Param<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let Placeholder(n) = f.params.push(self.value, self.ty);

        match f.serializer.flavor {
            // Parameters are sent as text and cast to the column type.
            Flavor::Postgresql => {
                f.dst.push_str(&format!("${n}::text"));
                if let Some(ty) = self.ty {
                    f.dst.push_str("::");
                    f.dst.push_str(ty);
                }
            }
            Flavor::Sqlite => f.dst.push_str(&format!("?{n}")),
        }
    }
}
