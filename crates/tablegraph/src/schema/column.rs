use super::{Resolver, TableId, TypeRef};

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,

    /// Catalog type. `None` for relationship columns.
    pub source_ty: Option<String>,

    pub ty: TypeRef,

    pub primary_key: bool,

    /// Listed in the input type.
    pub allow_input: bool,

    /// Listed in the object type.
    pub export: bool,

    pub relationship: Option<Relationship>,
}

/// A foreign-key accessor.
#[derive(Debug, Clone)]
pub struct Relationship {
    pub target: TableId,

    /// Name of the foreign key constraint.
    pub constraint: String,

    /// `(column on this table, column on the target table)` equality pairs.
    pub pairs: Vec<(String, String)>,

    /// Collection-valued (the referenced side of the foreign key).
    pub many: bool,

    pub resolver: Resolver,

    /// Name of the mutation on the target table that persists a nested write
    /// through this relationship.
    pub mutation: Option<String>,
}

impl Column {
    pub(crate) fn stored(name: &str, source_ty: &str, ty: TypeRef, primary_key: bool) -> Column {
        Column {
            name: name.to_string(),
            source_ty: Some(source_ty.to_string()),
            ty,
            primary_key,
            allow_input: true,
            export: true,
            relationship: None,
        }
    }

    pub fn is_relationship(&self) -> bool {
        self.relationship.is_some()
    }
}
