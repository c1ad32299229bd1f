mod builder;
pub use builder::Builder;

mod column;
pub use column::{Column, Relationship};

mod link;

mod operations;

mod reflect;

mod resolver;
pub use resolver::{Arg, Body, Handler, Resolver, ResolverKind};

mod sdl;

mod table;
pub(crate) use table::key_of;
pub use table::{Table, TableId, UniqueKey};

mod ty;
pub use ty::{TypeMapper, TypeRef};

use crate::{AuthRules, Db};

use indexmap::IndexMap;
use std::{fmt, sync::Arc};

/// A synthesized schema: the type document and the resolvers serving it.
///
/// Cheap to clone.
#[derive(Clone)]
pub struct Schema {
    inner: Arc<Inner>,
}

struct Inner {
    db: Db,
    tables: Vec<Table>,
    auth: Option<AuthRules>,
    sdl: String,

    /// Root query field name to owning table
    queries: IndexMap<String, TableId>,

    /// Root mutation field name to owning table
    mutations: IndexMap<String, TableId>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub(crate) fn new(db: Db, tables: Vec<Table>, auth: Option<AuthRules>, sdl: String) -> Schema {
        let mut queries = IndexMap::new();
        let mut mutations = IndexMap::new();

        for table in &tables {
            for name in table.queries.keys() {
                queries.insert(name.clone(), table.id);
            }
            for name in table.mutations.keys() {
                mutations.insert(name.clone(), table.id);
            }
        }

        Schema {
            inner: Arc::new(Inner {
                db,
                tables,
                auth,
                sdl,
                queries,
                mutations,
            }),
        }
    }

    /// The GraphQL type document.
    pub fn sdl(&self) -> &str {
        &self.inner.sdl
    }

    pub fn db(&self) -> &Db {
        &self.inner.db
    }

    pub fn tables(&self) -> &[Table] {
        &self.inner.tables
    }

    /// Looks up a table by its key.
    pub fn table(&self, key: &str) -> Option<&Table> {
        self.inner.tables.iter().find(|table| table.key == key)
    }

    /// Looks up a table by its object type name.
    pub fn table_by_type(&self, type_name: &str) -> Option<&Table> {
        self.inner
            .tables
            .iter()
            .find(|table| table.type_name == type_name)
    }

    pub(crate) fn table_by_id(&self, id: TableId) -> &Table {
        &self.inner.tables[id.0]
    }

    /// Root query field names, in document order.
    pub fn query_names(&self) -> impl Iterator<Item = &str> {
        self.inner.queries.keys().map(String::as_str)
    }

    /// Root mutation field names, in document order.
    pub fn mutation_names(&self) -> impl Iterator<Item = &str> {
        self.inner.mutations.keys().map(String::as_str)
    }

    pub(crate) fn query_table(&self, name: &str) -> Option<TableId> {
        self.inner.queries.get(name).copied()
    }

    pub(crate) fn mutation_table(&self, name: &str) -> Option<TableId> {
        self.inner.mutations.get(name).copied()
    }

    pub(crate) fn auth(&self) -> Option<&AuthRules> {
        self.inner.auth.as_ref()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("tables", &self.inner.tables)
            .field("auth", &self.inner.auth.is_some())
            .finish()
    }
}
