use super::{link, operations, reflect, sdl, Schema, TableId, TypeMapper};
use crate::{AuthRules, Db, Interceptors, Options, Result};

use tablegraph_core::{catalog::Filters, Error};

/// Configures and synthesizes a [`Schema`].
///
/// ```no_run
/// # async fn run() -> tablegraph::Result<()> {
/// use tablegraph::{Db, Schema};
///
/// let db = Db::connect("postgresql://localhost/app").await?;
/// let schema = Schema::builder().build(&db).await?;
/// println!("{}", schema.sdl());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct Builder {
    options: Options,
    auth: Option<AuthRules>,
    interceptors: Interceptors,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn filters(mut self, filters: Filters) -> Self {
        self.options.filters = filters;
        self
    }

    /// Maps the catalog type `source` to the GraphQL type `target`.
    pub fn custom_type(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.options
            .custom_types
            .insert(source.into(), target.into());
        self
    }

    /// Checks root calls against `rules`. Without rules every call is allowed.
    pub fn auth(mut self, rules: AuthRules) -> Self {
        self.auth = Some(rules);
        self
    }

    pub fn interceptors(mut self, interceptors: Interceptors) -> Self {
        self.interceptors = interceptors;
        self
    }

    /// Reflects the catalog of `db` and synthesizes the schema.
    ///
    /// Fails without returning a partial schema if the catalog cannot be
    /// read or a column type has no mapping.
    pub async fn build(self, db: &Db) -> Result<Schema> {
        let rows = reflect::catalog(db, &self.options.filters).await?;
        let mapper = TypeMapper::new(self.options.custom_types);
        let default_schema = db.capability().default_schema;

        let mut tables = vec![];
        let mut foreign_keys = vec![];

        for row in &rows {
            let id = TableId(tables.len());

            let mut table = reflect::table(row, id, default_schema, &mapper)?;
            operations::generate(&mut table, &self.interceptors);

            let key = table.key.clone();
            let Some(mut table) = self.interceptors.table(table) else {
                tracing::debug!(table = %key, "table suppressed");
                continue;
            };

            if tables.iter().any(|t: &super::Table| t.key == table.key) {
                return Err(Error::invalid_config(format!(
                    "two tables resolve to the key `{}`",
                    table.key
                )));
            }

            table.id = id;
            foreign_keys.push((id, row.foreign_keys.clone()));
            tables.push(table);
        }

        link::link(&mut tables, &foreign_keys);

        let sdl = sdl::render(&tables, &mapper);

        tracing::info!(
            tables = tables.len(),
            suppressed = rows.len() - tables.len(),
            queries = tables.iter().map(|t| t.queries.len()).sum::<usize>(),
            mutations = tables.iter().map(|t| t.mutations.len()).sum::<usize>(),
            "schema synthesized"
        );

        Ok(Schema::new(db.clone(), tables, self.auth, sdl))
    }
}
