use crate::{
    engine, hook,
    rules::Lookup,
    schema::{Body, Resolver, Table, TableId},
    Db, Schema, Transaction,
};

use indexmap::IndexMap;
use tablegraph_core::{
    err,
    stmt::{Record, Value},
    Error, Result,
};
use tracing::Instrument;

/// Ambient state of one client request.
#[derive(Debug, Clone, Default)]
pub struct Context {
    identity: Option<Value>,
    transaction: Option<Transaction>,
}

impl Context {
    pub fn new() -> Context {
        Context::default()
    }

    /// Attaches the already verified identity of the caller.
    pub fn with_identity(mut self, identity: impl Into<Value>) -> Context {
        self.identity = Some(identity.into());
        self
    }

    /// Runs resolvers inside `transaction` instead of opening their own.
    pub fn with_transaction(mut self, transaction: Transaction) -> Context {
        self.transaction = Some(transaction);
        self
    }

    pub fn identity(&self) -> Option<&Value> {
        self.identity.as_ref()
    }

    pub fn transaction(&self) -> Option<&Transaction> {
        self.transaction.as_ref()
    }
}

/// Identifies a resolver within its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Site {
    Query(String),
    Mutation(String),

    /// Relationship column
    Field(String),
}

/// Everything one resolver invocation sees.
#[derive(Debug)]
pub struct ResolverRequest {
    schema: Schema,
    table: TableId,
    resolver: Resolver,

    /// Set by the pipeline before the body runs.
    pub(crate) transaction: Option<Transaction>,

    /// The object a relationship field is resolved on, or the data of the
    /// enclosing write for nested mutations. `None` for root calls.
    pub parent: Option<Record>,

    pub args: Record,

    /// Carries the transaction of this call to nested calls.
    pub context: Context,
}

impl ResolverRequest {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn db(&self) -> &Db {
        self.schema.db()
    }

    pub fn table(&self) -> &Table {
        self.schema.table_by_id(self.table)
    }

    pub(crate) fn table_id(&self) -> TableId {
        self.table
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn identity(&self) -> Option<&Value> {
        self.context.identity()
    }

    /// `true` unless resolving a relationship field or a nested write.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The transaction the call runs in.
    pub fn transaction(&self) -> Result<&Transaction> {
        self.transaction
            .as_ref()
            .ok_or_else(|| err!("resolver `{}` has no transaction", self.resolver.name))
    }
}

/// A callable resolver bound to its schema.
#[derive(Debug, Clone)]
pub struct FieldResolver {
    schema: Schema,
    table: TableId,
    site: Site,
}

impl FieldResolver {
    pub async fn call(&self, parent: Option<Record>, args: Record, cx: &Context) -> Result<Value> {
        self.schema
            .call(self.table, self.site.clone(), parent, args, cx)
            .await
    }
}

/// Resolvers keyed the way a GraphQL runtime looks them up.
#[derive(Debug, Clone, Default)]
pub struct ResolverMap {
    pub query: IndexMap<String, FieldResolver>,
    pub mutation: IndexMap<String, FieldResolver>,

    /// Object type name to relationship field name.
    pub types: IndexMap<String, IndexMap<String, FieldResolver>>,
}

impl Schema {
    /// Runs the root query `name`.
    pub async fn query(&self, name: &str, args: Record, cx: &Context) -> Result<Value> {
        let table = self
            .query_table(name)
            .ok_or_else(|| err!("unknown query `{name}`"))?;
        self.call(table, Site::Query(name.to_string()), None, args, cx)
            .await
    }

    /// Runs the root mutation `name`.
    pub async fn mutate(&self, name: &str, args: Record, cx: &Context) -> Result<Value> {
        let table = self
            .mutation_table(name)
            .ok_or_else(|| err!("unknown mutation `{name}`"))?;
        self.call(table, Site::Mutation(name.to_string()), None, args, cx)
            .await
    }

    /// Resolves the relationship field `field` of an object of `type_name`.
    pub async fn resolve_field(
        &self,
        type_name: &str,
        field: &str,
        parent: Record,
        cx: &Context,
    ) -> Result<Value> {
        let table = self
            .table_by_type(type_name)
            .ok_or_else(|| err!("unknown type `{type_name}`"))?
            .id;
        self.call(table, Site::Field(field.to_string()), Some(parent), Record::new(), cx)
            .await
    }

    /// Every operation of the schema as a callable resolver.
    pub fn resolvers(&self) -> ResolverMap {
        let mut map = ResolverMap::default();

        for table in self.tables() {
            let bind = |site| FieldResolver {
                schema: self.clone(),
                table: table.id,
                site,
            };

            for name in table.queries.keys() {
                map.query
                    .insert(name.clone(), bind(Site::Query(name.clone())));
            }

            for name in table.mutations.keys() {
                map.mutation
                    .insert(name.clone(), bind(Site::Mutation(name.clone())));
            }

            let fields: IndexMap<_, _> = table
                .columns
                .values()
                .filter(|column| column.is_relationship())
                .map(|column| (column.name.clone(), bind(Site::Field(column.name.clone()))))
                .collect();

            if !fields.is_empty() {
                map.types.insert(table.type_name.clone(), fields);
            }
        }

        map
    }

    fn resolver_at(&self, table: TableId, site: &Site) -> Result<&Resolver> {
        let table = self.table_by_id(table);

        let resolver = match site {
            Site::Query(name) => table.queries.get(name),
            Site::Mutation(name) => table.mutations.get(name),
            Site::Field(name) => table
                .columns
                .get(name)
                .and_then(|column| column.relationship.as_ref())
                .map(|relationship| &relationship.resolver),
        };

        resolver.ok_or_else(|| err!("`{}` has no resolver for {site:?}", table.type_name))
    }

    /// Runs one resolver: permission check for root calls, then the body
    /// inside the caller's transaction or a new one owned by this call.
    pub(crate) async fn call(
        &self,
        table: TableId,
        site: Site,
        parent: Option<Record>,
        args: Record,
        cx: &Context,
    ) -> Result<Value> {
        let resolver = self.resolver_at(table, &site)?.clone();
        let span = tracing::info_span!("resolver", name = %resolver.name, kind = %resolver.kind);

        let mut request = ResolverRequest {
            schema: self.clone(),
            table,
            resolver,
            transaction: None,
            parent,
            args,
            context: cx.clone(),
        };

        async move {
            tracing::debug!(root = request.is_root(), "invoking resolver");

            if request.is_root() {
                self.authorize(&request).await?;
            }

            if let Some(transaction) = cx.transaction() {
                request.transaction = Some(transaction.clone());
                return execute(&request).await;
            }

            let transaction = self.db().begin().await?;
            tracing::debug!("transaction started");

            request.transaction = Some(transaction.clone());
            request.context = cx.clone().with_transaction(transaction.clone());

            match execute(&request).await {
                Ok(value) => {
                    transaction.commit().await?;
                    tracing::debug!("transaction committed");
                    Ok(value)
                }
                Err(err) => {
                    match transaction.rollback().await {
                        Ok(()) => tracing::debug!(%err, "transaction rolled back"),
                        Err(rollback) => {
                            tracing::warn!(%err, %rollback, "failed to roll back transaction")
                        }
                    }
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn authorize(&self, request: &ResolverRequest) -> Result<()> {
        let Some(auth) = self.auth() else {
            return Ok(());
        };

        let resolver = request.resolver();
        let allowed = match auth.resolve(&request.table().key, &resolver.name, resolver.kind) {
            Lookup::Absent => true,
            Lookup::Deny => false,
            Lookup::Value(permission) => permission.check(request).await?,
        };

        if allowed {
            Ok(())
        } else {
            tracing::debug!("permission denied");
            Err(Error::authorization(&resolver.name))
        }
    }
}

async fn execute(request: &ResolverRequest) -> Result<Value> {
    let resolver = request.resolver();

    hook::run(&resolver.before, request, &Value::Record(request.args.clone())).await?;

    let value = match &resolver.body {
        Body::Builtin => engine::dispatch(request).await?,
        Body::Custom(handler) => handler.call(request).await?,
    };

    hook::run(&resolver.after, request, &value).await?;

    Ok(value)
}
