//! Caller-supplied rewrites of synthesized tables and operations.
//!
//! ```
//! use tablegraph::{Intercept, Interceptors, Rules};
//!
//! let interceptors = Interceptors::new()
//!     .tables(Rules::new().deny("audit_log"))
//!     .mutations(Rules::new().deny("delete"));
//! # let _ = interceptors;
//! ```

use crate::{
    rules::{Lookup, Rules},
    schema::{Resolver, Table},
};

use std::sync::Arc;

/// The verdict of an interceptor.
pub enum Intercept<T> {
    /// Keep the object, including any changes made through the `&mut`
    /// reference.
    Keep,

    /// Discard the object.
    Suppress,

    /// Use this object instead.
    Replace(T),
}

pub type Interceptor<T> = Arc<dyn Fn(&mut T) -> Intercept<T> + Send + Sync>;

/// Rule tables consulted while the schema is assembled.
///
/// Lookup keys, in order:
///
/// * tables: `[<table key>, "default"]`
/// * queries: `[<name>, "queries", "default"]`
/// * mutations: `[<name>, <kind>, "mutations", "default"]`, where kind is one
///   of `mutation`, `insert`, `update` or `delete`
#[derive(Clone, Default)]
pub struct Interceptors {
    tables: Option<Rules<Interceptor<Table>>>,
    queries: Option<Rules<Interceptor<Resolver>>>,
    mutations: Option<Rules<Interceptor<Resolver>>>,
}

impl Interceptors {
    pub fn new() -> Interceptors {
        Interceptors::default()
    }

    pub fn tables(mut self, rules: Rules<Interceptor<Table>>) -> Self {
        self.tables = Some(rules);
        self
    }

    pub fn queries(mut self, rules: Rules<Interceptor<Resolver>>) -> Self {
        self.queries = Some(rules);
        self
    }

    pub fn mutations(mut self, rules: Rules<Interceptor<Resolver>>) -> Self {
        self.mutations = Some(rules);
        self
    }

    pub(crate) fn table(&self, table: Table) -> Option<Table> {
        let key = table.key.clone();
        apply(self.tables.as_ref(), &[&key, "default"], table)
    }

    pub(crate) fn query(&self, resolver: Resolver) -> Option<Resolver> {
        let name = resolver.name.clone();
        apply(self.queries.as_ref(), &[&name, "queries", "default"], resolver)
    }

    pub(crate) fn mutation(&self, resolver: Resolver) -> Option<Resolver> {
        let name = resolver.name.clone();
        let kind = resolver.kind.as_str();
        apply(
            self.mutations.as_ref(),
            &[&name, kind, "mutations", "default"],
            resolver,
        )
    }
}

impl<T> Rules<Interceptor<T>> {
    /// Attaches `f` under `key`.
    pub fn transform(
        self,
        key: impl Into<String>,
        f: impl Fn(&mut T) -> Intercept<T> + Send + Sync + 'static,
    ) -> Self {
        self.apply(key, Arc::new(f))
    }
}

/// Runs the first rule matching `keys` against `object`. `None` means the
/// object was suppressed.
pub fn apply<T>(rules: Option<&Rules<Interceptor<T>>>, keys: &[&str], mut object: T) -> Option<T> {
    let Some(rules) = rules else {
        return Some(object);
    };

    match rules.lookup(keys) {
        Lookup::Absent => Some(object),
        Lookup::Deny => None,
        Lookup::Value(transform) => match transform(&mut object) {
            Intercept::Keep => Some(object),
            Intercept::Suppress => None,
            Intercept::Replace(replacement) => Some(replacement),
        },
    }
}
