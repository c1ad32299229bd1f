//! Permission rules consulted before root resolver calls.

use crate::{
    rules::{Lookup, Rules, Slot},
    schema::ResolverKind,
    ResolverRequest, Result,
};

use indexmap::IndexMap;
use std::sync::Arc;
use tablegraph_core::async_trait;

/// Decides whether a root call may run.
#[async_trait]
pub trait Permission: Send + Sync + 'static {
    async fn check(&self, request: &ResolverRequest) -> Result<bool>;
}

#[async_trait]
impl<F> Permission for F
where
    F: Fn(&ResolverRequest) -> bool + Send + Sync + 'static,
{
    async fn check(&self, request: &ResolverRequest) -> Result<bool> {
        Ok(self(request))
    }
}

/// A permission rule table: global rules plus per-table rules keyed by
/// table key.
///
/// Slots are keyed by operation name, by kind (`mutation`, `insert`,
/// `update`, `delete`), by bucket (`queries`, `mutations`) or `default`.
/// A [`Slot::Pass`] allows the call.
#[derive(Clone, Default)]
pub struct AuthRules {
    global: Rules<Arc<dyn Permission>>,
    tables: IndexMap<String, Rules<Arc<dyn Permission>>>,
}

impl AuthRules {
    pub fn new() -> AuthRules {
        AuthRules::default()
    }

    pub fn global(mut self, rules: Rules<Arc<dyn Permission>>) -> Self {
        self.global = rules;
        self
    }

    pub fn table(mut self, key: impl Into<String>, rules: Rules<Arc<dyn Permission>>) -> Self {
        self.tables.insert(key.into(), rules);
        self
    }

    /// Finds the rule for an operation of `table`, most specific first:
    ///
    /// 1. table, operation name
    /// 2. table, kind (mutations only)
    /// 3. table, bucket
    /// 4. table, `default`
    /// 5. global kind (mutations only)
    /// 6. global bucket
    /// 7. global `default`
    pub fn resolve(&self, table: &str, name: &str, kind: ResolverKind) -> Lookup<&Arc<dyn Permission>> {
        let bucket = if kind.is_mutation() {
            "mutations"
        } else {
            "queries"
        };
        let kind = kind.is_mutation().then(|| kind.as_str());

        let table_rules = self.tables.get(table);

        let candidates = [
            (table_rules, Some(name)),
            (table_rules, kind),
            (table_rules, Some(bucket)),
            (table_rules, Some("default")),
            (Some(&self.global), kind),
            (Some(&self.global), Some(bucket)),
            (Some(&self.global), Some("default")),
        ];

        candidates
            .into_iter()
            .find_map(|(rules, key)| rules?.get(key?))
            .map(Lookup::from)
            .unwrap_or(Lookup::Absent)
    }
}

impl Rules<Arc<dyn Permission>> {
    /// Allows the call when `permission` passes.
    pub fn allow_if(self, key: impl Into<String>, permission: impl Permission) -> Self {
        self.apply(key, Arc::new(permission))
    }

    /// Always allows the call.
    pub fn allow(self, key: impl Into<String>) -> Self {
        self.slot(key, Slot::Pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Which slot answered, by the address of its permission.
    fn answer(rules: &AuthRules, table: &str, name: &str, kind: ResolverKind) -> Option<usize> {
        match rules.resolve(table, name, kind) {
            Lookup::Value(p) => Some(Arc::as_ptr(p) as *const () as usize),
            Lookup::Deny => Some(0),
            Lookup::Absent => None,
        }
    }

    fn marker() -> Arc<dyn Permission> {
        Arc::new(|_: &ResolverRequest| true)
    }

    #[test]
    fn most_specific_rule_wins() {
        let by_name = marker();
        let table_default = marker();
        let global_default = marker();

        let rules = AuthRules::new()
            .global(Rules::new().apply("default", global_default.clone()))
            .table(
                "user",
                Rules::new()
                    .apply("update_user", by_name.clone())
                    .apply("default", table_default.clone()),
            );

        let addr = |p: &Arc<dyn Permission>| Some(Arc::as_ptr(p) as *const () as usize);

        assert_eq!(
            answer(&rules, "user", "update_user", ResolverKind::Update),
            addr(&by_name)
        );
        assert_eq!(
            answer(&rules, "user", "user", ResolverKind::Query),
            addr(&table_default)
        );
        assert_eq!(
            answer(&rules, "post", "post", ResolverKind::Query),
            addr(&global_default)
        );
    }

    #[test]
    fn kinds_only_apply_to_mutations() {
        let rules = AuthRules::new().global(Rules::new().deny("delete").deny("queries"));

        assert!(rules.resolve("user", "delete_user", ResolverKind::Delete).is_deny());
        assert!(rules.resolve("user", "user", ResolverKind::Mutation).is_absent());
        assert!(rules.resolve("user", "user", ResolverKind::Query).is_deny());
    }

    #[test]
    fn table_bucket_precedes_global_kind() {
        let rules = AuthRules::new()
            .global(Rules::new().deny("insert"))
            .table("user", Rules::new().allow("mutations"));

        assert!(rules.resolve("user", "insert_user", ResolverKind::Insert).is_absent());
        assert!(rules.resolve("post", "insert_post", ResolverKind::Insert).is_deny());
    }

    #[test]
    fn empty_rules_resolve_absent() {
        assert!(AuthRules::new()
            .resolve("user", "user", ResolverKind::Query)
            .is_absent());
        assert_eq!(answer(&AuthRules::new(), "t", "t", ResolverKind::Delete), None);
    }
}
