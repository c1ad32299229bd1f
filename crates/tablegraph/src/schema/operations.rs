use super::{Resolver, ResolverKind, Table, TypeRef};
use crate::Interceptors;

/// Registers the generated operations of `table`, each passed through the
/// matching interceptor. Tables without a primary key are read-only.
pub(super) fn generate(table: &mut Table, interceptors: &Interceptors) {
    let object = table.type_name.clone();
    let key = table.key.clone();
    let input = TypeRef::named(table.input_type_name()).required();

    let query = Resolver::new(&key, ResolverKind::Query, TypeRef::list_of(&object))
        .arg("where", TypeRef::named("JSON"));

    if let Some(query) = interceptors.query(query) {
        table.queries.insert(query.name.clone(), query);
    }

    if !table.has_primary_key() {
        return;
    }

    let primary_key = table.primary_key.clone();
    let key_args = |resolver: Resolver| {
        primary_key
            .iter()
            .fold(resolver, |resolver, column| {
                resolver.arg(column, TypeRef::named("ID").required())
            })
    };

    let mutations = [
        Resolver::new(&key, ResolverKind::Mutation, TypeRef::named(&object))
            .arg("data", input.clone()),
        Resolver::new(
            format!("insert_{}", key),
            ResolverKind::Insert,
            TypeRef::named(&object),
        )
        .arg("data", input.clone()),
        key_args(Resolver::new(
            format!("update_{}", key),
            ResolverKind::Update,
            TypeRef::named(&object),
        ))
        .arg("data", input),
        key_args(Resolver::new(
            format!("delete_{}", key),
            ResolverKind::Delete,
            TypeRef::named(&object),
        )),
    ];

    for mutation in mutations {
        if let Some(mutation) = interceptors.mutation(mutation) {
            table.mutations.insert(mutation.name.clone(), mutation);
        }
    }
}
