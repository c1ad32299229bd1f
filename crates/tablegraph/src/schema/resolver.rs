use super::TypeRef;
use crate::{hook::Hook, ResolverRequest, Result};

use std::{fmt, sync::Arc};
use tablegraph_core::{async_trait, stmt::Value};

/// A named, typed operation: a root query or mutation, or a relationship
/// field.
#[derive(Clone)]
pub struct Resolver {
    pub name: String,
    pub kind: ResolverKind,
    pub args: Vec<Arg>,
    pub ty: TypeRef,
    pub body: Body,

    /// Run in order before the body, with the arguments.
    pub before: Vec<Arc<dyn Hook>>,

    /// Run in order after the body, with its result.
    pub after: Vec<Arc<dyn Hook>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolverKind {
    /// List query
    Query,

    /// Upsert: update when the key matches a row, insert otherwise
    Mutation,

    Insert,
    Update,
    Delete,

    /// Foreign key accessor
    Relationship,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub name: String,
    pub ty: TypeRef,
}

/// What a resolver runs.
#[derive(Clone)]
pub enum Body {
    /// The generated behavior for the resolver's kind.
    Builtin,

    Custom(Arc<dyn Handler>),
}

/// A caller-supplied resolver body.
///
/// Implement this on a type when the body needs to hold `request` across an
/// `.await`. Closures are accepted too, with the limits noted on their impl.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn call(&self, request: &ResolverRequest) -> Result<Value>;
}

impl Resolver {
    pub(crate) fn new(name: impl Into<String>, kind: ResolverKind, ty: TypeRef) -> Resolver {
        Resolver {
            name: name.into(),
            kind,
            args: vec![],
            ty,
            body: Body::Builtin,
            before: vec![],
            after: vec![],
        }
    }

    pub(crate) fn arg(mut self, name: impl Into<String>, ty: TypeRef) -> Resolver {
        self.args.push(Arg {
            name: name.into(),
            ty,
        });
        self
    }

    /// Replaces the body with `handler`.
    pub fn with_handler(mut self, handler: impl Handler) -> Resolver {
        self.body = Body::Custom(Arc::new(handler));
        self
    }

    pub fn is_collection(&self) -> bool {
        self.ty.list
    }

    pub fn is_mutation(&self) -> bool {
        self.kind.is_mutation()
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("args", &self.args)
            .field("ty", &self.ty)
            .field("body", &self.body)
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .finish()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Builtin => f.write_str("Builtin"),
            Body::Custom(_) => f.write_str("Custom"),
        }
    }
}

impl ResolverKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolverKind::Query => "query",
            ResolverKind::Mutation => "mutation",
            ResolverKind::Insert => "insert",
            ResolverKind::Update => "update",
            ResolverKind::Delete => "delete",
            ResolverKind::Relationship => "relationship",
        }
    }

    /// `true` for the kinds registered under a table's mutations.
    pub fn is_mutation(self) -> bool {
        matches!(
            self,
            ResolverKind::Mutation
                | ResolverKind::Insert
                | ResolverKind::Update
                | ResolverKind::Delete
        )
    }
}

impl fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The future a closure returns cannot borrow the request, because `Fut` is
/// fixed before the request's lifetime is known. Copy what the body needs out
/// of the request first, then return an `async move` block:
///
/// ```ignore
/// resolver.with_handler(|request: &ResolverRequest| {
///     let count = request.args.len() as i64;
///     async move { Ok(Value::I64(count)) }
/// })
/// ```
#[async_trait]
impl<F, Fut> Handler for F
where
    F: Fn(&ResolverRequest) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<Value>> + Send,
{
    async fn call(&self, request: &ResolverRequest) -> Result<Value> {
        self(request).await
    }
}
