//! Side-effect hooks run around resolver bodies and table writes.

use crate::{ResolverRequest, Result};

use std::{fmt, sync::Arc};
use tablegraph_core::{async_trait, stmt::Value};

/// A hook observes a value at a fixed point of a resolver call.
///
/// Returning an error aborts the call; when the call owns its transaction,
/// every write made so far is rolled back.
#[async_trait]
pub trait Hook: Send + Sync + 'static {
    async fn call(&self, request: &ResolverRequest, value: &Value) -> Result<()>;
}

#[async_trait]
impl<F> Hook for F
where
    F: Fn(&ResolverRequest, &Value) -> Result<()> + Send + Sync + 'static,
{
    async fn call(&self, request: &ResolverRequest, value: &Value) -> Result<()> {
        self(request, value)
    }
}

/// Points in the write path of a table where hooks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Receives the data about to be inserted.
    BeforeInsert,

    /// Receives the inserted row.
    AfterInsert,

    /// Receives the row as it is before the update.
    BeforeUpdate,

    /// Receives the updated row.
    AfterUpdate,

    /// Receives the row about to be deleted.
    BeforeDelete,

    /// Receives the deleted row.
    AfterDelete,
}

/// Ordered hook lists for every [`Event`] of one table.
#[derive(Clone, Default)]
pub struct Events {
    before_insert: Vec<Arc<dyn Hook>>,
    after_insert: Vec<Arc<dyn Hook>>,
    before_update: Vec<Arc<dyn Hook>>,
    after_update: Vec<Arc<dyn Hook>>,
    before_delete: Vec<Arc<dyn Hook>>,
    after_delete: Vec<Arc<dyn Hook>>,
}

impl Events {
    /// Appends `hook` to the list for `event`.
    pub fn on(&mut self, event: Event, hook: impl Hook) -> &mut Self {
        self.list_mut(event).push(Arc::new(hook));
        self
    }

    pub fn hooks(&self, event: Event) -> &[Arc<dyn Hook>] {
        match event {
            Event::BeforeInsert => &self.before_insert,
            Event::AfterInsert => &self.after_insert,
            Event::BeforeUpdate => &self.before_update,
            Event::AfterUpdate => &self.after_update,
            Event::BeforeDelete => &self.before_delete,
            Event::AfterDelete => &self.after_delete,
        }
    }

    fn list_mut(&mut self, event: Event) -> &mut Vec<Arc<dyn Hook>> {
        match event {
            Event::BeforeInsert => &mut self.before_insert,
            Event::AfterInsert => &mut self.after_insert,
            Event::BeforeUpdate => &mut self.before_update,
            Event::AfterUpdate => &mut self.after_update,
            Event::BeforeDelete => &mut self.before_delete,
            Event::AfterDelete => &mut self.after_delete,
        }
    }

    pub(crate) async fn emit(
        &self,
        event: Event,
        request: &ResolverRequest,
        value: &Value,
    ) -> Result<()> {
        run(self.hooks(event), request, value).await
    }
}

/// Awaits each hook in order, stopping at the first failure.
pub(crate) async fn run(
    hooks: &[Arc<dyn Hook>],
    request: &ResolverRequest,
    value: &Value,
) -> Result<()> {
    for hook in hooks {
        hook.call(request, value).await?;
    }
    Ok(())
}

impl fmt::Debug for Events {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Events")
            .field("before_insert", &self.before_insert.len())
            .field("after_insert", &self.after_insert.len())
            .field("before_update", &self.before_update.len())
            .field("after_update", &self.after_update.len())
            .field("before_delete", &self.before_delete.len())
            .field("after_delete", &self.after_delete.len())
            .finish()
    }
}
