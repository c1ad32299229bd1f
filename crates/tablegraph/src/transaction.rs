use crate::{db::PoolConnection, Result};

use tablegraph_core::{
    driver::operation,
    stmt::{Record, Statement},
    Error,
};

use std::sync::Arc;
use tokio::sync::Mutex;

/// An active database transaction.
///
/// Clones share the same connection, so a nested resolver that is handed the
/// transaction of its caller writes inside the same unit of work.
///
/// If the last handle is dropped without calling [`commit`](Self::commit) or
/// [`rollback`](Self::rollback), the transaction is rolled back in a
/// background task.
#[derive(Debug, Clone)]
pub struct Transaction {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    /// Pinned connection. Taken when the transaction finishes.
    connection: Mutex<Option<PoolConnection>>,
}

impl Transaction {
    pub(crate) async fn begin(mut connection: PoolConnection) -> Result<Transaction> {
        connection
            .exec(operation::Transaction::Start.into())
            .await?;

        Ok(Transaction {
            inner: Arc::new(Inner {
                connection: Mutex::new(Some(connection)),
            }),
        })
    }

    /// Executes a statement, returning the rows it yields.
    pub async fn exec(&self, stmt: impl Into<Statement>) -> Result<Vec<Record>> {
        let stmt = stmt.into();
        tracing::trace!(?stmt, "exec");

        let mut connection = self.inner.connection.lock().await;
        let Some(connection) = connection.as_mut() else {
            return Err(finished());
        };

        connection.exec(stmt.into()).await?.into_rows()
    }

    /// Commit the transaction.
    ///
    /// If the database refuses the commit, the transaction is rolled back
    /// before the error is returned.
    pub async fn commit(&self) -> Result<()> {
        let Some(mut connection) = self.inner.connection.lock().await.take() else {
            return Err(finished());
        };

        if let Err(err) = connection
            .exec(operation::Transaction::Commit.into())
            .await
        {
            if let Err(rollback) = connection
                .exec(operation::Transaction::Rollback.into())
                .await
            {
                tracing::warn!(%rollback, "rollback after failed commit also failed");
            }
            return Err(err);
        }

        Ok(())
    }

    /// Roll back the transaction.
    pub async fn rollback(&self) -> Result<()> {
        let Some(mut connection) = self.inner.connection.lock().await.take() else {
            return Err(finished());
        };

        connection
            .exec(operation::Transaction::Rollback.into())
            .await?;
        Ok(())
    }

    /// Returns `true` once the transaction was committed or rolled back.
    pub async fn is_finished(&self) -> bool {
        self.inner.connection.lock().await.is_none()
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let Some(mut connection) = self.connection.get_mut().take() else {
            return;
        };

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("transaction dropped outside of a runtime; connection discarded");
            return;
        };

        handle.spawn(async move {
            if let Err(err) = connection
                .exec(operation::Transaction::Rollback.into())
                .await
            {
                tracing::warn!(%err, "rollback of dropped transaction failed");
            }
        });
    }
}

fn finished() -> Error {
    tablegraph_core::err!("transaction already finished")
}
