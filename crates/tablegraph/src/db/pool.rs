use crate::Result;

use deadpool::managed;
use std::ops::{Deref, DerefMut};
use tablegraph_core::{
    driver::{Capability, Driver},
    Connection, Error,
};

/// Connections handed to transactions and catalog reads.
#[derive(Debug)]
pub(crate) struct Pool {
    connections: managed::Pool<Opener>,
    capability: &'static Capability,
}

impl Pool {
    /// Builds the pool and checks out one connection, so a database that
    /// cannot be reached fails here rather than on the first resolver call.
    pub(crate) async fn open(driver: impl Driver) -> Result<Pool> {
        let capability = driver.capability();
        let limit = driver.max_connections();

        let mut builder = managed::Pool::builder(Opener {
            driver: Box::new(driver),
        })
        .runtime(deadpool::Runtime::Tokio1);

        // In-memory SQLite shares one connection between every checkout.
        if let Some(limit) = limit {
            builder = builder.max_size(limit);
        }

        let pool = Pool {
            connections: builder.build().map_err(Error::connection_pool)?,
            capability,
        };
        drop(pool.acquire().await?);

        tracing::debug!(driver = capability.name, ?limit, "connection pool opened");
        Ok(pool)
    }

    pub(crate) async fn acquire(&self) -> Result<PoolConnection> {
        let object = self
            .connections
            .get()
            .await
            .map_err(Error::connection_pool)?;
        Ok(PoolConnection(object))
    }

    pub(crate) fn capability(&self) -> &'static Capability {
        self.capability
    }
}

/// Opens driver connections on demand.
#[derive(Debug)]
struct Opener {
    driver: Box<dyn Driver>,
}

impl managed::Manager for Opener {
    type Type = Box<dyn Connection>;
    type Error = Error;

    async fn create(&self) -> Result<Box<dyn Connection>> {
        tracing::trace!("opening database connection");
        self.driver.connect().await
    }

    // Transactions always finish or roll back before their connection
    // returns, so a returned connection is reusable as is.
    async fn recycle(
        &self,
        _connection: &mut Box<dyn Connection>,
        _metrics: &managed::Metrics,
    ) -> managed::RecycleResult<Error> {
        Ok(())
    }
}

/// A checked-out connection; returned to the pool on drop.
#[derive(Debug)]
pub(crate) struct PoolConnection(managed::Object<Opener>);

impl Deref for PoolConnection {
    type Target = dyn Connection;

    fn deref(&self) -> &(dyn Connection + 'static) {
        &**self.0
    }
}

impl DerefMut for PoolConnection {
    fn deref_mut(&mut self) -> &mut (dyn Connection + 'static) {
        &mut **self.0
    }
}
