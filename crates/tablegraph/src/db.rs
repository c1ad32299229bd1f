mod connect;
pub use connect::Connect;

mod pool;
pub(crate) use pool::{Pool, PoolConnection};

use crate::{Result, Transaction};

use tablegraph_core::{
    catalog::{Filters, TableRow},
    driver::{Capability, Driver},
};

use std::sync::Arc;

/// A handle to the database a schema is served from.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Db {
    pool: Arc<Pool>,
}

impl Db {
    /// Creates a handle over an already configured driver.
    pub async fn new(driver: impl Driver) -> Result<Db> {
        Ok(Db {
            pool: Arc::new(Pool::open(driver).await?),
        })
    }

    /// Creates a handle from a connection URL such as `sqlite::memory:` or
    /// `postgresql://user@localhost/app`.
    pub async fn connect(url: &str) -> Result<Db> {
        Db::new(Connect::new(url)?).await
    }

    pub fn capability(&self) -> &'static Capability {
        self.pool.capability()
    }

    /// Starts a transaction on a dedicated pooled connection.
    pub async fn begin(&self) -> Result<Transaction> {
        Transaction::begin(self.pool.acquire().await?).await
    }

    /// Reads the table catalog, applying `filters`.
    pub async fn reflect(&self, filters: &Filters) -> Result<Vec<TableRow>> {
        let mut connection = self.pool.acquire().await?;
        connection.reflect(filters).await
    }
}
