mod capability;
pub use capability::Capability;

mod response;
pub use response::Response;

pub mod operation;
pub use operation::Operation;

use crate::{async_trait, catalog};

use std::fmt::Debug;

/// A database backend that can open connections.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Describes the driver's capability.
    fn capability(&self) -> &'static Capability;

    /// Opens a new connection to the database.
    async fn connect(&self) -> crate::Result<Box<dyn Connection>>;

    /// Maximum number of connections the pool may open. `None` leaves the
    /// decision to the pool.
    fn max_connections(&self) -> Option<usize> {
        None
    }
}

/// One open connection. All statements of a transaction run on the same
/// connection.
#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Executes a statement or a transaction lifecycle operation.
    async fn exec(&mut self, op: Operation) -> crate::Result<Response>;

    /// Reads the catalog, keeping only what `filters` allows.
    ///
    /// Returned tables are ordered by schema, then name.
    async fn reflect(&mut self, filters: &catalog::Filters) -> crate::Result<Vec<catalog::TableRow>>;
}
