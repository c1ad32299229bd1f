mod reflect;

mod value;
pub(crate) use value::Value;

use rusqlite::Connection as RusqliteConnection;
use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};
use tablegraph_core::{
    async_trait, catalog,
    driver::{
        operation::Operation,
        Capability, Driver, Response,
    },
    stmt, Error, Result,
};
use tablegraph_sql as sql;
use url::Url;

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),

    /// All connections share one in-memory database.
    InMemory(Arc<Mutex<RusqliteConnection>>),
}

impl Sqlite {
    /// Create a new SQLite driver from a connection URL, either
    /// `sqlite::memory:` or `sqlite:<path>`.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver_operation_failed)?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_config(format!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        if url.path() == ":memory:" {
            Self::in_memory()
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Result<Self> {
        let connection =
            RusqliteConnection::open_in_memory().map_err(Error::driver_operation_failed)?;
        Ok(Self::InMemory(Arc::new(Mutex::new(Connection::configure(
            connection,
        )?))))
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }

    /// Runs a batch of SQL statements outside of any pooled connection.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory(shared) => Connection::shared(shared.clone()),
        };

        let result = connection
            .lock()?
            .execute_batch(sql)
            .map_err(Error::driver_operation_failed);
        result
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn connect(&self) -> Result<Box<dyn tablegraph_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory(shared) => Connection::shared(shared.clone()),
        };
        Ok(Box::new(connection))
    }

    fn max_connections(&self) -> Option<usize> {
        matches!(self, Self::InMemory(_)).then_some(1)
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: Arc<Mutex<RusqliteConnection>>,
}

impl Connection {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection =
            RusqliteConnection::open(path).map_err(Error::driver_operation_failed)?;
        Ok(Self::shared(Arc::new(Mutex::new(Self::configure(
            connection,
        )?))))
    }

    fn shared(connection: Arc<Mutex<RusqliteConnection>>) -> Self {
        Self { connection }
    }

    fn configure(connection: RusqliteConnection) -> Result<RusqliteConnection> {
        connection
            .execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(Error::driver_operation_failed)?;
        Ok(connection)
    }

    fn lock(&self) -> Result<MutexGuard<'_, RusqliteConnection>> {
        self.connection
            .lock()
            .map_err(|_| tablegraph_core::err!("sqlite connection mutex poisoned"))
    }

    fn reflect_sync(&self, filters: &catalog::Filters) -> Result<Vec<catalog::TableRow>> {
        let connection = self.lock()?;
        reflect::reflect(&connection, filters)
    }

    fn exec_sync(&self, op: Operation) -> Result<Response> {
        let connection = self.lock()?;
        let serializer = sql::Serializer::sqlite();

        let stmt = match op {
            Operation::Transaction(op) => {
                connection
                    .execute_batch(&serializer.serialize_transaction(op))
                    .map_err(Error::driver_operation_failed)?;
                return Ok(Response::count(0));
            }
            Operation::Query(stmt) => stmt,
        };

        let mut params = Vec::<stmt::Value>::new();
        let sql_str = serializer.serialize(&stmt, &mut params);

        let mut prepared = connection
            .prepare_cached(&sql_str)
            .map_err(Error::driver_operation_failed)?;

        let names: Vec<String> = prepared
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();
        let mut rows = prepared
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver_operation_failed)?;

        let mut ret = vec![];

        loop {
            match rows.next() {
                Ok(Some(row)) => {
                    let mut record = stmt::Record::with_capacity(names.len());

                    for (index, name) in names.iter().enumerate() {
                        record.insert(name.clone(), Value::from_sql(row, index)?.into_inner());
                    }

                    ret.push(record);
                }
                Ok(None) => break,
                Err(err) => return Err(Error::driver_operation_failed(err)),
            }
        }

        Ok(Response::rows(ret))
    }
}

#[async_trait]
impl tablegraph_core::driver::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        self.exec_sync(op)
    }

    async fn reflect(&mut self, filters: &catalog::Filters) -> Result<Vec<catalog::TableRow>> {
        self.reflect_sync(filters)
    }
}
