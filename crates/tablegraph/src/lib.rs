//! Synthesizes a GraphQL schema, and the resolvers that serve it, from the
//! catalog of a relational database.
//!
//! [`Builder::build`] reflects the catalog through a [`Db`], turns every
//! table into an object type with a list query and, when the table has a
//! primary key, upsert/insert/update/delete mutations. Foreign keys become
//! relationship fields on both sides. The resulting [`Schema`] renders the
//! type document ([`Schema::sdl`]) and executes operations
//! ([`Schema::query`], [`Schema::mutate`], [`Schema::resolvers`]).

pub mod auth;
pub use auth::{AuthRules, Permission};

mod config;
pub use config::Options;

pub mod db;
pub use db::Db;

mod engine;

mod error;
pub use error::ErrorBody;

pub mod hook;
pub use hook::{Event, Events, Hook};

pub mod intercept;
pub use intercept::{Intercept, Interceptors};

mod pipeline;
pub use pipeline::{Context, FieldResolver, ResolverMap, ResolverRequest};

pub mod rules;
pub use rules::{Lookup, Rules, Slot};

pub mod schema;
pub use schema::{Builder, Schema};

mod transaction;
pub use transaction::Transaction;

pub use tablegraph_core::{
    catalog::Filters,
    stmt::{Record, Value},
    Error, Result,
};
