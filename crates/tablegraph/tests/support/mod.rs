#![allow(dead_code)]

use tablegraph::{Context, Db, Record, Schema, Value};
use tablegraph_driver_sqlite::Sqlite;

pub const BLOG: &str = "
    CREATE TABLE user (
        id INTEGER PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        name TEXT,
        active BOOLEAN
    );
    CREATE TABLE post (
        id INTEGER PRIMARY KEY,
        author_id INTEGER NOT NULL REFERENCES user (id),
        title TEXT NOT NULL
    );
    CREATE TABLE comment (
        id INTEGER PRIMARY KEY,
        post_id INTEGER NOT NULL REFERENCES post (id),
        body TEXT NOT NULL
    );
    CREATE TABLE audit_log (
        message TEXT
    );
";

/// An in-memory database initialized with `sql`.
pub async fn db(sql: &str) -> Db {
    let driver = Sqlite::in_memory().unwrap();
    driver.execute_batch(sql).unwrap();
    Db::new(driver).await.unwrap()
}

pub async fn blog() -> Schema {
    Schema::builder().build(&db(BLOG).await).await.unwrap()
}

pub fn args(json: serde_json::Value) -> Record {
    Value::from(json).into_record().unwrap()
}

pub fn record(value: Value) -> Record {
    value.into_record().unwrap()
}

pub fn rows(value: Value) -> Vec<Record> {
    value
        .into_list()
        .unwrap()
        .into_iter()
        .map(record)
        .collect()
}

pub async fn all(schema: &Schema, query: &str) -> Vec<Record> {
    rows(
        schema
            .query(query, Record::new(), &Context::new())
            .await
            .unwrap(),
    )
}
