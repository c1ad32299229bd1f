use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tablegraph_core::{
    driver::{operation::Transaction, Operation},
    stmt::{self, Expr, Record, TableRef, Value},
    Connection, Driver,
};
use tablegraph_driver_sqlite::Sqlite;

fn items() -> Arc<TableRef> {
    let mut columns = IndexMap::new();
    columns.insert("id".to_string(), "integer".to_string());
    columns.insert("name".to_string(), "text".to_string());
    columns.insert("data".to_string(), "blob".to_string());

    Arc::new(TableRef {
        schema: "main".to_string(),
        name: "items".to_string(),
        columns,
        primary_key: vec!["id".to_string()],
    })
}

async fn setup() -> (Sqlite, Box<dyn Connection>) {
    let driver = Sqlite::in_memory().unwrap();
    driver
        .execute_batch("CREATE TABLE items (id INTEGER PRIMARY KEY, name TEXT, data BLOB);")
        .unwrap();
    let connection = driver.connect().await.unwrap();
    (driver, connection)
}

async fn select_all(connection: &mut Box<dyn Connection>) -> Vec<Record> {
    connection
        .exec(Operation::Query(stmt::Select::new(items(), None).into()))
        .await
        .unwrap()
        .into_rows()
        .unwrap()
}

#[tokio::test]
async fn insert_returns_the_stored_row() {
    let (_driver, mut connection) = setup().await;

    let mut values = Record::new();
    values.insert("name".to_string(), Value::from("x"));
    values.insert("data".to_string(), Value::Bytes(vec![1, 2]));

    let rows = connection
        .exec(Operation::Query(
            stmt::Insert {
                table: items(),
                values,
            }
            .into(),
        ))
        .await
        .unwrap()
        .into_rows()
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], Value::I64(1));
    assert_eq!(rows[0]["name"], Value::from("x"));
    assert_eq!(rows[0]["data"], Value::Bytes(vec![1, 2]));
}

#[tokio::test]
async fn update_and_delete_return_affected_rows() {
    let (driver, mut connection) = setup().await;
    driver
        .execute_batch("INSERT INTO items (id, name) VALUES (1, 'a'), (2, 'b');")
        .unwrap();

    let mut assignments = Record::new();
    assignments.insert("name".to_string(), Value::from("z"));

    let updated = connection
        .exec(Operation::Query(
            stmt::Update {
                table: items(),
                assignments,
                filter: Some(Expr::eq("id", 2)),
            }
            .into(),
        ))
        .await
        .unwrap()
        .into_rows()
        .unwrap();
    assert_eq!(updated[0]["name"], Value::from("z"));

    let deleted = connection
        .exec(Operation::Query(
            stmt::Delete {
                table: items(),
                filter: Some(Expr::eq("id", 9)),
            }
            .into(),
        ))
        .await
        .unwrap()
        .into_rows()
        .unwrap();
    assert!(deleted.is_empty());

    assert_eq!(select_all(&mut connection).await.len(), 2);
}

#[tokio::test]
async fn rollback_discards_writes() {
    let (driver, mut connection) = setup().await;

    connection
        .exec(Transaction::Start.into())
        .await
        .unwrap();
    driver
        .execute_batch("INSERT INTO items (id, name) VALUES (1, 'a');")
        .unwrap();
    connection
        .exec(Transaction::Rollback.into())
        .await
        .unwrap();

    assert!(select_all(&mut connection).await.is_empty());
}
