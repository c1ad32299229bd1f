use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tablegraph_core::{
    driver::operation::Transaction,
    stmt::{self, Expr, Record, Statement, TableRef, Value},
};
use tablegraph_sql::{Serializer, TypedValue};

fn users(schema: &str) -> Arc<TableRef> {
    let mut columns = IndexMap::new();
    columns.insert("id".to_string(), "integer".to_string());
    columns.insert("name".to_string(), "text".to_string());

    Arc::new(TableRef {
        schema: schema.to_string(),
        name: "users".to_string(),
        columns,
        primary_key: vec!["id".to_string()],
    })
}

fn record(fields: &[(&str, Value)]) -> Record {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn sqlite(stmt: impl Into<Statement>) -> (String, Vec<Value>) {
    let mut params = Vec::<Value>::new();
    let sql = Serializer::sqlite().serialize(&stmt.into(), &mut params);
    (sql, params)
}

fn postgresql(stmt: impl Into<Statement>) -> (String, Vec<TypedValue>) {
    let mut params = Vec::<TypedValue>::new();
    let sql = Serializer::postgresql().serialize(&stmt.into(), &mut params);
    (sql, params)
}

#[test]
fn select_without_filter() {
    let (sql, params) = sqlite(stmt::Select::new(users("main"), None));

    assert_eq!(
        sql,
        r#"SELECT "id", "name" FROM "main"."users" ORDER BY "id";"#
    );
    assert!(params.is_empty());
}

#[test]
fn select_with_compound_filter() {
    let filter = Expr::and_from_vec(vec![
        Expr::or_from_vec(vec![Expr::eq("id", 1), Expr::eq("id", 2)]),
        Expr::like("name", "a%"),
        Expr::not(Expr::is_null("name")),
    ]);
    let (sql, params) = sqlite(stmt::Select::new(users("main"), Some(filter)));

    assert_eq!(
        sql,
        r#"SELECT "id", "name" FROM "main"."users" WHERE ("id" = ?1 OR "id" = ?2) AND "name" LIKE ?3 AND NOT ("name" IS NULL) ORDER BY "id";"#
    );
    assert_eq!(params, vec![Value::I64(1), Value::I64(2), Value::from("a%")]);
}

#[test]
fn empty_in_list_matches_nothing() {
    let filter = Expr::in_list("id", vec![]);
    let (sql, _) = sqlite(stmt::Select::new(users("main"), Some(filter)));

    assert_eq!(
        sql,
        r#"SELECT "id", "name" FROM "main"."users" WHERE 1 = 0 ORDER BY "id";"#
    );
}

#[test]
fn insert_returns_row() {
    let (sql, params) = sqlite(stmt::Insert {
        table: users("main"),
        values: record(&[("name", Value::from("x"))]),
    });

    assert_eq!(
        sql,
        r#"INSERT INTO "main"."users" ("name") VALUES (?1) RETURNING "id", "name";"#
    );
    assert_eq!(params, vec![Value::from("x")]);
}

#[test]
fn insert_without_values() {
    let (sql, _) = sqlite(stmt::Insert {
        table: users("main"),
        values: Record::new(),
    });

    assert_eq!(
        sql,
        r#"INSERT INTO "main"."users" DEFAULT VALUES RETURNING "id", "name";"#
    );
}

#[test]
fn update_numbers_assignments_before_filter() {
    let (sql, params) = sqlite(stmt::Update {
        table: users("main"),
        assignments: record(&[("name", Value::from("y"))]),
        filter: Some(Expr::eq("id", 5)),
    });

    assert_eq!(
        sql,
        r#"UPDATE "main"."users" SET "name" = ?1 WHERE "id" = ?2 RETURNING "id", "name";"#
    );
    assert_eq!(params, vec![Value::from("y"), Value::I64(5)]);
}

#[test]
fn delete_returns_removed_rows() {
    let (sql, _) = sqlite(stmt::Delete {
        table: users("main"),
        filter: Some(Expr::eq("id", 5)),
    });

    assert_eq!(
        sql,
        r#"DELETE FROM "main"."users" WHERE "id" = ?1 RETURNING "id", "name";"#
    );
}

#[test]
fn postgresql_casts_parameters_to_column_types() {
    let (sql, params) = postgresql(stmt::Update {
        table: users("public"),
        assignments: record(&[("name", Value::from("y"))]),
        filter: Some(Expr::eq("id", 5)),
    });

    assert_eq!(
        sql,
        r#"UPDATE "public"."users" AS "_row" SET "name" = $1::text::text WHERE "id" = $2::text::integer RETURNING row_to_json("_row");"#
    );
    assert_eq!(
        params,
        vec![
            TypedValue {
                value: Value::from("y"),
                ty: Some("text".to_string()),
            },
            TypedValue {
                value: Value::I64(5),
                ty: Some("integer".to_string()),
            },
        ]
    );
}

#[test]
fn postgresql_select_and_ilike() {
    let (sql, _) = postgresql(stmt::Select::new(
        users("public"),
        Some(Expr::ilike("name", "%x%")),
    ));

    assert_eq!(
        sql,
        r#"SELECT row_to_json("_row") FROM "public"."users" AS "_row" WHERE "name"::text ILIKE $1::text ORDER BY "id";"#
    );
}

#[test]
fn quoted_identifiers_escape_quotes() {
    let mut columns = IndexMap::new();
    columns.insert(r#"we"ird"#.to_string(), "text".to_string());

    let table = Arc::new(TableRef {
        schema: "main".to_string(),
        name: "t".to_string(),
        columns,
        primary_key: vec![],
    });

    let (sql, _) = sqlite(stmt::Select::new(table, None));
    assert_eq!(sql, r#"SELECT "we""ird" FROM "main"."t";"#);
}

#[test]
fn transaction_ops() {
    let serializer = Serializer::sqlite();
    assert_eq!(serializer.serialize_transaction(Transaction::Start), "BEGIN");
    assert_eq!(serializer.serialize_transaction(Transaction::Commit), "COMMIT");
    assert_eq!(
        serializer.serialize_transaction(Transaction::Rollback),
        "ROLLBACK"
    );
}
