mod support;

use pretty_assertions::assert_eq;
use serde_json::json;
use support::*;
use tablegraph::{Context, Record, Schema, Value};

async fn mutate(schema: &Schema, name: &str, input: serde_json::Value) -> tablegraph::Result<Record> {
    schema
        .mutate(name, args(input), &Context::new())
        .await
        .map(record)
}

#[tokio::test]
async fn upsert_inserts_then_updates() {
    let schema = blog().await;

    let row = mutate(&schema, "user", json!({"data": {"id": 5, "email": "x@example.com", "name": "x"}}))
        .await
        .unwrap();
    assert_eq!(row["id"], Value::I64(5));
    assert_eq!(row["name"], Value::from("x"));

    let row = mutate(&schema, "user", json!({"data": {"id": 5, "email": "x@example.com", "name": "y"}}))
        .await
        .unwrap();
    assert_eq!(row["id"], Value::I64(5));
    assert_eq!(row["name"], Value::from("y"));

    let users = all(&schema, "user").await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["name"], Value::from("y"));
}

#[tokio::test]
async fn insert_lets_the_database_assign_keys() {
    let schema = blog().await;

    let first = mutate(&schema, "insert_user", json!({"data": {"email": "a@example.com", "active": true}}))
        .await
        .unwrap();
    let second = mutate(&schema, "insert_user", json!({"data": {"email": "b@example.com"}}))
        .await
        .unwrap();

    assert_eq!(first["id"], Value::I64(1));
    assert_eq!(first["active"], Value::Bool(true));
    assert_eq!(second["id"], Value::I64(2));
    assert_eq!(second["active"], Value::Null);
}

#[tokio::test]
async fn explicit_update_requires_an_existing_row() {
    let schema = blog().await;

    let err = mutate(&schema, "update_user", json!({"id": 7, "data": {"name": "z"}}))
        .await
        .unwrap_err();
    assert!(err.is_no_record());
    assert_eq!(err.code(), "NO_RECORD");
    assert!(all(&schema, "user").await.is_empty());

    mutate(&schema, "insert_user", json!({"data": {"id": 7, "email": "z@example.com"}}))
        .await
        .unwrap();

    let row = mutate(&schema, "update_user", json!({"id": "7", "data": {"name": "z"}}))
        .await
        .unwrap();
    assert_eq!(row["name"], Value::from("z"));
    assert_eq!(row["email"], Value::from("z@example.com"));
}

#[tokio::test]
async fn update_without_key_argument_is_missing_key() {
    let schema = blog().await;

    let err = mutate(&schema, "update_user", json!({"data": {"name": "z"}}))
        .await
        .unwrap_err();

    assert!(err.is_missing_key());
    assert_eq!(err.invalid_args(), ["id"]);
}

#[tokio::test]
async fn single_relationship_is_written_first() {
    let schema = blog().await;

    let post = mutate(
        &schema,
        "post",
        json!({"data": {"title": "hello", "author": {"email": "a@example.com", "name": "a"}}}),
    )
    .await
    .unwrap();

    let users = all(&schema, "user").await;
    assert_eq!(users.len(), 1);
    assert_eq!(post["author_id"], users[0]["id"]);
    assert_eq!(post["title"], Value::from("hello"));
}

#[tokio::test]
async fn nested_write_matches_by_unique_key() {
    let schema = blog().await;

    mutate(&schema, "user", json!({"data": {"id": 10, "email": "c@example.com", "name": "c"}}))
        .await
        .unwrap();

    let post = mutate(
        &schema,
        "post",
        json!({"data": {"title": "t", "author": {"email": "c@example.com", "name": "renamed"}}}),
    )
    .await
    .unwrap();

    assert_eq!(post["author_id"], Value::I64(10));

    let users = all(&schema, "user").await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["name"], Value::from("renamed"));
}

#[tokio::test]
async fn root_write_does_not_match_by_unique_key() {
    let schema = blog().await;

    mutate(&schema, "user", json!({"data": {"email": "c@example.com"}}))
        .await
        .unwrap();

    // Without a parent the unique key is not consulted, so the insert
    // collides with the existing email.
    let err = mutate(&schema, "user", json!({"data": {"email": "c@example.com"}}))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "DATABASE_ERROR");
    assert_eq!(all(&schema, "user").await.len(), 1);
}

#[tokio::test]
async fn collection_is_written_after_the_parent() {
    let schema = blog().await;

    let user = mutate(
        &schema,
        "user",
        json!({"data": {
            "email": "d@example.com",
            "post_author": [{"title": "p1"}, {"title": "p2"}],
        }}),
    )
    .await
    .unwrap();

    let posts = rows(user["post_author"].clone());
    assert_eq!(posts.len(), 2);
    for (post, title) in posts.iter().zip(["p1", "p2"]) {
        assert_eq!(post["author_id"], user["id"]);
        assert_eq!(post["title"], Value::from(title));
    }

    assert_eq!(all(&schema, "post").await.len(), 2);
}

#[tokio::test]
async fn nested_writes_chain_through_several_tables() {
    let schema = blog().await;

    let comment = mutate(
        &schema,
        "comment",
        json!({"data": {
            "body": "first",
            "post": {"title": "t", "author": {"email": "e@example.com"}},
        }}),
    )
    .await
    .unwrap();

    let posts = all(&schema, "post").await;
    let users = all(&schema, "user").await;

    assert_eq!(comment["post_id"], posts[0]["id"]);
    assert_eq!(posts[0]["author_id"], users[0]["id"]);
}

#[tokio::test]
async fn failed_nested_write_rolls_back_everything() {
    let schema = blog().await;

    let err = mutate(
        &schema,
        "user",
        json!({"data": {
            "email": "f@example.com",
            "post_author": [{"title": "ok"}, {"title": null}],
        }}),
    )
    .await
    .unwrap_err();

    assert!(err.is_driver_operation_failed());
    assert!(all(&schema, "user").await.is_empty());
    assert!(all(&schema, "post").await.is_empty());
}

#[tokio::test]
async fn setting_a_relationship_to_null_clears_the_key() {
    let db = db("
        CREATE TABLE team (id INTEGER PRIMARY KEY, name TEXT);
        CREATE TABLE player (id INTEGER PRIMARY KEY, team_id INTEGER REFERENCES team (id));
    ")
    .await;
    let schema = Schema::builder().build(&db).await.unwrap();

    let player = mutate(&schema, "player", json!({"data": {"id": 1, "team": {"name": "a"}}}))
        .await
        .unwrap();
    assert_eq!(player["team_id"], Value::I64(1));

    let player = mutate(&schema, "player", json!({"data": {"id": 1, "team": null}}))
        .await
        .unwrap();
    assert_eq!(player["team_id"], Value::Null);
}

#[tokio::test]
async fn conflicting_unique_keys_are_ambiguous() {
    let db = db("
        CREATE TABLE member (
            id INTEGER PRIMARY KEY,
            email TEXT UNIQUE,
            handle TEXT UNIQUE
        );
        CREATE TABLE badge (
            id INTEGER PRIMARY KEY,
            member_id INTEGER REFERENCES member (id)
        );
        INSERT INTO member (id, email, handle) VALUES (1, 'a@example.com', 'a'), (2, 'b@example.com', 'b');
    ")
    .await;
    let schema = Schema::builder().build(&db).await.unwrap();

    let err = mutate(
        &schema,
        "badge",
        json!({"data": {"member": {"email": "a@example.com", "handle": "b"}}}),
    )
    .await
    .unwrap_err();

    assert!(err.is_ambiguous_match());
    assert!(all(&schema, "badge").await.is_empty());

    // Agreeing keys resolve to the one row.
    let badge = mutate(
        &schema,
        "badge",
        json!({"data": {"member": {"email": "b@example.com", "handle": "b"}}}),
    )
    .await
    .unwrap();
    assert_eq!(badge["member_id"], Value::I64(2));
}

#[tokio::test]
async fn partly_supplied_unique_key_is_missing_key() {
    let db = db("
        CREATE TABLE team (
            id INTEGER PRIMARY KEY,
            org TEXT,
            code TEXT,
            name TEXT,
            UNIQUE (org, code)
        );
        CREATE TABLE player (
            id INTEGER PRIMARY KEY,
            nick TEXT,
            team_id INTEGER REFERENCES team (id)
        );
        INSERT INTO team (id, org, code, name) VALUES (1, 'a', 'x', 'first');
    ")
    .await;
    let schema = Schema::builder().build(&db).await.unwrap();

    let err = mutate(
        &schema,
        "player",
        json!({"data": {"nick": "p", "team": {"org": "a", "name": "m"}}}),
    )
    .await
    .unwrap_err();

    assert!(err.is_missing_key());
    assert_eq!(err.code(), "MISSING_KEY");
    assert_eq!(err.invalid_args(), ["code"]);
    assert_eq!(all(&schema, "team").await.len(), 1);
    assert!(all(&schema, "player").await.is_empty());

    // With no unique column at all the nested write inserts.
    let player = mutate(
        &schema,
        "player",
        json!({"data": {"nick": "q", "team": {"name": "n"}}}),
    )
    .await
    .unwrap();
    assert_eq!(player["team_id"], Value::I64(2));

    // The full key matches the stored team.
    let player = mutate(
        &schema,
        "player",
        json!({"data": {"nick": "r", "team": {"org": "a", "code": "x"}}}),
    )
    .await
    .unwrap();
    assert_eq!(player["team_id"], Value::I64(1));
    assert_eq!(all(&schema, "team").await.len(), 2);
}

#[tokio::test]
async fn partial_composite_key_is_missing_key() {
    let db = db("
        CREATE TABLE tag (
            post_id INTEGER NOT NULL,
            label TEXT NOT NULL,
            color TEXT,
            PRIMARY KEY (post_id, label)
        );
    ")
    .await;
    let schema = Schema::builder().build(&db).await.unwrap();

    let err = mutate(&schema, "tag", json!({"data": {"post_id": 1, "color": "red"}}))
        .await
        .unwrap_err();

    assert!(err.is_missing_key());
    assert_eq!(err.invalid_args(), ["label"]);

    let tag = mutate(&schema, "tag", json!({"data": {"post_id": 1, "label": "x", "color": "red"}}))
        .await
        .unwrap();
    assert_eq!(tag["color"], Value::from("red"));

    let tag = mutate(&schema, "update_tag", json!({"post_id": 1, "label": "x", "data": {"color": "blue"}}))
        .await
        .unwrap();
    assert_eq!(tag["color"], Value::from("blue"));
}

#[tokio::test]
async fn unknown_fields_are_rejected() {
    let schema = blog().await;

    let err = mutate(&schema, "user", json!({"data": {"email": "x", "nickname": "x"}}))
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert_eq!(err.invalid_args(), ["data"]);

    let err = mutate(&schema, "user", json!({"data": {"email": "x", "post_author": {"title": "x"}}}))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("expects a list"));
}

#[tokio::test]
async fn delete_returns_the_removed_row() {
    let schema = blog().await;

    mutate(&schema, "user", json!({"data": {"id": 1, "email": "a@example.com"}}))
        .await
        .unwrap();

    let removed = mutate(&schema, "delete_user", json!({"id": 1})).await.unwrap();
    assert_eq!(removed["email"], Value::from("a@example.com"));
    assert!(all(&schema, "user").await.is_empty());
}

#[tokio::test]
async fn delete_without_match_is_no_record() {
    let schema = blog().await;

    mutate(&schema, "user", json!({"data": {"id": 1, "email": "a@example.com"}}))
        .await
        .unwrap();

    let err = mutate(&schema, "delete_user", json!({"id": 999}))
        .await
        .unwrap_err();

    assert!(err.is_no_record());
    assert_eq!(all(&schema, "user").await.len(), 1);
}

#[tokio::test]
async fn caller_transaction_spans_several_root_calls() {
    let schema = blog().await;

    let transaction = schema.db().begin().await.unwrap();
    let cx = Context::new().with_transaction(transaction.clone());

    schema
        .mutate("user", args(json!({"data": {"id": 1, "email": "a@example.com"}})), &cx)
        .await
        .unwrap();
    schema
        .mutate("user", args(json!({"data": {"id": 2, "email": "b@example.com"}})), &cx)
        .await
        .unwrap();

    let seen = rows(schema.query("user", Record::new(), &cx).await.unwrap());
    assert_eq!(seen.len(), 2);

    transaction.rollback().await.unwrap();
    assert!(all(&schema, "user").await.is_empty());
}
