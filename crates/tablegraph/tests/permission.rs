mod support;

use pretty_assertions::assert_eq;
use serde_json::json;
use support::*;
use tablegraph::{AuthRules, Context, ResolverRequest, Rules, Schema, Value};

async fn guarded(auth: AuthRules) -> Schema {
    Schema::builder()
        .auth(auth)
        .build(&db(BLOG).await)
        .await
        .unwrap()
}

fn is_admin(request: &ResolverRequest) -> bool {
    request.identity() == Some(&Value::from("admin"))
}

#[tokio::test]
async fn denied_call_is_forbidden_and_runs_nothing() {
    let schema = guarded(AuthRules::new().global(Rules::new().deny("mutations"))).await;

    let err = schema
        .mutate("insert_user", args(json!({"data": {"email": "a@example.com"}})), &Context::new())
        .await
        .unwrap_err();

    assert!(err.is_authorization());
    assert_eq!(err.code(), "FORBIDDEN");
    assert!(all(&schema, "user").await.is_empty());
}

#[tokio::test]
async fn operation_rule_overrides_the_default() {
    let schema = guarded(
        AuthRules::new()
            .global(Rules::new().deny("default"))
            .table("user", Rules::new().allow("user")),
    )
    .await;
    let cx = Context::new();

    assert!(schema.query("user", args(json!({})), &cx).await.is_ok());

    let err = schema.query("post", args(json!({})), &cx).await.unwrap_err();
    assert!(err.is_authorization());

    // The list query and the upsert share the name `user`.
    assert!(schema
        .mutate("user", args(json!({"data": {"email": "a@example.com"}})), &cx)
        .await
        .is_ok());

    let err = schema
        .mutate("insert_user", args(json!({"data": {"email": "b@example.com"}})), &cx)
        .await
        .unwrap_err();
    assert!(err.is_authorization());
}

#[tokio::test]
async fn kind_rule_applies_to_every_table() {
    let schema = guarded(AuthRules::new().global(Rules::new().deny("delete"))).await;
    let cx = Context::new();

    schema
        .mutate("user", args(json!({"data": {"id": 1, "email": "a@example.com"}})), &cx)
        .await
        .unwrap();

    let err = schema
        .mutate("delete_user", args(json!({"id": 1})), &cx)
        .await
        .unwrap_err();
    assert!(err.is_authorization());
    assert_eq!(all(&schema, "user").await.len(), 1);
}

#[tokio::test]
async fn permission_sees_the_identity() {
    let schema = guarded(
        AuthRules::new().global(
            Rules::new()
                .allow("queries")
                .allow_if("mutations", is_admin),
        ),
    )
    .await;

    let input = || args(json!({"data": {"id": 1, "email": "a@example.com"}}));

    let err = schema
        .mutate("user", input(), &Context::new().with_identity("guest"))
        .await
        .unwrap_err();
    assert!(err.is_authorization());

    let err = schema.mutate("user", input(), &Context::new()).await.unwrap_err();
    assert!(err.is_authorization());

    let row = schema
        .mutate("user", input(), &Context::new().with_identity("admin"))
        .await
        .unwrap();
    assert_eq!(record(row)["id"], Value::I64(1));

    // Queries pass without an identity.
    assert_eq!(all(&schema, "user").await.len(), 1);
}

#[tokio::test]
async fn nested_calls_skip_permission_checks() {
    // Writes to `user` are denied at the root but allowed through `post`.
    let schema = guarded(
        AuthRules::new().table("user", Rules::new().deny("mutations").deny("queries")),
    )
    .await;
    let cx = Context::new();

    let post = schema
        .mutate(
            "post",
            args(json!({"data": {"title": "t", "author": {"email": "a@example.com"}}})),
            &cx,
        )
        .await
        .unwrap();

    let err = schema
        .mutate("user", args(json!({"data": {"email": "b@example.com"}})), &cx)
        .await
        .unwrap_err();
    assert!(err.is_authorization());

    // Relationship fields resolve with a parent, so they are not checked
    // either.
    let author = schema
        .resolve_field("Post", "author", record(post), &cx)
        .await
        .unwrap();
    assert_eq!(record(author)["email"], Value::from("a@example.com"));
}

#[tokio::test]
async fn async_permission_can_fail() {
    struct Lookup;

    #[tablegraph_core::async_trait]
    impl tablegraph::Permission for Lookup {
        async fn check(&self, request: &ResolverRequest) -> tablegraph::Result<bool> {
            match request.identity() {
                Some(_) => Ok(true),
                None => Err(tablegraph_core::err!("identity service unavailable")),
            }
        }
    }

    let schema = guarded(AuthRules::new().global(Rules::new().allow_if("default", Lookup))).await;

    let err = schema
        .query("user", args(json!({})), &Context::new())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INTERNAL");

    assert!(schema
        .query("user", args(json!({})), &Context::new().with_identity(1))
        .await
        .is_ok());
}
