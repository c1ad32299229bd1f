mod support;

use pretty_assertions::assert_eq;
use support::*;
use tablegraph::{schema::TypeRef, Filters, Options, Schema};

#[tokio::test]
async fn blog_schema_document() {
    let schema = blog().await;

    assert_eq!(
        schema.sdl(),
        r#"scalar Date
scalar JSON

type AuditLog {
  message: String
}

input InputAuditLog {
  message: String
}

type Comment {
  id: ID
  body: String
  post: Post
}

input InputComment {
  id: ID
  body: String
  post: InputPost
}

type Post {
  id: ID
  title: String
  comment_post: [Comment]
  author: User
}

input InputPost {
  id: ID
  title: String
  comment_post: [InputComment]
  author: InputUser
}

type User {
  id: ID
  email: String
  name: String
  active: Boolean
  post_author: [Post]
}

input InputUser {
  id: ID
  email: String
  name: String
  active: Boolean
  post_author: [InputPost]
}

type Query {
  audit_log(where: JSON): [AuditLog]
  comment(where: JSON): [Comment]
  post(where: JSON): [Post]
  user(where: JSON): [User]
}

type Mutation {
  comment(data: InputComment!): Comment
  insert_comment(data: InputComment!): Comment
  update_comment(id: ID!, data: InputComment!): Comment
  delete_comment(id: ID!): Comment
  post(data: InputPost!): Post
  insert_post(data: InputPost!): Post
  update_post(id: ID!, data: InputPost!): Post
  delete_post(id: ID!): Post
  user(data: InputUser!): User
  insert_user(data: InputUser!): User
  update_user(id: ID!, data: InputUser!): User
  delete_user(id: ID!): User
}
"#
    );
}

#[tokio::test]
async fn synthesis_is_deterministic() {
    let db = db(BLOG).await;

    let first = Schema::builder().build(&db).await.unwrap();
    let second = Schema::builder().build(&db).await.unwrap();

    assert_eq!(first.sdl(), second.sdl());
    assert_eq!(
        first.query_names().collect::<Vec<_>>(),
        second.query_names().collect::<Vec<_>>()
    );
    assert_eq!(
        first.mutation_names().collect::<Vec<_>>(),
        second.mutation_names().collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn relationships_link_both_sides() {
    let schema = blog().await;

    let post = schema.table("post").unwrap();
    let author = post.column("author").unwrap();
    let relationship = author.relationship.as_ref().unwrap();

    assert_eq!(author.ty, TypeRef::named("User"));
    assert!(!relationship.many);
    assert_eq!(relationship.pairs, [("author_id".to_string(), "id".to_string())]);
    assert_eq!(relationship.mutation.as_deref(), Some("user"));
    assert!(!post.column("author_id").unwrap().export);

    let user = schema.table("user").unwrap();
    let posts = user.column("post_author").unwrap();
    let relationship = posts.relationship.as_ref().unwrap();

    assert_eq!(posts.ty, TypeRef::list_of("Post"));
    assert!(relationship.many);
    assert_eq!(relationship.pairs, [("id".to_string(), "author_id".to_string())]);
    assert_eq!(relationship.mutation.as_deref(), Some("post"));
}

#[tokio::test]
async fn resolver_map_covers_roots_and_relationships() {
    let map = blog().await.resolvers();

    assert_eq!(
        map.query.keys().collect::<Vec<_>>(),
        ["audit_log", "comment", "post", "user"]
    );
    assert_eq!(map.mutation.len(), 12);
    assert!(!map.mutation.contains_key("audit_log"));
    assert_eq!(
        map.types["Post"].keys().collect::<Vec<_>>(),
        ["comment_post", "author"]
    );
    assert_eq!(map.types["User"].keys().collect::<Vec<_>>(), ["post_author"]);
    assert!(!map.types.contains_key("AuditLog"));
}

#[tokio::test]
async fn tables_without_primary_key_are_read_only() {
    let schema = blog().await;
    let audit_log = schema.table("audit_log").unwrap();

    assert_eq!(audit_log.queries.len(), 1);
    assert!(audit_log.mutations.is_empty());
}

#[tokio::test]
async fn unmappable_type_aborts() {
    let db = db("CREATE TABLE place (id INTEGER PRIMARY KEY, shape GEOMETRY);").await;

    let err = Schema::builder().build(&db).await.unwrap_err();

    assert!(err.is_unmappable_type());
    assert_eq!(err.code(), "UNMAPPABLE_TYPE");
    assert!(err.to_string().contains("`geometry`"));
}

#[tokio::test]
async fn custom_types_are_declared() {
    let db = db("CREATE TABLE place (id INTEGER PRIMARY KEY, shape GEOMETRY, note TEXT);").await;

    let options = Options::from_toml(
        r#"
        [custom_types]
        geometry = "Shape"
        "#,
    )
    .unwrap();
    let schema = Schema::builder().options(options).build(&db).await.unwrap();

    assert!(schema.sdl().starts_with("scalar Date\nscalar JSON\nscalar Shape\n\n"));
    assert!(schema.sdl().contains("  shape: Shape\n"));
}

#[tokio::test]
async fn filters_remove_tables_and_dangling_relationships() {
    let db = db(BLOG).await;

    let options = Options::from_toml(
        r#"
        [filters]
        ignore_tables = ["user", "audit_log"]
        ignore_columns = ["comment.body"]
        "#,
    )
    .unwrap();
    let schema = Schema::builder().options(options).build(&db).await.unwrap();

    assert!(schema.table("user").is_none());
    assert!(schema.table("comment").unwrap().column("body").is_none());

    // The foreign key to `user` has nothing to link to.
    let post = schema.table("post").unwrap();
    assert!(post.column("author").is_none());
    assert!(post.column("author_id").unwrap().export);
    assert!(schema
        .sdl()
        .contains("type Post {\n  id: ID\n  author_id: Int\n  title: String\n  comment_post: [Comment]\n}"));
}

#[tokio::test]
async fn broken_custom_filter_is_a_reflection_error() {
    let db = db(BLOG).await;

    let err = Schema::builder()
        .filters(Filters {
            table_custom_filter: Some("no_such_column = 1".to_string()),
            ..Default::default()
        })
        .build(&db)
        .await
        .unwrap_err();

    assert!(err.is_reflection());
    assert_eq!(err.code(), "REFLECTION_FAILED");
}
