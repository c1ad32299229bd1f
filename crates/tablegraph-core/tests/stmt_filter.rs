use pretty_assertions::assert_eq;
use serde_json::json;
use tablegraph_core::stmt::{filter, BinaryOp, Expr, Value};

fn parse(input: serde_json::Value) -> tablegraph_core::Result<Option<Expr>> {
    filter::parse(&Value::from(input), |column| {
        matches!(column, "id" | "name" | "age")
    })
}

#[test]
fn null_and_empty_have_no_filter() {
    assert_eq!(parse(json!(null)).unwrap(), None);
    assert_eq!(parse(json!({})).unwrap(), None);
}

#[test]
fn plain_values_compare_for_equality() {
    let expr = parse(json!({"name": "x", "age": null})).unwrap().unwrap();

    assert_eq!(
        expr,
        Expr::and_from_vec(vec![Expr::eq("name", "x"), Expr::is_null("age")])
    );
}

#[test]
fn operators() {
    let expr = parse(json!({
        "age": {"_gte": 18, "_lt": 65},
        "name": {"_ilike": "a%", "_nin": ["bob"]},
        "id": {"_is_null": false},
    }))
    .unwrap()
    .unwrap();

    assert_eq!(
        expr,
        Expr::and_from_vec(vec![
            Expr::binary_op("age", BinaryOp::Ge, 18),
            Expr::binary_op("age", BinaryOp::Lt, 65),
            Expr::ilike("name", "a%"),
            Expr::not_in_list("name", vec![Value::from("bob")]),
            Expr::is_not_null("id"),
        ])
    );
}

#[test]
fn logical_combinators() {
    let expr = parse(json!({
        "_or": [{"id": 1}, {"id": 2}],
        "_not": {"name": "x"},
    }))
    .unwrap()
    .unwrap();

    assert_eq!(
        expr,
        Expr::and_from_vec(vec![
            Expr::or_from_vec(vec![Expr::eq("id", 1), Expr::eq("id", 2)]),
            Expr::not(Expr::eq("name", "x")),
        ])
    );
}

#[test]
fn empty_not_is_ignored() {
    assert_eq!(parse(json!({"_not": {}})).unwrap(), None);
    assert_eq!(
        parse(json!({"id": 1, "_not": {}})).unwrap(),
        Some(Expr::eq("id", 1))
    );
}

#[test]
fn single_entry_is_not_wrapped() {
    assert_eq!(parse(json!({"id": 7})).unwrap(), Some(Expr::eq("id", 7)));
}

#[test]
fn unknown_column_names_the_where_argument() {
    let err = parse(json!({"nope": 1})).unwrap_err();

    assert!(err.is_invalid_argument());
    assert_eq!(err.invalid_args(), vec!["where"]);
    assert_eq!(err.code(), "BAD_USER_INPUT");
}

#[test]
fn unknown_operator_is_rejected() {
    let err = parse(json!({"id": {"_between": [1, 2]}})).unwrap_err();
    assert!(err.to_string().contains("unknown operator `_between`"));
}

#[test]
fn malformed_operands_are_rejected() {
    assert!(parse(json!({"id": {"_in": 1}})).is_err());
    assert!(parse(json!({"name": {"_like": 1}})).is_err());
    assert!(parse(json!({"id": {"_is_null": "yes"}})).is_err());
    assert!(parse(json!({"_and": {"id": 1}})).is_err());
    assert!(parse(json!([1, 2])).is_err());
}
