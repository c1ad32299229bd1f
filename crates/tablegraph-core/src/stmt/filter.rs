//! Parsing of the `where` argument accepted by list queries.
//!
//! The argument is a JSON object. Plain `{column: value}` entries compare for
//! equality, `{column: {_op: value}}` entries apply an operator, and `_and`,
//! `_or` and `_not` combine nested objects. Entries of one object are AND-ed.

use super::{BinaryOp, Expr, Value};
use crate::{Error, Result};

const ARG: &str = "where";

/// Parses a `where` argument into a filter expression.
///
/// Returns `None` when the argument is null or an empty object. Every column
/// name is checked against `is_column`.
pub fn parse(input: &Value, is_column: impl Fn(&str) -> bool) -> Result<Option<Expr>> {
    match input {
        Value::Null => Ok(None),
        Value::Record(_) => {
            let mut operands = vec![];
            parse_object(input, &is_column, &mut operands)?;

            if operands.is_empty() {
                Ok(None)
            } else {
                Ok(Some(Expr::and_from_vec(operands)))
            }
        }
        _ => Err(invalid("expected an object")),
    }
}

fn parse_object(
    input: &Value,
    is_column: &dyn Fn(&str) -> bool,
    out: &mut Vec<Expr>,
) -> Result<()> {
    let Some(fields) = input.as_record() else {
        return Err(invalid("expected an object"));
    };

    for (key, value) in fields {
        match key.as_str() {
            "_and" => out.push(Expr::and_from_vec(parse_nested_list(key, value, is_column)?)),
            "_or" => out.push(Expr::or_from_vec(parse_nested_list(key, value, is_column)?)),
            "_not" => {
                let mut operands = vec![];
                parse_object(value, is_column, &mut operands)?;
                if !operands.is_empty() {
                    out.push(Expr::not(Expr::and_from_vec(operands)));
                }
            }
            column if is_column(column) => parse_column(column, value, out)?,
            other => return Err(invalid(format!("unknown column `{other}`"))),
        }
    }

    Ok(())
}

fn parse_nested_list(
    key: &str,
    value: &Value,
    is_column: &dyn Fn(&str) -> bool,
) -> Result<Vec<Expr>> {
    let Some(items) = value.as_list() else {
        return Err(invalid(format!("`{key}` expects a list of objects")));
    };

    items
        .iter()
        .map(|item| {
            let mut operands = vec![];
            parse_object(item, is_column, &mut operands)?;
            Ok(Expr::and_from_vec(operands))
        })
        .collect()
}

fn parse_column(column: &str, value: &Value, out: &mut Vec<Expr>) -> Result<()> {
    let operators = match value {
        Value::Record(fields) if fields.keys().all(|key| key.starts_with('_')) => fields,
        Value::Record(_) => {
            return Err(invalid(format!(
                "operators on `{column}` must start with `_`"
            )))
        }
        Value::List(_) => {
            return Err(invalid(format!(
                "use `_in` to compare `{column}` against a list"
            )))
        }
        value => {
            out.push(Expr::eq(column, value.clone()));
            return Ok(());
        }
    };

    for (op, operand) in operators {
        let expr = match op.as_str() {
            "_eq" => Expr::eq(column, operand.clone()),
            "_neq" => Expr::ne(column, operand.clone()),
            "_gt" => compare(column, BinaryOp::Gt, operand)?,
            "_gte" => compare(column, BinaryOp::Ge, operand)?,
            "_lt" => compare(column, BinaryOp::Lt, operand)?,
            "_lte" => compare(column, BinaryOp::Le, operand)?,
            "_like" => Expr::like(column, pattern(column, op, operand)?),
            "_ilike" => Expr::ilike(column, pattern(column, op, operand)?),
            "_in" => Expr::in_list(column, list(column, op, operand)?),
            "_nin" => Expr::not_in_list(column, list(column, op, operand)?),
            "_is_null" => match operand {
                Value::Bool(true) => Expr::is_null(column),
                Value::Bool(false) => Expr::is_not_null(column),
                _ => return Err(invalid(format!("`{column}._is_null` expects a boolean"))),
            },
            other => return Err(invalid(format!("unknown operator `{other}` on `{column}`"))),
        };

        out.push(expr);
    }

    Ok(())
}

fn compare(column: &str, op: BinaryOp, operand: &Value) -> Result<Expr> {
    match operand {
        Value::Null | Value::List(_) | Value::Record(_) => Err(invalid(format!(
            "`{column}` can only be compared with a scalar value"
        ))),
        operand => Ok(Expr::binary_op(column, op, operand.clone())),
    }
}

fn pattern(column: &str, op: &str, operand: &Value) -> Result<String> {
    match operand.as_str() {
        Some(pattern) => Ok(pattern.to_string()),
        None => Err(invalid(format!("`{column}.{op}` expects a string"))),
    }
}

fn list(column: &str, op: &str, operand: &Value) -> Result<Vec<Value>> {
    match operand.as_list() {
        Some(items) => Ok(items.to_vec()),
        None => Err(invalid(format!("`{column}.{op}` expects a list"))),
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::invalid_argument(ARG, message)
}
