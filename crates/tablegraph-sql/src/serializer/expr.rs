use super::{Comma, Delimited, Formatter, Ident, Param, Params, ToSql};

use tablegraph_core::stmt::{self, Expr};

/// A column reference.
pub(super) struct Column<'a>(pub(super) &'a str);

impl ToSql for Column<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(self.0));
    }
}

/// Wraps compound operands in parentheses.
struct Operand<'a>(&'a Expr);

impl ToSql for Operand<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self.0 {
            Expr::And(e) if e.operands.len() > 1 => fmt!(f, "(" self.0 ")"),
            Expr::Or(e) if e.operands.len() > 1 => fmt!(f, "(" self.0 ")"),
            expr => expr.to_sql(f),
        }
    }
}

impl ToSql for &Expr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Expr::And(expr) if expr.operands.is_empty() => fmt!(f, "1 = 1"),
            Expr::And(expr) => {
                fmt!(f, Delimited(expr.operands.iter().map(Operand), " AND "));
            }
            Expr::Or(expr) if expr.operands.is_empty() => fmt!(f, "1 = 0"),
            Expr::Or(expr) => {
                fmt!(f, Delimited(expr.operands.iter().map(Operand), " OR "));
            }
            Expr::Not(expr) => {
                let inner: &Expr = &expr.expr;
                fmt!(f, "NOT (" inner ")");
            }
            Expr::BinaryOp(expr) => {
                let op = expr.op.to_string();
                let param = value(f, &expr.column, &expr.value);
                fmt!(f, Column(&expr.column) " " op.as_str() " " param);
            }
            Expr::InList(expr) if expr.list.is_empty() => {
                let constant = if expr.negated { "1 = 1" } else { "1 = 0" };
                fmt!(f, constant);
            }
            Expr::InList(expr) => {
                let keyword = if expr.negated { " NOT IN (" } else { " IN (" };
                let params = expr.list.iter().map(|v| value(f, &expr.column, v));
                let params: Vec<_> = params.collect();
                fmt!(f, Column(&expr.column) keyword Comma(params) ")");
            }
            Expr::IsNull(expr) => {
                let keyword = if expr.negated {
                    " IS NOT NULL"
                } else {
                    " IS NULL"
                };
                fmt!(f, Column(&expr.column) keyword);
            }
            Expr::Like(expr) => like(f, expr),
        }
    }
}

fn like<P: Params>(f: &mut Formatter<'_, P>, expr: &stmt::ExprLike) {
    let pattern = stmt::Value::String(expr.pattern.clone());

    if f.serializer.flavor.is_postgresql() {
        let op = if expr.case_insensitive {
            "::text ILIKE "
        } else {
            "::text LIKE "
        };
        fmt!(f, Column(&expr.column) op Param { value: &pattern, ty: None });
    } else if expr.case_insensitive {
        fmt!(f, "lower(" Column(&expr.column) ") LIKE lower(" Param { value: &pattern, ty: None } ")");
    } else {
        fmt!(f, Column(&expr.column) " LIKE " Param { value: &pattern, ty: None });
    }
}

/// Builds a parameter typed after `column`.
pub(super) fn value<'a, P>(
    f: &Formatter<'a, P>,
    column: &str,
    value: &'a stmt::Value,
) -> Param<'a> {
    Param {
        value,
        ty: f.table.column_ty(column),
    }
}
