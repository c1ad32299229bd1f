use super::*;

/// A filter expression over the columns of one table.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// AND a set of expressions. An empty set is always true.
    And(ExprAnd),

    /// Compare a column with a value
    BinaryOp(ExprBinaryOp),

    /// Membership of a column value in a list
    InList(ExprInList),

    /// Null check on a column
    IsNull(ExprIsNull),

    /// Pattern match on a column
    Like(ExprLike),

    /// Negate an expression
    Not(ExprNot),

    /// OR a set of expressions. An empty set is always false.
    Or(ExprOr),
}

impl Expr {
    /// Equality on every `(column, value)` pair. Null values become `IS NULL`.
    pub fn key<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Value)>) -> Expr {
        let operands: Vec<_> = pairs
            .into_iter()
            .map(|(column, value)| Expr::eq(column, value))
            .collect();

        Expr::and_from_vec(operands)
    }

    /// Column equality. Comparing against null produces an `IS NULL` check.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Expr {
        let value = value.into();
        if value.is_null() {
            Expr::is_null(column)
        } else {
            Expr::binary_op(column, BinaryOp::Eq, value)
        }
    }

    /// Column inequality. Comparing against null produces an `IS NOT NULL`
    /// check.
    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Expr {
        let value = value.into();
        if value.is_null() {
            Expr::is_not_null(column)
        } else {
            Expr::binary_op(column, BinaryOp::Ne, value)
        }
    }

    /// Collapses single-element conjunctions.
    pub fn and_from_vec(mut operands: Vec<Expr>) -> Expr {
        if operands.len() == 1 {
            operands.remove(0)
        } else {
            ExprAnd { operands }.into()
        }
    }

    pub fn or_from_vec(mut operands: Vec<Expr>) -> Expr {
        if operands.len() == 1 {
            operands.remove(0)
        } else {
            ExprOr { operands }.into()
        }
    }

    pub fn is_and(&self) -> bool {
        matches!(self, Self::And(_))
    }

    /// Iterates the names of all columns this expression references.
    pub fn columns(&self) -> Vec<&str> {
        let mut out = vec![];
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::And(e) => e.operands.iter().for_each(|e| e.collect_columns(out)),
            Expr::Or(e) => e.operands.iter().for_each(|e| e.collect_columns(out)),
            Expr::Not(e) => e.expr.collect_columns(out),
            Expr::BinaryOp(e) => out.push(&e.column),
            Expr::InList(e) => out.push(&e.column),
            Expr::IsNull(e) => out.push(&e.column),
            Expr::Like(e) => out.push(&e.column),
        }
    }
}
