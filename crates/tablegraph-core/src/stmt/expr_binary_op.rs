use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprBinaryOp {
    pub column: String,
    pub op: BinaryOp,
    pub value: Value,
}

impl Expr {
    pub fn binary_op(column: impl Into<String>, op: BinaryOp, value: impl Into<Value>) -> Self {
        ExprBinaryOp {
            column: column.into(),
            op,
            value: value.into(),
        }
        .into()
    }
}

impl From<ExprBinaryOp> for Expr {
    fn from(value: ExprBinaryOp) -> Self {
        Self::BinaryOp(value)
    }
}
