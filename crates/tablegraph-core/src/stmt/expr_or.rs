use super::*;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExprOr {
    pub operands: Vec<Expr>,
}

impl From<ExprOr> for Expr {
    fn from(value: ExprOr) -> Self {
        Self::Or(value)
    }
}
