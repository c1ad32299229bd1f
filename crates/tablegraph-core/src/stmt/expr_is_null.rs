use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprIsNull {
    pub column: String,
    pub negated: bool,
}

impl Expr {
    pub fn is_null(column: impl Into<String>) -> Self {
        ExprIsNull {
            column: column.into(),
            negated: false,
        }
        .into()
    }

    pub fn is_not_null(column: impl Into<String>) -> Self {
        ExprIsNull {
            column: column.into(),
            negated: true,
        }
        .into()
    }
}

impl From<ExprIsNull> for Expr {
    fn from(value: ExprIsNull) -> Self {
        Self::IsNull(value)
    }
}
