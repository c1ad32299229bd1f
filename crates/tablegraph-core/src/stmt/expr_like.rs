use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprLike {
    pub column: String,
    pub pattern: String,
    pub case_insensitive: bool,
}

impl Expr {
    pub fn like(column: impl Into<String>, pattern: impl Into<String>) -> Self {
        ExprLike {
            column: column.into(),
            pattern: pattern.into(),
            case_insensitive: false,
        }
        .into()
    }

    pub fn ilike(column: impl Into<String>, pattern: impl Into<String>) -> Self {
        ExprLike {
            column: column.into(),
            pattern: pattern.into(),
            case_insensitive: true,
        }
        .into()
    }
}

impl From<ExprLike> for Expr {
    fn from(value: ExprLike) -> Self {
        Self::Like(value)
    }
}
