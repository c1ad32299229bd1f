use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprInList {
    pub column: String,
    pub list: Vec<Value>,
    pub negated: bool,
}

impl Expr {
    pub fn in_list(column: impl Into<String>, list: Vec<Value>) -> Self {
        ExprInList {
            column: column.into(),
            list,
            negated: false,
        }
        .into()
    }

    pub fn not_in_list(column: impl Into<String>, list: Vec<Value>) -> Self {
        ExprInList {
            column: column.into(),
            list,
            negated: true,
        }
        .into()
    }
}

impl From<ExprInList> for Expr {
    fn from(value: ExprInList) -> Self {
        Self::InList(value)
    }
}
