use super::{expr::value, Comma, Formatter, Ident, Params, Period, ToSql, ROW_ALIAS};

use tablegraph_core::stmt::{self, Statement};

impl ToSql for &Statement {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Statement::Select(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::Select {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "SELECT " Projection " FROM " TableName(&self.table) Filter(self.filter.as_ref()));

        if !self.order_by.is_empty() {
            fmt!(f, " ORDER BY " Comma(self.order_by.iter().map(Ident)));
        }
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "INSERT INTO " TableName(&self.table));

        if self.values.is_empty() {
            fmt!(f, " DEFAULT VALUES");
        } else {
            let params: Vec<_> = self
                .values
                .iter()
                .map(|(column, v)| value(f, column, v))
                .collect();

            fmt!(f, " (" Comma(self.values.keys().map(Ident)) ") VALUES (" Comma(params) ")");
        }

        fmt!(f, Returning);
    }
}

impl ToSql for &stmt::Update {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "UPDATE " TableName(&self.table) " SET ");

        if self.assignments.is_empty() {
            // Keep the statement valid so it still returns the matched rows.
            if let Some(column) = self.table.columns.keys().next() {
                fmt!(f, Ident(column) " = " Ident(column));
            }
        } else {
            let mut s = "";
            for (column, v) in &self.assignments {
                let param = value(f, column, v);
                fmt!(f, s Ident(column) " = " param);
                s = ", ";
            }
        }

        fmt!(f, Filter(self.filter.as_ref()) Returning);
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "DELETE FROM " TableName(&self.table) Filter(self.filter.as_ref()) Returning);
    }
}

/// Schema-qualified table name, aliased for PostgreSQL.
struct TableName<'a>(&'a stmt::TableRef);

impl ToSql for TableName<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Period([Ident(&self.0.schema), Ident(&self.0.name)]));

        if f.serializer.flavor.is_postgresql() {
            fmt!(f, " AS " Ident(ROW_ALIAS));
        }
    }
}

struct Filter<'a>(Option<&'a stmt::Expr>);

impl ToSql for Filter<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if let Some(expr) = self.0 {
            fmt!(f, " WHERE " expr);
        }
    }
}

/// The columns a statement yields.
struct Projection;

impl ToSql for Projection {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if f.serializer.flavor.is_postgresql() {
            fmt!(f, "row_to_json(" Ident(ROW_ALIAS) ")");
        } else {
            let table = f.table;
            fmt!(f, Comma(table.columns.keys().map(Ident)));
        }
    }
}

struct Returning;

impl ToSql for Returning {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, " RETURNING " Projection);
    }
}
