#[derive(Debug)]
pub struct Capability {
    /// Backend name, used in log output.
    pub name: &'static str,

    /// Schema that unqualified tables live in. Tables in this schema are
    /// exposed without a schema prefix.
    pub default_schema: &'static str,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        name: "sqlite",
        default_schema: "main",
    };

    /// PostgreSQL capabilities.
    pub const POSTGRESQL: Self = Self {
        name: "postgresql",
        default_schema: "public",
    };
}
