/// Backend feature flags consulted while compiling statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    /// UPDATE may filter with a sub-select on the table being updated. MySQL
    /// rejects this, forcing identifiers to be materialized first.
    pub update_can_self_select: bool,

    /// INSERT accepts several rows in one statement.
    pub has_bulk_insert: bool,

    /// INSERT can return the generated primary key.
    pub can_return_id_from_insert: bool,

    /// The return path handles more than one column, so composite primary
    /// keys can be returned.
    pub can_return_columns_from_insert: bool,

    /// `SELECT DISTINCT ON (...)` is available.
    pub distinct_on_fields: bool,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        update_can_self_select: true,
        has_bulk_insert: true,
        can_return_id_from_insert: false,
        can_return_columns_from_insert: false,
        distinct_on_fields: false,
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self {
        can_return_id_from_insert: true,
        can_return_columns_from_insert: true,
        distinct_on_fields: true,
        ..Self::SQLITE
    };

    /// MySQL capabilities
    pub const MYSQL: Self = Self {
        update_can_self_select: false,
        ..Self::SQLITE
    };
}
