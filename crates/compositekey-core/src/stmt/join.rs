use crate::schema::FieldId;

use std::fmt;

/// One entry of a query's alias map: a table reference and, for everything
/// but the base table, how it is joined.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// Physical table
    pub table_name: String,

    /// Name the table is referenced by in this statement
    pub alias: String,

    /// `None` for the base table and for comma-separated tables
    pub join_type: Option<JoinType>,

    /// Alias this table is joined onto
    pub lhs_alias: Option<String>,

    /// `(lhs_column, rhs_column)` pairs, ANDed in the `ON` clause
    pub join_cols: Vec<(String, String)>,

    /// True when the joining field is nullable
    pub nullable: bool,

    /// Relation the join was created for
    pub join_field: Option<FieldId>,
}

/// What a new join connects; two joins with the same spec are
/// interchangeable.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSpec {
    pub lhs: Option<String>,
    pub table: String,
    pub join_cols: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    LeftOuter,
}

impl Join {
    pub fn is_base(&self) -> bool {
        self.lhs_alias.is_none()
    }

    pub(crate) fn matches(&self, spec: &JoinSpec) -> bool {
        self.lhs_alias == spec.lhs && self.table_name == spec.table && self.join_cols == spec.join_cols
    }
}

impl JoinSpec {
    pub fn base(table: impl Into<String>) -> JoinSpec {
        JoinSpec {
            lhs: None,
            table: table.into(),
            join_cols: vec![],
        }
    }
}

impl JoinType {
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::LeftOuter => "LEFT OUTER JOIN",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}
