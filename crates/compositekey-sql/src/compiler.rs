//! Statement compilers.
//!
//! Every step of SQL generation that depends on how many columns a field
//! occupies goes through [`StatementCompiler`]. The provided methods
//! implement single-column behavior and refuse composite input;
//! [`CompositeKeyAwareCompiler`] lifts those restrictions.

mod composite;
pub use composite::CompositeKeyAwareCompiler;

mod default_columns;
mod from;
mod in_clause;
mod insert;
mod pre_update;
mod resolve;

use crate::serializer::{CompiledStatement, Context, Formatter};

use compositekey_core::{
    schema::{ColumnRef, FieldId, ModelId},
    stmt::{InsertQuery, Query, UpdateQuery, Value},
    Connection, Error, Result,
};

use indexmap::IndexSet;
use std::fmt::Debug;

/// Right-hand side of an IN clause.
#[derive(Debug)]
pub enum InRhs<'a> {
    /// Literal values, one per candidate row. Multi-column IN expects
    /// composite values.
    Values(&'a [Value]),

    /// A sub-select compiled into the same statement.
    Query(&'a mut Query),
}

/// A field path resolved to physical columns on a joined alias.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPath {
    /// Last field named by the path
    pub field: FieldId,

    /// Physical columns of the path's target, in declared order
    pub columns: Vec<String>,

    /// Alias the columns live on
    pub alias: String,

    /// Every alias visited, starting with the alias the walk began at
    pub joins: Vec<String>,

    pub model: ModelId,
}

/// Knobs for [`StatementCompiler::default_columns`].
#[derive(Debug, Default)]
pub struct ColumnOptions<'a> {
    /// Rename columns whose name was already emitted (`... AS Col3`)
    pub with_aliases: bool,

    /// Column names emitted so far, shared across calls
    pub col_aliases: Option<&'a mut IndexSet<String>>,

    /// Alias to start from; defaults to the query's base alias
    pub start_alias: Option<String>,

    /// Model whose fields are listed; defaults to the query's model
    pub model: Option<ModelId>,

    /// Return `(alias, field)` pairs instead of rendered columns
    pub as_pairs: bool,

    /// Skip fields of ancestors `from_parent` already loads
    pub from_parent: Option<ModelId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DefaultColumns {
    Rendered {
        columns: Vec<String>,
        aliases: IndexSet<String>,
    },
    Pairs {
        pairs: Vec<(String, FieldId)>,
        aliases: IndexSet<String>,
    },
}

/// Composite-sensitive steps of statement compilation.
pub trait StatementCompiler: Debug + Send + Sync {
    /// Expands a column reference into physical column names.
    fn columns<'c>(&self, column: &'c ColumnRef) -> Result<&'c [String]> {
        match column {
            ColumnRef::Single(_) => Ok(column.columns()),
            ColumnRef::Composite(_) => Err(Error::unsupported_operation(format!(
                "composite column {column} needs the composite key compiler"
            ))),
        }
    }

    /// Writes the table list following `FROM`.
    fn from_clause(&self, cx: &Context<'_>, query: &mut Query, f: &mut Formatter<'_>) -> Result<()> {
        let composite_join = query.tables.iter().find(|alias| {
            query.refcount(alias) > 0
                && query
                    .alias_map
                    .get(*alias)
                    .is_some_and(|join| join.join_cols.len() > 1)
        });

        if let Some(alias) = composite_join {
            return Err(Error::unsupported_operation(format!(
                "join `{alias}` spans several columns"
            )));
        }

        from::from_clause(self, cx, query, f)
    }

    /// Writes `lhs IN (...)`.
    fn in_clause(
        &self,
        cx: &Context<'_>,
        lhs: &[String],
        rhs: InRhs<'_>,
        f: &mut Formatter<'_>,
    ) -> Result<()> {
        if lhs.len() != 1 {
            return Err(Error::unsupported_operation(
                "IN over several columns needs the composite key compiler",
            ));
        }

        in_clause::in_clause(self, cx, lhs, rhs, f)
    }

    /// Resolves a `__`-separated field path for ordering or `DISTINCT ON`,
    /// joining and promoting as needed.
    fn setup_joins(
        &self,
        cx: &Context<'_>,
        query: &mut Query,
        pieces: &[&str],
        model: ModelId,
        alias: Option<&str>,
    ) -> Result<ResolvedPath> {
        resolve::setup_joins(self, cx, query, pieces, model, alias)
    }

    /// Lists every concrete column of a model, joining parent tables for
    /// inherited fields.
    fn default_columns(
        &self,
        cx: &Context<'_>,
        query: &mut Query,
        options: ColumnOptions<'_>,
    ) -> Result<DefaultColumns> {
        default_columns::default_columns(self, cx, query, options)
    }

    /// Rewrites a multi-table UPDATE into a single-table one filtered by
    /// primary key.
    fn pre_update_setup(
        &self,
        cx: &Context<'_>,
        update: &mut UpdateQuery,
        conn: &mut dyn Connection,
    ) -> Result<()> {
        let pk = cx.schema.pk(update.query.model);
        if pk.column.is_composite() {
            return Err(Error::unsupported_operation(format!(
                "UPDATE on composite primary key `{}`",
                pk.column
            )));
        }

        pre_update::pre_update_setup(self, cx, update, conn)
    }

    /// Compiles an INSERT into one or more statements.
    fn insert_sql(&self, cx: &Context<'_>, insert: &InsertQuery) -> Result<Vec<CompiledStatement>> {
        insert::insert_sql(self, cx, insert)
    }
}

/// Single-column compilation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCompiler;

impl StatementCompiler for DefaultCompiler {}

/// The compiler used by serializers built without an explicit choice.
pub(crate) fn default_compiler() -> Box<dyn StatementCompiler> {
    if crate::is_installed() {
        Box::new(CompositeKeyAwareCompiler)
    } else {
        Box::new(DefaultCompiler)
    }
}
