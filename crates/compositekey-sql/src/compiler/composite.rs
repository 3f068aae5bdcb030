use super::{from, in_clause, pre_update, InRhs, StatementCompiler};
use crate::serializer::{Context, Formatter};

use compositekey_core::{
    schema::ColumnRef,
    stmt::{Query, UpdateQuery},
    Connection, Result,
};

/// Compiler that treats multi-column keys as atomic values: tuple IN, one
/// `ON` term per column pair, composite primary keys in UPDATE and INSERT.
///
/// Output for single-column fields is identical to [`DefaultCompiler`].
///
/// [`DefaultCompiler`]: super::DefaultCompiler
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeKeyAwareCompiler;

impl StatementCompiler for CompositeKeyAwareCompiler {
    fn columns<'c>(&self, column: &'c ColumnRef) -> Result<&'c [String]> {
        Ok(column.columns())
    }

    fn from_clause(&self, cx: &Context<'_>, query: &mut Query, f: &mut Formatter<'_>) -> Result<()> {
        from::from_clause(self, cx, query, f)
    }

    fn in_clause(
        &self,
        cx: &Context<'_>,
        lhs: &[String],
        rhs: InRhs<'_>,
        f: &mut Formatter<'_>,
    ) -> Result<()> {
        in_clause::in_clause(self, cx, lhs, rhs, f)
    }

    fn pre_update_setup(
        &self,
        cx: &Context<'_>,
        update: &mut UpdateQuery,
        conn: &mut dyn Connection,
    ) -> Result<()> {
        pre_update::pre_update_setup(self, cx, update, conn)
    }
}
