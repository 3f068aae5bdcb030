use super::{filter, CompiledStatement, Context, ToSql};
use crate::compiler::StatementCompiler;

use compositekey_core::{stmt::UpdateQuery, Connection, Result};

/// The UPDATE of the model's own table followed by the updates of ancestor
/// tables, which are filtered by the primary keys fetched during setup.
pub(super) fn compile<C: StatementCompiler + ?Sized>(
    compiler: &C,
    cx: &Context<'_>,
    update: &mut UpdateQuery,
    conn: &mut dyn Connection,
) -> Result<Vec<CompiledStatement>> {
    compiler.pre_update_setup(cx, update, conn)?;

    let mut stmts = vec![];

    if !update.values.is_empty() {
        stmts.push(update_sql(compiler, cx, update)?);
    }

    for mut related in update.get_related_updates(cx.schema)? {
        stmts.extend(compile(compiler, cx, &mut related, conn)?);
    }

    Ok(stmts)
}

fn update_sql<C: StatementCompiler + ?Sized>(
    compiler: &C,
    cx: &Context<'_>,
    update: &mut UpdateQuery,
) -> Result<CompiledStatement> {
    let table = cx.quote_name(&cx.schema.model(update.query.model).db_table);

    CompiledStatement::build(cx, |f| {
        fmt!(f, "UPDATE " table " SET ");

        let mut s = "";
        for (id, value) in &update.values {
            let field = cx.schema.field(*id);
            let columns = compiler.columns(&field.column)?;
            let values = field.db_prep_save(value.clone())?;

            for (column, value) in columns.iter().zip(&values) {
                fmt!(f, s cx.quote_name(column) " = ");
                if value.is_null() {
                    fmt!(f, "NULL");
                } else {
                    f.param_with_template(field.placeholder.as_deref(), value);
                }
                s = ", ";
            }
        }

        filter::write_where(compiler, cx, &mut update.query, f)
    })
}
