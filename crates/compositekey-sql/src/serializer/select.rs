use super::{filter, CompiledStatement, Comma, Context, Formatter, ToSql};
use crate::compiler::{ColumnOptions, DefaultColumns, StatementCompiler};

use compositekey_core::{bail, stmt::Query, Error, Result};

/// Column, ordering and `DISTINCT ON` lists, resolved before FROM is written
/// so the joins they add are part of it.
#[derive(Debug)]
pub(crate) struct SelectParts {
    pub(crate) columns: Vec<String>,
    ordering: Vec<String>,
    distinct: Vec<String>,
}

pub(crate) fn compile<C: StatementCompiler + ?Sized>(
    compiler: &C,
    cx: &Context<'_>,
    query: &mut Query,
) -> Result<CompiledStatement> {
    CompiledStatement::build(cx, |f| {
        let parts = prepare(compiler, cx, query)?;
        write(compiler, cx, query, parts, f)
    })
}

pub(crate) fn prepare<C: StatementCompiler + ?Sized>(
    compiler: &C,
    cx: &Context<'_>,
    query: &mut Query,
) -> Result<SelectParts> {
    let mut columns = vec![];

    if !query.select.is_empty() {
        for col in &query.select {
            for column in compiler.columns(&col.column)? {
                columns.push(cx.column(query, &col.alias, column));
            }
        }
    } else if query.default_cols {
        match compiler.default_columns(cx, query, ColumnOptions::default())? {
            DefaultColumns::Rendered { columns: rendered, .. } => columns.extend(rendered),
            DefaultColumns::Pairs { .. } => bail!("default columns were returned as pairs"),
        }
    }

    let model = query.model;

    let mut ordering = vec![];
    for name in query.order_by.clone() {
        let (name, direction) = match name.strip_prefix('-') {
            Some(name) => (name, "DESC"),
            None => (name.as_str(), "ASC"),
        };

        let pieces: Vec<&str> = name.split("__").collect();
        let path = compiler.setup_joins(cx, query, &pieces, model, None)?;
        for column in &path.columns {
            ordering.push(format!("{} {direction}", cx.column(query, &path.alias, column)));
        }
    }

    let mut distinct = vec![];
    for name in query.distinct_fields.clone() {
        let pieces: Vec<&str> = name.split("__").collect();
        let path = compiler.setup_joins(cx, query, &pieces, model, None)?;
        for column in &path.columns {
            distinct.push(cx.column(query, &path.alias, column));
        }
    }

    if !distinct.is_empty() && !cx.capability.distinct_on_fields {
        return Err(Error::unsupported_operation(
            "DISTINCT ON fields are not supported by this database backend",
        ));
    }

    Ok(SelectParts {
        columns,
        ordering,
        distinct,
    })
}

pub(crate) fn write<C: StatementCompiler + ?Sized>(
    compiler: &C,
    cx: &Context<'_>,
    query: &mut Query,
    parts: SelectParts,
    f: &mut Formatter<'_>,
) -> Result<()> {
    fmt!(f, "SELECT ");

    if !parts.distinct.is_empty() {
        fmt!(f, "DISTINCT ON (" Comma(&parts.distinct) ") ");
    } else if query.distinct {
        fmt!(f, "DISTINCT ");
    }

    fmt!(f, Comma(&parts.columns) " FROM ");
    compiler.from_clause(cx, query, f)?;
    filter::write_where(compiler, cx, query, f)?;

    if !parts.ordering.is_empty() {
        fmt!(f, " ORDER BY " Comma(&parts.ordering));
    }

    Ok(())
}
