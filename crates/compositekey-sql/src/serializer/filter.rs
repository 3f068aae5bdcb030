use super::{Context, Delimited, Formatter, ToSql};
use crate::compiler::{InRhs, StatementCompiler};

use compositekey_core::{
    stmt::{Condition, Connector, Lookup, Query, Value, Where, WhereNode},
    Error, Result,
};

/// `column = value`
struct Equals<'a>(&'a str, &'a Value);

impl ToSql for Equals<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, self.0 " = " self.1);
    }
}

/// Writes ` WHERE ...` unless the filter is empty.
pub(crate) fn write_where<C: StatementCompiler + ?Sized>(
    compiler: &C,
    cx: &Context<'_>,
    query: &mut Query,
    f: &mut Formatter<'_>,
) -> Result<()> {
    if query.filter.is_empty() {
        return Ok(());
    }

    // Sub-queries inside the filter are compiled mutably while the outer
    // query is only read for alias quoting.
    let mut filter = std::mem::take(&mut query.filter);
    fmt!(f, " WHERE ");
    let res = write_node(compiler, cx, query, &mut filter, true, f);
    query.filter = filter;
    res
}

fn write_node<C: StatementCompiler + ?Sized>(
    compiler: &C,
    cx: &Context<'_>,
    query: &Query,
    node: &mut WhereNode,
    top: bool,
    f: &mut Formatter<'_>,
) -> Result<()> {
    let separator = match node.connector {
        Connector::And => " AND ",
        Connector::Or => " OR ",
    };

    let count = node
        .children
        .iter()
        .filter(|child| !matches!(child, Where::Node(node) if node.is_empty()))
        .count();
    let wrap = node.negated || (!top && count > 1);

    if node.negated {
        fmt!(f, "NOT ");
    }
    if wrap {
        fmt!(f, "(");
    }

    let mut s = "";
    for child in &mut node.children {
        match child {
            Where::Node(child) if child.is_empty() => continue,
            Where::Node(child) => {
                fmt!(f, s);
                write_node(compiler, cx, query, child, false, f)?;
            }
            Where::Condition(condition) => {
                fmt!(f, s);
                write_condition(compiler, cx, query, condition, f)?;
            }
        }
        s = separator;
    }

    if wrap {
        fmt!(f, ")");
    }

    Ok(())
}

fn write_condition<C: StatementCompiler + ?Sized>(
    compiler: &C,
    cx: &Context<'_>,
    query: &Query,
    condition: &mut Condition,
    f: &mut Formatter<'_>,
) -> Result<()> {
    let columns: Vec<String> = compiler
        .columns(&condition.column)?
        .iter()
        .map(|column| cx.column(query, &condition.alias, column))
        .collect();

    match &mut condition.lookup {
        Lookup::Exact(Value::Null) => write_is_null(&columns, true, f),
        Lookup::IsNull(is_null) => write_is_null(&columns, *is_null, f),
        Lookup::Exact(value) => match (&columns[..], value.as_composite()) {
            ([column], None) => fmt!(f, Equals(column, value)),
            ([_], Some(key)) => return Err(Error::arity(1, key.len())),
            (columns, Some(key)) if key.len() == columns.len() => {
                let terms = columns
                    .iter()
                    .zip(key.values())
                    .map(|(column, value)| Equals(column, value));
                fmt!(f, "(" Delimited(terms, " AND ") ")");
            }
            (columns, Some(key)) => return Err(Error::arity(columns.len(), key.len())),
            (columns, None) => return Err(Error::arity(columns.len(), 1)),
        },
        Lookup::In(values) => compiler.in_clause(cx, &columns, InRhs::Values(values), f)?,
        Lookup::InQuery(inner) => compiler.in_clause(cx, &columns, InRhs::Query(inner), f)?,
    }

    Ok(())
}

fn write_is_null(columns: &[String], is_null: bool, f: &mut Formatter<'_>) {
    let test = if is_null { " IS NULL" } else { " IS NOT NULL" };
    let terms = columns.iter().map(|column| format!("{column}{test}"));

    if columns.len() == 1 {
        fmt!(f, Delimited(terms, ""));
    } else {
        fmt!(f, "(" Delimited(terms, " AND ") ")");
    }
}
