use super::{InRhs, StatementCompiler};
use crate::serializer::{select, Comma, Context, Formatter, ToSql};

use compositekey_core::{stmt::Value, Error, Result};

/// One parenthesized row of a multi-column IN list.
struct Row<'a>(&'a [Value]);

impl ToSql for Row<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, "(" Comma(self.0) ")");
    }
}

pub(super) fn in_clause<C: StatementCompiler + ?Sized>(
    compiler: &C,
    cx: &Context<'_>,
    lhs: &[String],
    rhs: InRhs<'_>,
    f: &mut Formatter<'_>,
) -> Result<()> {
    let arity = lhs.len();
    let lhs = match lhs {
        [column] => column.clone(),
        columns => format!("({})", columns.join(", ")),
    };

    match rhs {
        // Matches nothing, and negates to matching everything.
        InRhs::Values([]) => fmt!(f, "0 = 1"),
        InRhs::Values(values) if arity == 1 => {
            if let Some(key) = values.iter().find_map(Value::as_composite) {
                return Err(Error::arity(1, key.len()));
            }

            fmt!(f, lhs " IN (" Comma(values) ")");
        }
        InRhs::Values(values) => {
            let rows = values
                .iter()
                .map(|value| match value.as_composite() {
                    Some(key) if key.len() == arity => Ok(Row(key.values())),
                    Some(key) => Err(Error::arity(arity, key.len())),
                    None => Err(Error::arity(arity, 1)),
                })
                .collect::<Result<Vec<_>>>()?;

            fmt!(f, lhs " IN (" Comma(rows) ")");
        }
        InRhs::Query(query) => {
            let parts = select::prepare(compiler, cx, query)?;
            if parts.columns.len() != arity {
                return Err(Error::arity(arity, parts.columns.len()));
            }

            fmt!(f, lhs " IN (");
            select::write(compiler, cx, query, parts, f)?;
            fmt!(f, ")");
        }
    }

    Ok(())
}
