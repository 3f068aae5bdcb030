use super::StatementCompiler;
use crate::serializer::{Context, Delimited, Formatter, ToSql};

use compositekey_core::{stmt::Query, Result};

/// Writes every referenced alias: the base table, then joins with one `ON`
/// term per column pair, then extra tables.
pub(super) fn from_clause<C: StatementCompiler + ?Sized>(
    _compiler: &C,
    cx: &Context<'_>,
    query: &mut Query,
    f: &mut Formatter<'_>,
) -> Result<()> {
    let mut first = true;

    for alias in &query.tables {
        if query.refcount(alias) == 0 {
            continue;
        }

        // Extra tables can end up in `tables` without being joined.
        let Some(join) = query.alias_map.get(alias) else {
            continue;
        };

        let name = cx.quote_name_unless_alias(query, &join.table_name);
        let alias_str = if join.alias == join.table_name {
            String::new()
        } else {
            format!(" {}", join.alias)
        };

        match (join.join_type, &join.lhs_alias) {
            (Some(join_type), Some(lhs)) if !first => {
                let lhs = cx.quote_name_unless_alias(query, lhs);
                let rhs = cx.quote_name_unless_alias(query, &join.alias);
                let terms = join.join_cols.iter().map(|(lhs_col, rhs_col)| {
                    format!(
                        "{lhs}.{} = {rhs}.{}",
                        cx.quote_name(lhs_col),
                        cx.quote_name(rhs_col)
                    )
                });

                fmt!(f, " " join_type.as_sql() " " name alias_str " ON (" Delimited(terms, " AND "));

                let restriction = join
                    .join_field
                    .and_then(|id| cx.schema.field(id).relation.as_ref())
                    .and_then(|relation| relation.restriction.as_ref());

                if let Some(restriction) = restriction {
                    let column = cx.column(query, &join.alias, &restriction.column);
                    let value = &restriction.value;
                    fmt!(f, " AND (" column " = " value ")");
                }

                fmt!(f, ")");
            }
            _ => {
                let connector = if first { "" } else { ", " };
                fmt!(f, connector name alias_str);
            }
        }

        first = false;
    }

    for table in query.extra_tables.clone() {
        let (alias, _) = query.table_alias(&table, false);

        // `table_alias` counts a reference, so a count of one means this is
        // the only one.
        if !query.alias_map.contains_key(&alias) || query.refcount(&alias) == 1 {
            let connector = if first { "" } else { ", " };
            fmt!(f, connector cx.quote_name_unless_alias(query, &alias));
            first = false;
        }
    }

    Ok(())
}
