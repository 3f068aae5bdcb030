use super::{ColumnOptions, DefaultColumns, StatementCompiler};
use crate::serializer::Context;

use compositekey_core::{bail, stmt::Query, Result};

use indexmap::IndexSet;
use std::collections::HashMap;

pub(super) fn default_columns<C: StatementCompiler + ?Sized>(
    compiler: &C,
    cx: &Context<'_>,
    query: &mut Query,
    options: ColumnOptions<'_>,
) -> Result<DefaultColumns> {
    let ColumnOptions {
        with_aliases,
        col_aliases,
        start_alias,
        model,
        as_pairs,
        from_parent,
    } = options;

    let model = model.unwrap_or(query.model);
    let only_load = query.deferred_to_columns(cx.schema);
    let start_alias = match start_alias {
        Some(alias) => alias,
        None => query.get_initial_alias(cx.schema),
    };

    let mut local_aliases = IndexSet::new();
    let col_aliases = col_aliases.unwrap_or(&mut local_aliases);

    // Owning ancestor → alias holding its columns. `None` is the model itself.
    let mut seen_models = HashMap::from([(None, start_alias.clone())]);

    let mut columns = vec![];
    let mut pairs = vec![];
    let mut aliases = IndexSet::new();

    for (field, owner) in cx.schema.concrete_fields_with_model(model) {
        if let (Some(from_parent), Some(owner)) = (from_parent, owner) {
            if cx.schema.is_subclass(from_parent, owner) {
                // Already loaded through the parent.
                continue;
            }
        }

        let alias = query.join_parent_model(cx.schema, model, owner, &start_alias, &mut seen_models)?;
        let Some(join) = query.alias_map.get(&alias) else {
            bail!("alias `{alias}` is not joined");
        };

        let field_columns = compiler.columns(&field.column)?;

        if let Some(load) = only_load.get(&join.table_name) {
            if !field_columns.iter().all(|column| load.contains(column)) {
                continue;
            }
        }

        if as_pairs {
            pairs.push((alias.clone(), field.id));
            aliases.insert(alias);
            continue;
        }

        for column in field_columns {
            let rendered = cx.column(query, &alias, column);

            if with_aliases && col_aliases.contains(column) {
                let c_alias = format!("Col{}", col_aliases.len());
                columns.push(format!("{rendered} AS {c_alias}"));
                col_aliases.insert(c_alias.clone());
                aliases.insert(c_alias);
            } else {
                columns.push(rendered.clone());
                aliases.insert(rendered);
                if with_aliases {
                    col_aliases.insert(column.clone());
                }
            }
        }
    }

    Ok(if as_pairs {
        DefaultColumns::Pairs { pairs, aliases }
    } else {
        DefaultColumns::Rendered { columns, aliases }
    })
}
