use super::{ResolvedPath, StatementCompiler};
use crate::serializer::Context;

use compositekey_core::{schema::ModelId, stmt::Query, Result};

pub(super) fn setup_joins<C: StatementCompiler + ?Sized>(
    compiler: &C,
    cx: &Context<'_>,
    query: &mut Query,
    pieces: &[&str],
    model: ModelId,
    alias: Option<&str>,
) -> Result<ResolvedPath> {
    let alias = match alias {
        Some(alias) => alias.to_string(),
        None => query.get_initial_alias(cx.schema),
    };

    let mut path = query.setup_joins(cx.schema, pieces, model, &alias, None)?;

    // A trailing relation resolves to its foreign key columns, matching what
    // the default column selector emits for the same field.
    query.trim_joins(cx.schema, &mut path)?;

    // Joins added by this walk; only these may be promoted.
    let joins_to_promote: Vec<String> = path
        .joins
        .iter()
        .filter(|join| query.refcount(join) < 2)
        .cloned()
        .collect();

    let alias = path.final_alias().to_string();

    let mut columns = vec![];
    for target in &path.targets {
        columns.extend(compiler.columns(&cx.schema.field(*target).column)?.iter().cloned());
    }

    if !cx.schema.field(path.field).is_relation() {
        // Keeps the alias from being trimmed as unused.
        query.ref_alias(&alias);
    }

    query.promote_joins(&joins_to_promote);

    Ok(ResolvedPath {
        field: path.field,
        columns,
        alias,
        joins: path.joins,
        model: path.model,
    })
}
