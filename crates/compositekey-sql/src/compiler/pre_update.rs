use super::StatementCompiler;
use crate::serializer::{select, Context};

use compositekey_core::{
    stmt::{CompositeKey, Lookup, UpdateQuery, Value, WhereNode},
    err, Connection, Error, Result,
};

use tracing::debug;

/// Reduces an UPDATE that touches other tables (through its filter or through
/// inherited fields) to `pk IN (...)` on the model's own table.
///
/// Primary keys are fetched up front when ancestor tables are updated too, or
/// when the backend cannot select from the table being updated.
pub(super) fn pre_update_setup<C: StatementCompiler + ?Sized>(
    compiler: &C,
    cx: &Context<'_>,
    update: &mut UpdateQuery,
    conn: &mut dyn Connection,
) -> Result<()> {
    let schema = cx.schema;

    update.query.select_related = false;
    update.query.clear_ordering(true);

    if update.query.tables.is_empty() {
        update.query.get_initial_alias(schema);
    }

    let count = update.query.count_active_tables();
    if update.related_updates.is_empty() && count == 1 {
        return Ok(());
    }

    let mut inner = update.query.clone();
    inner.bump_prefix()?;
    inner.select.clear();
    inner.add_fields(schema, &["pk"])?;

    // Selecting only the primary key may have dropped tables.
    let count = inner.count_active_tables();
    if update.related_updates.is_empty() && count == 1 {
        return Ok(());
    }

    let must_pre_select = count > 1 && !cx.capability.update_can_self_select;

    update.query.filter = WhereNode::default();

    if !update.related_updates.is_empty() || must_pre_select {
        let pk = schema.pk(update.query.model);
        let stmt = select::compile(compiler, cx, &mut inner)?;
        let table = &schema.model(update.query.model).db_table;
        let rows = conn
            .query(&stmt.sql, &stmt.params)
            .map_err(|e| e.context(err!("materializing primary keys of `{table}`")))?;

        let mut idents = Vec::with_capacity(rows.len());
        for row in rows {
            if pk.column.is_composite() {
                idents.push(Value::Composite(CompositeKey::assemble(pk, row)?));
            } else {
                let [ident] = <[Value; 1]>::try_from(row).map_err(|row| Error::arity(1, row.len()))?;
                idents.push(ident);
            }
        }

        debug!(
            table = %table,
            rows = idents.len(),
            "materialized primary keys for UPDATE"
        );

        update.query.add_filter(schema, "pk", Lookup::In(idents.clone()))?;
        update.related_ids = Some(idents);
    } else {
        update.query.add_filter(schema, "pk", Lookup::InQuery(Box::new(inner)))?;
    }

    for alias in update.query.tables.iter().skip(1) {
        update.query.alias_refcount.insert(alias.clone(), 0);
    }

    Ok(())
}
