use super::{Lookup, Query, Value};
use crate::{
    schema::{FieldId, ModelId, Schema},
    Result,
};

use indexmap::IndexMap;

/// An UPDATE: a query selecting the rows plus the values to assign.
#[derive(Debug, Clone)]
pub struct UpdateQuery {
    pub query: Query,

    /// Assignments to fields stored on the model's own table
    pub values: Vec<(FieldId, Value)>,

    /// Assignments to inherited fields, grouped by the ancestor storing them
    pub related_updates: IndexMap<ModelId, Vec<(FieldId, Value)>>,

    /// Primary keys of the rows being updated, once materialized
    pub related_ids: Option<Vec<Value>>,
}

impl UpdateQuery {
    pub fn new(model: ModelId) -> UpdateQuery {
        UpdateQuery {
            query: Query::new(model),
            values: vec![],
            related_updates: IndexMap::new(),
            related_ids: None,
        }
    }

    /// Adds assignments by field name. Inherited fields are routed to the
    /// ancestor's table.
    pub fn add_update_values<'a>(
        &mut self,
        schema: &Schema,
        values: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Result<()> {
        for (name, value) in values {
            let (field, owner) = schema.resolve_field(self.query.model, name)?;

            match owner {
                Some(ancestor) => self
                    .related_updates
                    .entry(ancestor)
                    .or_default()
                    .push((field.id, value)),
                None => self.values.push((field.id, value)),
            }
        }

        Ok(())
    }

    /// One update per ancestor table, restricted to the materialized primary
    /// keys. Empty until `related_ids` is set.
    pub fn get_related_updates(&self, schema: &Schema) -> Result<Vec<UpdateQuery>> {
        let Some(ids) = &self.related_ids else {
            return Ok(vec![]);
        };

        let mut queries = vec![];

        for (model, values) in &self.related_updates {
            let mut update = UpdateQuery::new(*model);
            update.values = values.clone();
            update.query.add_filter(schema, "pk", Lookup::In(ids.clone()))?;
            queries.push(update);
        }

        Ok(queries)
    }
}
