use super::{ColumnRef, Schema};
use crate::{Error, Result};

pub(super) fn verify(schema: &Schema) -> Result<()> {
    for model in &schema.models {
        for field in &model.fields {
            if let ColumnRef::Composite(columns) = &field.column {
                if columns.len() < 2 {
                    return Err(Error::invalid_schema(format!(
                        "composite field `{}.{}` must span at least two columns",
                        model.name, field.name
                    )));
                }
            }

            if field.relation.is_some() {
                let target = schema.relation_target(field)?;
                if target.column.arity() != field.column.arity() {
                    return Err(Error::invalid_schema(format!(
                        "relation `{}.{}` has {} columns but its target has {}",
                        model.name,
                        field.name,
                        field.column.arity(),
                        target.column.arity()
                    )));
                }
            }
        }

        if let Some(parent) = &model.parent {
            let Some(link) = model.field_by_name(&parent.field) else {
                return Err(Error::invalid_schema(format!(
                    "parent link `{}.{}` is not declared",
                    model.name, parent.field
                )));
            };

            let points_at_parent = link
                .relation
                .as_ref()
                .is_some_and(|relation| relation.target == parent.model);

            if !points_at_parent {
                return Err(Error::invalid_schema(format!(
                    "parent link `{}.{}` must be a relation to `{}`",
                    model.name, parent.field, parent.model_name
                )));
            }
        }
    }

    Ok(())
}
