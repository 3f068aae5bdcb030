//! Schema declaration consumed by the statement compiler.

mod column_ref;
pub use column_ref::ColumnRef;

mod field;
pub use field::{Field, FieldId};

mod model;
pub use model::{Model, ModelId, ParentLink};

mod relation;
pub use relation::{Relation, Restriction};

mod verify;

use crate::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub models: Vec<Model>,
}

impl Schema {
    /// Assigns ids, resolves relation targets by model name and verifies the
    /// result.
    pub fn new(mut models: Vec<Model>) -> Result<Schema> {
        let names: Vec<String> = models.iter().map(|model| model.name.clone()).collect();
        let lookup = |name: &str| -> Result<ModelId> {
            names
                .iter()
                .position(|candidate| candidate == name)
                .map(ModelId)
                .ok_or_else(|| Error::invalid_schema(format!("unknown model `{name}`")))
        };

        for (index, model) in models.iter_mut().enumerate() {
            model.id = ModelId(index);

            for (field_index, field) in model.fields.iter_mut().enumerate() {
                field.id = FieldId {
                    model: ModelId(index),
                    index: field_index,
                };

                if let Some(relation) = &mut field.relation {
                    relation.target = lookup(&relation.target_name)?;
                }
            }

            let mut pks = model.fields.iter().enumerate().filter(|(_, f)| f.primary_key);
            match (pks.next(), pks.next()) {
                (Some((index, _)), None) => model.primary_key = index,
                (None, _) => {
                    return Err(Error::invalid_schema(format!(
                        "model `{}` has no primary key",
                        model.name
                    )))
                }
                (Some(_), Some(_)) => {
                    return Err(Error::invalid_schema(format!(
                        "model `{}` declares more than one primary key field; use a composite field",
                        model.name
                    )))
                }
            }

            if let Some(parent) = &mut model.parent {
                parent.model = lookup(&parent.model_name)?;
            }
        }

        let schema = Schema { models };
        verify::verify(&schema)?;
        Ok(schema)
    }

    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        &self.models[id.into().0]
    }

    pub fn model_by_name(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|model| model.name == name)
    }

    pub fn field(&self, id: FieldId) -> &Field {
        &self.model(id.model).fields[id.index]
    }

    pub fn pk(&self, model: ModelId) -> &Field {
        self.model(model).pk()
    }

    /// Returns the field a relation points at on its target model.
    pub fn relation_target(&self, field: &Field) -> Result<&Field> {
        let Some(relation) = &field.relation else {
            return Err(Error::invalid_schema(format!(
                "field `{}` is not a relation",
                field.name
            )));
        };

        let target = self.model(relation.target);
        match &relation.target_field {
            None => Ok(target.pk()),
            Some(name) => target
                .field_by_name(name)
                .ok_or_else(|| Error::field_not_found(&target.name, name)),
        }
    }

    /// `(lhs_column, rhs_column)` pairs for a join through `field`, in the
    /// field's declared column order.
    pub fn join_columns(&self, field: &Field) -> Result<Vec<(String, String)>> {
        let target = self.relation_target(field)?;
        Ok(field
            .column
            .columns()
            .iter()
            .cloned()
            .zip(target.column.columns().iter().cloned())
            .collect())
    }

    /// Every concrete field of `model`, inherited fields first. Inherited
    /// fields are tagged with the ancestor that declares them.
    pub fn concrete_fields_with_model(&self, model: ModelId) -> Vec<(&Field, Option<ModelId>)> {
        let model = self.model(model);
        let mut fields = vec![];

        if let Some(parent) = &model.parent {
            for (field, owner) in self.concrete_fields_with_model(parent.model) {
                fields.push((field, Some(owner.unwrap_or(parent.model))));
            }
        }

        fields.extend(model.fields.iter().map(|field| (field, None)));
        fields
    }

    /// Models between `model` (exclusive) and `ancestor` (inclusive), walking
    /// parent links. `None` when `ancestor` is not an ancestor.
    pub fn base_chain(&self, model: ModelId, ancestor: ModelId) -> Option<Vec<ModelId>> {
        let mut chain = vec![];
        let mut curr = self.model(model);

        while let Some(parent) = &curr.parent {
            chain.push(parent.model);
            if parent.model == ancestor {
                return Some(chain);
            }
            curr = self.model(parent.model);
        }

        None
    }

    /// True when `model` is `ancestor` or inherits from it.
    pub fn is_subclass(&self, model: ModelId, ancestor: ModelId) -> bool {
        model == ancestor || self.base_chain(model, ancestor).is_some()
    }

    /// Resolves a field name on `model` or one of its ancestors. `pk` names the
    /// primary key. Returns the field and, for inherited fields, the ancestor
    /// declaring it.
    pub fn resolve_field(&self, model: ModelId, name: &str) -> Result<(&Field, Option<ModelId>)> {
        let m = self.model(model);

        if name == "pk" {
            return Ok((m.pk(), None));
        }

        if let Some(field) = m.field_by_name(name) {
            return Ok((field, None));
        }

        let mut curr = m;
        while let Some(parent) = &curr.parent {
            curr = self.model(parent.model);
            if let Some(field) = curr.field_by_name(name) {
                return Ok((field, Some(curr.id)));
            }
        }

        Err(Error::field_not_found(&m.name, name))
    }

    /// The local field linking `model` to its direct parent `parent`.
    pub fn ancestor_link(&self, model: ModelId, parent: ModelId) -> Option<&Field> {
        let model = self.model(model);
        let link = model.parent.as_ref().filter(|link| link.model == parent)?;
        model.field_by_name(&link.field)
    }
}

impl From<&Model> for ModelId {
    fn from(value: &Model) -> Self {
        value.id
    }
}
