use super::{Field, FieldId};

use std::fmt;

#[derive(Debug, Clone)]
pub struct Model {
    /// Uniquely identifies the model within the schema
    pub id: ModelId,

    /// Name of the model
    pub name: String,

    /// Table the model's local fields are stored in
    pub db_table: String,

    /// Fields declared on this model (inherited fields live on the parent)
    pub fields: Vec<Field>,

    /// Index of the primary key in `fields`
    pub primary_key: usize,

    /// Multi-table inheritance parent, if any
    pub parent: Option<ParentLink>,
}

/// Links a child model to the model it inherits from.
#[derive(Debug, Clone)]
pub struct ParentLink {
    pub model_name: String,

    /// Resolved when the schema is built.
    pub model: ModelId,

    /// Local field holding the foreign key to the parent's primary key.
    pub field: String,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub usize);

impl Model {
    pub fn new(name: impl Into<String>, db_table: impl Into<String>) -> Model {
        Model {
            id: ModelId::placeholder(),
            name: name.into(),
            db_table: db_table.into(),
            fields: vec![],
            primary_key: usize::MAX,
            parent: None,
        }
    }

    pub fn field(mut self, field: Field) -> Model {
        self.fields.push(field);
        self
    }

    /// Declares `parent` as this model's parent, linked through the local
    /// relation field `link`.
    pub fn inherits(mut self, parent: impl Into<String>, link: impl Into<String>) -> Model {
        self.parent = Some(ParentLink {
            model_name: parent.into(),
            model: ModelId::placeholder(),
            field: link.into(),
        });
        self
    }

    pub fn pk(&self) -> &Field {
        &self.fields[self.primary_key]
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_id(&self, index: usize) -> FieldId {
        FieldId {
            model: self.id,
            index,
        }
    }
}

impl ModelId {
    pub(crate) fn placeholder() -> ModelId {
        ModelId(usize::MAX)
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ModelId({})", self.0)
    }
}
