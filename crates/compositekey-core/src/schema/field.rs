use super::{ColumnRef, ModelId, Relation};
use crate::stmt::Value;

use std::fmt;

#[derive(Debug, Clone)]
pub struct Field {
    /// Uniquely identifies the field within the schema
    pub id: FieldId,

    /// Name of the field
    pub name: String,

    /// Column(s) backing the field
    pub column: ColumnRef,

    /// Whether the field accepts NULL
    pub nullable: bool,

    /// True if this is the model's primary key
    pub primary_key: bool,

    /// Set when the field is a foreign key
    pub relation: Option<Relation>,

    /// SQL template wrapping the parameter marker, e.g. `lower(%s)`. A
    /// template without `%s` consumes no parameter.
    pub placeholder: Option<String>,

    /// Value used on insert when the record does not provide one
    pub default: Option<Value>,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId {
    pub model: ModelId,
    pub index: usize,
}

impl Field {
    pub fn new(name: impl Into<String>, column: impl Into<ColumnRef>) -> Field {
        Field {
            id: FieldId::placeholder(),
            name: name.into(),
            column: column.into(),
            nullable: false,
            primary_key: false,
            relation: None,
            placeholder: None,
            default: None,
        }
    }

    pub fn composite<I, S>(name: impl Into<String>, columns: I) -> Field
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Field::new(name, ColumnRef::composite(columns))
    }

    pub fn primary_key(mut self) -> Field {
        self.primary_key = true;
        self
    }

    pub fn nullable(mut self) -> Field {
        self.nullable = true;
        self
    }

    pub fn relation(mut self, relation: Relation) -> Field {
        self.relation = Some(relation);
        self
    }

    pub fn placeholder(mut self, template: impl Into<String>) -> Field {
        self.placeholder = Some(template.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Field {
        self.default = Some(value.into());
        self
    }

    pub fn is_relation(&self) -> bool {
        self.relation.is_some()
    }
}

impl FieldId {
    pub(crate) fn placeholder() -> FieldId {
        FieldId {
            model: ModelId::placeholder(),
            index: usize::MAX,
        }
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "FieldId({}/{})", self.model.0, self.index)
    }
}
