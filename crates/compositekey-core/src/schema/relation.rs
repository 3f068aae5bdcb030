use super::ModelId;
use crate::stmt::Value;

/// A foreign key from one model to another.
#[derive(Debug, Clone)]
pub struct Relation {
    /// Name of the target model, as declared.
    pub target_name: String,

    /// Resolved when the schema is built.
    pub target: ModelId,

    /// The field on the target model the key points at. `None` targets the
    /// primary key.
    pub target_field: Option<String>,

    /// Condition added to every join through this relation.
    pub restriction: Option<Restriction>,
}

/// Extra join condition `rhs_alias.column = value`, used for discriminated
/// (polymorphic) relations.
#[derive(Debug, Clone, PartialEq)]
pub struct Restriction {
    pub column: String,
    pub value: Value,
}

impl Relation {
    pub fn new(target: impl Into<String>) -> Relation {
        Relation {
            target_name: target.into(),
            target: ModelId::placeholder(),
            target_field: None,
            restriction: None,
        }
    }

    pub fn to_field(mut self, field: impl Into<String>) -> Relation {
        self.target_field = Some(field.into());
        self
    }

    pub fn restrict(mut self, column: impl Into<String>, value: impl Into<Value>) -> Relation {
        self.restriction = Some(Restriction {
            column: column.into(),
            value: value.into(),
        });
        self
    }
}
