use super::{Query, Value};
use crate::{
    schema::{Field, FieldId, ModelId},
    Error, Result,
};

use indexmap::IndexMap;

/// An INSERT of one or more records.
#[derive(Debug, Clone)]
pub struct InsertQuery {
    pub query: Query,

    /// Fields to insert. Empty inserts only the primary key using the
    /// database default.
    pub fields: Vec<FieldId>,

    pub objs: Vec<Record>,

    /// Use stored values as-is, skipping save preparation
    pub raw: bool,

    /// Ask the database for the generated primary key
    pub return_id: bool,
}

/// Field values of one object, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: IndexMap<String, Value>,
}

impl InsertQuery {
    pub fn new(model: ModelId) -> InsertQuery {
        InsertQuery {
            query: Query::new(model),
            fields: vec![],
            objs: vec![],
            raw: false,
            return_id: false,
        }
    }

    pub fn insert_values(&mut self, fields: Vec<FieldId>, objs: Vec<Record>, raw: bool) {
        self.fields = fields;
        self.objs = objs;
        self.raw = raw;
    }
}

impl Record {
    pub fn new() -> Record {
        Record::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Record {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Record {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl Field {
    /// The value to save for this field: the record's value, else the
    /// field's default, else NULL.
    pub fn pre_save(&self, record: &Record) -> Value {
        record
            .get(&self.name)
            .or(self.default.as_ref())
            .cloned()
            .unwrap_or_default()
    }

    /// Converts a field value into one value per column.
    pub fn db_prep_save(&self, value: Value) -> Result<Vec<Value>> {
        let arity = self.column.arity();

        match value {
            Value::Null => Ok(vec![Value::Null; arity]),
            Value::Composite(key) if key.len() == arity && arity > 1 => Ok(key.disassemble()),
            Value::Composite(key) => Err(Error::arity(arity, key.len())),
            value if arity == 1 => Ok(vec![value]),
            _ => Err(Error::arity(arity, 1)),
        }
    }
}
