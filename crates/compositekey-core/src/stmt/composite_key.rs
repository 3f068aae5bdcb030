use super::Value;
use crate::{
    schema::{ColumnRef, Field},
    Error, Result,
};

use std::fmt;

/// An immutable, fixed-arity tuple of column values forming one logical key.
///
/// Equality, ordering and hashing are element-wise, in the owning field's
/// declared column order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey {
    values: Box<[Value]>,
}

impl CompositeKey {
    /// Builds a key for `field` from one value per column.
    pub fn assemble(field: &Field, values: impl IntoIterator<Item = Value>) -> Result<CompositeKey> {
        CompositeKey::from_columns(&field.column, values)
    }

    /// Builds a key matching `column`'s arity.
    pub fn from_columns(
        column: &ColumnRef,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<CompositeKey> {
        let values: Box<[Value]> = values.into_iter().collect();

        if values.len() != column.arity() {
            return Err(Error::arity(column.arity(), values.len()));
        }

        Ok(CompositeKey { values })
    }

    /// Splits the key back into its column values.
    pub fn disassemble(self) -> Vec<Value> {
        self.values.into_vec()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(value, f)?;
        }
        f.write_str(")")
    }
}
