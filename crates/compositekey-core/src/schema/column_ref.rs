use std::fmt;

/// The physical column(s) a field occupies.
///
/// A composite field maps one logical value onto two or more columns. Every
/// piece of SQL generation branches on this enum instead of probing the field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnRef {
    Single(String),
    Composite(Vec<String>),
}

impl ColumnRef {
    pub fn single(name: impl Into<String>) -> ColumnRef {
        ColumnRef::Single(name.into())
    }

    pub fn composite<I, S>(names: I) -> ColumnRef
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ColumnRef::Composite(names.into_iter().map(Into::into).collect())
    }

    /// Physical column names in declared order.
    pub fn columns(&self) -> &[String] {
        match self {
            ColumnRef::Single(name) => std::slice::from_ref(name),
            ColumnRef::Composite(names) => names,
        }
    }

    pub fn arity(&self) -> usize {
        self.columns().len()
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, ColumnRef::Composite(_))
    }

    pub fn as_single(&self) -> Option<&str> {
        match self {
            ColumnRef::Single(name) => Some(name),
            ColumnRef::Composite(_) => None,
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(value: &str) -> Self {
        ColumnRef::Single(value.to_string())
    }
}

impl From<String> for ColumnRef {
    fn from(value: String) -> Self {
        ColumnRef::Single(value)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Single(name) => f.write_str(name),
            ColumnRef::Composite(names) => write!(f, "({})", names.join(", ")),
        }
    }
}
