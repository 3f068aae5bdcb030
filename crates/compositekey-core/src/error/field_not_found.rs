use super::Error;

/// Error when a field path references a name the model does not declare.
#[derive(Debug)]
pub(super) struct FieldNotFound {
    model: Box<str>,
    name: Box<str>,
}

impl std::error::Error for FieldNotFound {}

impl core::fmt::Display for FieldNotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "field not found: {}.{}", self.model, self.name)
    }
}

impl Error {
    /// Creates a field not found error.
    pub fn field_not_found(model: impl Into<String>, name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::FieldNotFound(FieldNotFound {
            model: model.into().into(),
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is a field not found error.
    pub fn is_field_not_found(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::FieldNotFound(_))
    }
}
