use super::Error;

/// Error when a composite value has the wrong number of elements.
///
/// This occurs when:
/// - A composite key is assembled from more or fewer values than its field
///   declares columns
/// - A tuple `IN` list contains a row whose width differs from the left-hand
///   column list
/// - A sub-query used as the right-hand side of a tuple `IN` selects the wrong
///   number of columns
///
/// Values are never truncated or padded to make them fit.
#[derive(Debug)]
pub(super) struct ArityError {
    expected: usize,
    actual: usize,
}

impl std::error::Error for ArityError {}

impl core::fmt::Display for ArityError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "arity mismatch: expected {} values, got {}",
            self.expected, self.actual
        )
    }
}

impl Error {
    /// Creates an arity error.
    pub fn arity(expected: usize, actual: usize) -> Error {
        Error::from(super::ErrorKind::Arity(ArityError { expected, actual }))
    }

    /// Returns `true` if this error is an arity error.
    pub fn is_arity(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Arity(_))
    }
}
