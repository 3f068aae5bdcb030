//! What the compiler needs from a database connection.

mod capability;
pub use capability::Capability;

use crate::{stmt::Value, Result};

use std::fmt::Debug;

/// A synchronous database connection.
///
/// The compiler only uses it to materialize primary keys before a multi-table
/// UPDATE; statement execution goes through the same interface.
pub trait Connection: Debug {
    /// Describes the backend's features.
    fn capability(&self) -> &Capability;

    /// Runs a query and returns every row.
    fn query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Vec<Value>>>;

    /// Runs a statement and returns the number of affected rows.
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64>;
}
