//! Statement structures mutated in place by the compiler.

mod composite_key;
pub use composite_key::CompositeKey;

mod insert;
pub use insert::{InsertQuery, Record};

mod join;
pub use join::{Join, JoinSpec, JoinType};

mod path;
pub use path::PathJoins;

mod query;
pub use query::{Query, SelectCol};

mod update;
pub use update::UpdateQuery;

mod value;
pub use value::Value;

mod where_node;
pub use where_node::{Condition, Connector, Lookup, Where, WhereNode};
