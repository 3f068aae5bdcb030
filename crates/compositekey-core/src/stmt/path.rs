use crate::schema::{FieldId, ModelId};

/// Result of walking a `__`-separated field path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathJoins {
    /// Last field named by the path
    pub field: FieldId,

    /// Fields whose columns the path ends on. For a trailing relation these
    /// are the relation's targets on the joined model.
    pub targets: Vec<FieldId>,

    /// Model owning `targets`
    pub model: ModelId,

    /// Aliases visited, starting with the alias the walk started from
    pub joins: Vec<String>,
}

impl PathJoins {
    pub fn final_alias(&self) -> &str {
        // joins always holds at least the starting alias
        &self.joins[self.joins.len() - 1]
    }
}
