use super::{Query, Value};
use crate::schema::{ColumnRef, FieldId};

use std::collections::HashMap;

/// A tree of filter conditions.
#[derive(Debug, Clone, Default)]
pub struct WhereNode {
    pub connector: Connector,
    pub negated: bool,
    pub children: Vec<Where>,
}

#[derive(Debug, Clone)]
pub enum Where {
    Node(WhereNode),
    Condition(Condition),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Connector {
    #[default]
    And,
    Or,
}

/// A lookup against the column(s) of one field on one alias.
#[derive(Debug, Clone)]
pub struct Condition {
    pub alias: String,
    pub column: ColumnRef,
    pub field: FieldId,
    pub lookup: Lookup,
}

#[derive(Debug, Clone)]
pub enum Lookup {
    Exact(Value),
    In(Vec<Value>),
    InQuery(Box<Query>),
    IsNull(bool),
}

impl WhereNode {
    pub fn new(connector: Connector) -> WhereNode {
        WhereNode {
            connector,
            negated: false,
            children: vec![],
        }
    }

    pub fn negate(mut self) -> WhereNode {
        self.negated = !self.negated;
        self
    }

    pub fn add(&mut self, child: Where) {
        self.children.push(child);
    }

    pub fn is_empty(&self) -> bool {
        self.children.iter().all(|child| match child {
            Where::Node(node) => node.is_empty(),
            Where::Condition(_) => false,
        })
    }

    pub fn conditions(&self) -> impl Iterator<Item = &Condition> + '_ {
        let mut stack: Vec<&Where> = self.children.iter().rev().collect();
        std::iter::from_fn(move || {
            while let Some(child) = stack.pop() {
                match child {
                    Where::Condition(condition) => return Some(condition),
                    Where::Node(node) => stack.extend(node.children.iter().rev()),
                }
            }
            None
        })
    }

    pub(crate) fn relabel_aliases(&mut self, change_map: &HashMap<String, String>) {
        for child in &mut self.children {
            match child {
                Where::Node(node) => node.relabel_aliases(change_map),
                Where::Condition(condition) => {
                    if let Some(new_alias) = change_map.get(&condition.alias) {
                        condition.alias = new_alias.clone();
                    }
                }
            }
        }
    }
}

impl From<Condition> for Where {
    fn from(value: Condition) -> Self {
        Where::Condition(value)
    }
}

impl From<WhereNode> for Where {
    fn from(value: WhereNode) -> Self {
        Where::Node(value)
    }
}
