use super::{Condition, Join, JoinSpec, JoinType, Lookup, PathJoins, Value, Where, WhereNode};
use crate::{
    bail,
    schema::{ColumnRef, FieldId, ModelId, Schema},
    Result,
};

use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// An in-flight SELECT: tables and aliases, the filter tree, the select list
/// and ordering.
///
/// The statement compiler reads and rewrites this structure in place. A query
/// lives for one compilation pass.
#[derive(Debug, Clone)]
pub struct Query {
    /// Model the statement is rooted at
    pub model: ModelId,

    /// Alias → table reference, in creation order
    pub alias_map: IndexMap<String, Join>,

    /// Number of logical uses of each alias. Zero means prunable.
    pub alias_refcount: HashMap<String, usize>,

    /// Table → aliases referencing it
    pub table_map: HashMap<String, Vec<String>>,

    /// Every alias ever created, in creation order
    pub tables: Vec<String>,

    /// Tables listed after the join-derived tables
    pub extra_tables: Vec<String>,

    /// Prefix for generated aliases (`T1`, `T2`, ...)
    pub alias_prefix: char,

    pub filter: WhereNode,

    /// Explicitly selected columns
    pub select: Vec<SelectCol>,

    /// Select every concrete field of the model
    pub default_cols: bool,

    /// Field paths, `-` prefix for descending
    pub order_by: Vec<String>,

    pub default_ordering: bool,

    pub distinct: bool,

    /// Field paths for `DISTINCT ON`
    pub distinct_fields: Vec<String>,

    pub select_related: bool,

    /// When set, only these fields (plus primary keys) are loaded
    pub only: Option<Vec<String>>,
}

/// One entry of an explicit select list.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectCol {
    pub alias: String,
    pub column: ColumnRef,
    pub field: Option<FieldId>,
}

impl Query {
    pub fn new(model: ModelId) -> Query {
        Query {
            model,
            alias_map: IndexMap::new(),
            alias_refcount: HashMap::new(),
            table_map: HashMap::new(),
            tables: vec![],
            extra_tables: vec![],
            alias_prefix: 'T',
            filter: WhereNode::default(),
            select: vec![],
            default_cols: true,
            order_by: vec![],
            default_ordering: true,
            distinct: false,
            distinct_fields: vec![],
            select_related: false,
            only: None,
        }
    }

    /// Returns the alias of the base table, joining it first if needed. Each
    /// call counts as a reference.
    pub fn get_initial_alias(&mut self, schema: &Schema) -> String {
        match self.tables.first().cloned() {
            Some(alias) => {
                self.ref_alias(&alias);
                alias
            }
            None => {
                let table = schema.model(self.model).db_table.clone();
                self.join(JoinSpec::base(table), None, false, None)
            }
        }
    }

    pub fn refcount(&self, alias: &str) -> usize {
        self.alias_refcount.get(alias).copied().unwrap_or(0)
    }

    pub fn ref_alias(&mut self, alias: &str) {
        *self.alias_refcount.entry(alias.to_string()).or_insert(0) += 1;
    }

    pub fn unref_alias(&mut self, alias: &str, amount: usize) {
        if let Some(count) = self.alias_refcount.get_mut(alias) {
            *count = count.saturating_sub(amount);
        }
    }

    /// Returns an alias for `table_name`. Without `create`, the first
    /// existing alias is reused (and referenced). Returns whether the alias is
    /// new.
    pub fn table_alias(&mut self, table_name: &str, create: bool) -> (String, bool) {
        if !create {
            if let Some(alias) = self.table_map.get(table_name).and_then(|a| a.first()).cloned() {
                self.ref_alias(&alias);
                return (alias, false);
            }
        }

        let alias = if self.table_map.contains_key(table_name) {
            format!("{}{}", self.alias_prefix, self.tables.len() + 1)
        } else {
            table_name.to_string()
        };

        self.table_map
            .entry(table_name.to_string())
            .or_default()
            .push(alias.clone());
        self.alias_refcount.insert(alias.clone(), 1);
        self.tables.push(alias.clone());
        (alias, true)
    }

    /// Adds a join described by `spec` and returns its alias.
    ///
    /// An existing join with the same spec is reused (and referenced) when it
    /// is in `reuse`, or always when `reuse` is `None`. New joins are INNER
    /// unless joined onto a LEFT OUTER join; promotion happens separately.
    pub fn join(
        &mut self,
        spec: JoinSpec,
        reuse: Option<&HashSet<String>>,
        nullable: bool,
        join_field: Option<FieldId>,
    ) -> String {
        let reusable = self
            .alias_map
            .iter()
            .find(|(alias, join)| {
                reuse.is_none_or(|reuse| reuse.contains(*alias)) && join.matches(&spec)
            })
            .map(|(alias, _)| alias.clone());

        if let Some(alias) = reusable {
            self.ref_alias(&alias);
            return alias;
        }

        let (alias, _) = self.table_alias(&spec.table, true);

        let join_type = match &spec.lhs {
            None => None,
            Some(lhs)
                if self
                    .alias_map
                    .get(lhs)
                    .is_some_and(|join| join.join_type == Some(JoinType::LeftOuter)) =>
            {
                Some(JoinType::LeftOuter)
            }
            Some(_) => Some(JoinType::Inner),
        };

        self.alias_map.insert(
            alias.clone(),
            Join {
                table_name: spec.table,
                alias: alias.clone(),
                join_type,
                lhs_alias: spec.lhs,
                join_cols: spec.join_cols,
                nullable,
                join_field,
            },
        );

        alias
    }

    /// Turns INNER joins into LEFT OUTER joins where the join is nullable or
    /// hangs off an outer join, cascading to joins that depend on a promoted
    /// alias.
    pub fn promote_joins<S: AsRef<str>>(&mut self, aliases: &[S]) {
        let mut pending: Vec<String> = aliases.iter().map(|a| a.as_ref().to_string()).collect();

        while !pending.is_empty() {
            let alias = pending.remove(0);

            let Some(join) = self.alias_map.get(&alias) else {
                continue;
            };

            let Some(lhs) = &join.lhs_alias else {
                continue;
            };

            let parent_louter = self
                .alias_map
                .get(lhs)
                .is_some_and(|parent| parent.join_type == Some(JoinType::LeftOuter));
            let already_louter = join.join_type == Some(JoinType::LeftOuter);

            if (join.nullable || parent_louter) && !already_louter {
                self.alias_map[&alias].join_type = Some(JoinType::LeftOuter);

                let children: Vec<String> = self
                    .alias_map
                    .iter()
                    .filter(|(child, join)| {
                        join.lhs_alias.as_deref() == Some(alias.as_str()) && !pending.contains(*child)
                    })
                    .map(|(child, _)| child.clone())
                    .collect();
                pending.extend(children);
            }
        }
    }

    /// Walks `names` starting at `alias` on `model`, joining every relation
    /// (and every parent table needed for inherited fields) along the way.
    pub fn setup_joins<S: AsRef<str>>(
        &mut self,
        schema: &Schema,
        names: &[S],
        model: ModelId,
        alias: &str,
        can_reuse: Option<&HashSet<String>>,
    ) -> Result<PathJoins> {
        if names.is_empty() {
            bail!("empty field path");
        }

        let mut joins = vec![alias.to_string()];
        let mut curr = model;
        let mut resolved = None;

        for (i, name) in names.iter().enumerate() {
            let name = name.as_ref();

            if resolved.is_some() {
                bail!(
                    "cannot traverse `{name}`: `{}` is not a relation",
                    names[i - 1].as_ref()
                );
            }

            let (field, owner) = schema.resolve_field(curr, name)?;

            if let Some(owner) = owner {
                let chain = schema.base_chain(curr, owner).unwrap_or_default();
                let mut child = curr;
                for ancestor in chain {
                    let Some(link) = schema.ancestor_link(child, ancestor) else {
                        bail!("model has no link to its parent");
                    };
                    let spec = JoinSpec {
                        lhs: Some(joins[joins.len() - 1].clone()),
                        table: schema.model(ancestor).db_table.clone(),
                        join_cols: schema.join_columns(link)?,
                    };
                    joins.push(self.join(spec, can_reuse, false, Some(link.id)));
                    child = ancestor;
                }
                curr = owner;
            }

            match &field.relation {
                Some(relation) => {
                    let target = schema.relation_target(field)?;
                    let spec = JoinSpec {
                        lhs: Some(joins[joins.len() - 1].clone()),
                        table: schema.model(relation.target).db_table.clone(),
                        join_cols: schema.join_columns(field)?,
                    };
                    joins.push(self.join(spec, can_reuse, field.nullable, Some(field.id)));
                    curr = relation.target;

                    if i == names.len() - 1 {
                        resolved = Some((field.id, target.id));
                    }
                }
                None => resolved = Some((field.id, field.id)),
            }
        }

        let Some((field, target)) = resolved else {
            bail!("field path did not resolve to a field");
        };

        Ok(PathJoins {
            field,
            targets: vec![target],
            model: curr,
            joins,
        })
    }

    /// Drops trailing joins whose target columns are already available on the
    /// left-hand side, i.e. filtering on a relation uses the foreign key
    /// columns instead of the related table's primary key.
    pub fn trim_joins(&mut self, schema: &Schema, path: &mut PathJoins) -> Result<()> {
        while path.joins.len() > 1 {
            let last = path.final_alias().to_string();
            let Some(join_field) = self.alias_map.get(&last).and_then(|join| join.join_field) else {
                break;
            };

            let field = schema.field(join_field);
            let target = schema.relation_target(field)?;
            if path.targets != [target.id] {
                break;
            }

            path.targets = vec![join_field];
            path.model = join_field.model;
            self.unref_alias(&last, 1);
            path.joins.pop();
        }

        Ok(())
    }

    /// Joins the parent tables needed to reach fields declared on `ancestor`
    /// and returns the alias holding them. `seen` memoizes per call site.
    pub fn join_parent_model(
        &mut self,
        schema: &Schema,
        model: ModelId,
        ancestor: Option<ModelId>,
        start_alias: &str,
        seen: &mut HashMap<Option<ModelId>, String>,
    ) -> Result<String> {
        if let Some(alias) = seen.get(&ancestor) {
            return Ok(alias.clone());
        }

        let Some(ancestor) = ancestor else {
            return Ok(start_alias.to_string());
        };

        let Some(chain) = schema.base_chain(model, ancestor) else {
            return Ok(start_alias.to_string());
        };

        let mut curr = model;
        let mut alias = start_alias.to_string();

        for int_model in chain {
            if let Some(seen_alias) = seen.get(&Some(int_model)) {
                alias = seen_alias.clone();
                curr = int_model;
                continue;
            }

            let Some(link) = schema.ancestor_link(curr, int_model) else {
                bail!("model has no link to its parent");
            };

            let path = self.setup_joins(schema, &[link.name.as_str()], curr, &alias, None)?;
            alias = path.final_alias().to_string();
            seen.insert(Some(int_model), alias.clone());
            curr = int_model;
        }

        Ok(alias)
    }

    /// Replaces the select list with the columns of `names`.
    pub fn add_fields<S: AsRef<str>>(&mut self, schema: &Schema, names: &[S]) -> Result<()> {
        let alias = self.get_initial_alias(schema);

        for name in names {
            let pieces: Vec<&str> = name.as_ref().split("__").collect();
            let mut path = self.setup_joins(schema, &pieces, self.model, &alias, None)?;
            self.trim_joins(schema, &mut path)?;
            self.promote_joins(&path.joins[1..]);

            for target in &path.targets {
                self.select.push(SelectCol {
                    alias: path.final_alias().to_string(),
                    column: schema.field(*target).column.clone(),
                    field: Some(*target),
                });
            }
        }

        self.default_cols = false;
        Ok(())
    }

    /// ANDs a condition on the field at `path` into the filter.
    pub fn add_filter(&mut self, schema: &Schema, path: &str, lookup: Lookup) -> Result<()> {
        let pieces: Vec<&str> = path.split("__").collect();
        let alias = self.get_initial_alias(schema);
        let mut resolved = self.setup_joins(schema, &pieces, self.model, &alias, None)?;
        self.trim_joins(schema, &mut resolved)?;

        if matches!(lookup, Lookup::IsNull(true) | Lookup::Exact(Value::Null)) {
            self.promote_joins(&resolved.joins[1..]);
        }

        let target = schema.field(resolved.targets[0]);
        self.filter.add(Where::Condition(Condition {
            alias: resolved.final_alias().to_string(),
            column: target.column.clone(),
            field: target.id,
            lookup,
        }));
        Ok(())
    }

    pub fn clear_ordering(&mut self, force_empty: bool) {
        self.order_by.clear();
        if force_empty {
            self.default_ordering = false;
        }
    }

    /// Number of aliases still referenced.
    pub fn count_active_tables(&self) -> usize {
        self.tables.iter().filter(|alias| self.refcount(alias) > 0).count()
    }

    /// Moves every alias to the next prefix letter so this query can be nested
    /// inside one using the current prefix.
    pub fn bump_prefix(&mut self) -> Result<()> {
        if self.alias_prefix >= 'Z' {
            bail!("ran out of alias prefixes");
        }

        let prefix = (self.alias_prefix as u8 + 1) as char;
        self.alias_prefix = prefix;

        let change_map: HashMap<String, String> = self
            .tables
            .iter()
            .enumerate()
            .map(|(pos, alias)| (alias.clone(), format!("{prefix}{pos}")))
            .collect();

        self.change_aliases(&change_map);
        Ok(())
    }

    /// Renames aliases everywhere they appear.
    pub fn change_aliases(&mut self, change_map: &HashMap<String, String>) {
        let rename = |alias: &String| change_map.get(alias).cloned().unwrap_or_else(|| alias.clone());

        self.filter.relabel_aliases(change_map);

        for col in &mut self.select {
            col.alias = rename(&col.alias);
        }

        self.tables = self.tables.iter().map(rename).collect();

        self.alias_refcount = self
            .alias_refcount
            .drain()
            .map(|(alias, count)| (rename(&alias), count))
            .collect();

        self.alias_map = self
            .alias_map
            .drain(..)
            .map(|(alias, mut join)| {
                join.alias = rename(&join.alias);
                join.lhs_alias = join.lhs_alias.as_ref().map(rename);
                (rename(&alias), join)
            })
            .collect();

        for aliases in self.table_map.values_mut() {
            for alias in aliases.iter_mut() {
                *alias = rename(alias);
            }
        }
    }

    /// Table → columns to load when deferred loading is active. Tables
    /// missing from the map load every column.
    pub fn deferred_to_columns(&self, schema: &Schema) -> HashMap<String, HashSet<String>> {
        let mut only_load: HashMap<String, HashSet<String>> = HashMap::new();

        let Some(only) = &self.only else {
            return only_load;
        };

        for (field, owner) in schema.concrete_fields_with_model(self.model) {
            let table = &schema.model(owner.unwrap_or(self.model)).db_table;
            let columns = only_load.entry(table.clone()).or_default();

            if field.primary_key || only.iter().any(|name| *name == field.name) {
                columns.extend(field.column.columns().iter().cloned());
            }
        }

        only_load
    }
}
