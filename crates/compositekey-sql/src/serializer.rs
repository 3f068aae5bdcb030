#[macro_use]
mod fmt;
pub(crate) use fmt::ToSql;

mod delim;
pub(crate) use delim::{Comma, Delimited};

mod flavor;
pub use flavor::Flavor;

mod params;
pub use params::{ParamStyle, Params, Placeholder};

// Statement pipelines
pub(crate) mod filter;
pub(crate) mod select;
mod update;

use crate::compiler::{self, StatementCompiler};

use compositekey_core::{
    driver::Capability,
    stmt::{InsertQuery, Query, UpdateQuery, Value},
    Connection, Result, Schema,
};

use std::fmt as stdfmt;
use tracing::trace;

/// Compiles statements for one schema and one SQL flavor.
#[derive(Debug)]
pub struct Serializer<'a> {
    cx: Context<'a>,

    /// Strategy used for every composite-sensitive step
    compiler: Box<dyn StatementCompiler>,
}

/// Everything a compiler needs besides the statement itself.
#[derive(Debug, Clone)]
pub struct Context<'a> {
    /// Schema against which statements are compiled
    pub schema: &'a Schema,

    /// The database flavor handles the differences between SQL dialects.
    pub flavor: Flavor,

    /// Backend features
    pub capability: Capability,

    pub param_style: ParamStyle,
}

/// Writes SQL text and binds parameters in a single pass, so placeholders and
/// parameters always line up.
pub struct Formatter<'a> {
    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut dyn Params,

    style: ParamStyle,
}

/// A SQL string with its positional parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl<'a> Serializer<'a> {
    /// Uses the flavor's default parameter style and capabilities. The
    /// compiler is the composite-key-aware one once [`install`] has run.
    ///
    /// [`install`]: crate::install
    pub fn new(schema: &'a Schema, flavor: Flavor) -> Serializer<'a> {
        Serializer {
            cx: Context {
                schema,
                flavor,
                capability: flavor.default_capability(),
                param_style: flavor.default_param_style(),
            },
            compiler: compiler::default_compiler(),
        }
    }

    pub fn with_compiler(mut self, compiler: impl StatementCompiler + 'static) -> Serializer<'a> {
        self.compiler = Box::new(compiler);
        self
    }

    pub fn with_param_style(mut self, style: ParamStyle) -> Serializer<'a> {
        self.cx.param_style = style;
        self
    }

    pub fn with_capability(mut self, capability: Capability) -> Serializer<'a> {
        self.cx.capability = capability;
        self
    }

    pub fn context(&self) -> &Context<'a> {
        &self.cx
    }

    pub fn compiler(&self) -> &dyn StatementCompiler {
        &*self.compiler
    }

    /// Compiles a SELECT. The query is rewritten in place (aliases, joins,
    /// reference counts).
    pub fn select(&self, query: &mut Query) -> Result<CompiledStatement> {
        let stmt = select::compile(&*self.compiler, &self.cx, query)?;
        trace!(sql = %stmt.sql, params = stmt.params.len(), "compiled SELECT");
        Ok(stmt)
    }

    /// Compiles an UPDATE followed by one UPDATE per ancestor table touched.
    /// May query `conn` to pin down the affected primary keys first.
    pub fn update(
        &self,
        update: &mut UpdateQuery,
        conn: &mut dyn Connection,
    ) -> Result<Vec<CompiledStatement>> {
        let stmts = update::compile(&*self.compiler, &self.cx, update, conn)?;
        for stmt in &stmts {
            trace!(sql = %stmt.sql, params = stmt.params.len(), "compiled UPDATE");
        }
        Ok(stmts)
    }

    pub fn insert(&self, insert: &InsertQuery) -> Result<Vec<CompiledStatement>> {
        let stmts = self.compiler.insert_sql(&self.cx, insert)?;
        for stmt in &stmts {
            trace!(sql = %stmt.sql, params = stmt.params.len(), "compiled INSERT");
        }
        Ok(stmts)
    }
}

impl Context<'_> {
    pub fn quote_name(&self, name: &str) -> String {
        self.flavor.quote_name(name)
    }

    /// Quotes `name` unless it is a generated alias (an alias that is not
    /// also a table name).
    pub fn quote_name_unless_alias(&self, query: &Query, name: &str) -> String {
        if query.alias_map.contains_key(name) && !query.table_map.contains_key(name) {
            return name.to_string();
        }
        self.quote_name(name)
    }

    /// `alias.column`, quoted.
    pub fn column(&self, query: &Query, alias: &str, column: &str) -> String {
        format!(
            "{}.{}",
            self.quote_name_unless_alias(query, alias),
            self.quote_name(column)
        )
    }
}

impl<'a> Formatter<'a> {
    pub fn new(dst: &'a mut String, params: &'a mut dyn Params, style: ParamStyle) -> Formatter<'a> {
        Formatter { dst, params, style }
    }

    pub fn write_str(&mut self, s: &str) {
        self.dst.push_str(s);
    }

    /// Binds `value` and writes its placeholder.
    pub fn param(&mut self, value: &Value) {
        value.to_sql(self);
    }

    /// Binds `value` through a custom template such as `lower(%s)`. A
    /// template without `%s` is written verbatim and binds nothing.
    pub fn param_with_template(&mut self, template: Option<&str>, value: &Value) {
        let Some(template) = template else {
            return self.param(value);
        };

        match template.split_once("%s") {
            Some((before, after)) => fmt!(self, before value after),
            None => self.write_str(template),
        }
    }

    pub fn as_str(&self) -> &str {
        self.dst.as_str()
    }
}

impl stdfmt::Debug for Formatter<'_> {
    fn fmt(&self, f: &mut stdfmt::Formatter<'_>) -> stdfmt::Result {
        f.debug_struct("Formatter")
            .field("dst", &self.dst)
            .field("style", &self.style)
            .finish()
    }
}

impl CompiledStatement {
    /// Writes a statement with `write` into a fresh buffer and parameter list.
    pub(crate) fn build(
        cx: &Context<'_>,
        write: impl FnOnce(&mut Formatter<'_>) -> Result<()>,
    ) -> Result<CompiledStatement> {
        let mut sql = String::new();
        let mut params: Vec<Value> = vec![];
        let mut f = Formatter::new(&mut sql, &mut params, cx.param_style);
        write(&mut f)?;
        Ok(CompiledStatement { sql, params })
    }
}

impl stdfmt::Display for CompiledStatement {
    fn fmt(&self, f: &mut stdfmt::Formatter<'_>) -> stdfmt::Result {
        f.write_str(&self.sql)
    }
}
