//! Composite primary and foreign keys for SQL statement compilation.
//!
//! Call [`install`] once at startup to compile every statement with
//! [`CompositeKeyAwareCompiler`], or choose a compiler per serializer through
//! [`Config`] / [`Builder`].

mod builder;
pub use builder::Builder;

mod config;
pub use config::Config;

mod executor;
pub use executor::Executor;

pub use compositekey_core::{
    bail,
    driver::{self, Capability, Connection},
    err, schema,
    stmt::{self, CompositeKey, Value},
    Error, Result, Schema,
};

pub use compositekey_sql::{
    install, is_installed, CompiledStatement, CompositeKeyAwareCompiler, DefaultCompiler, Flavor,
    ParamStyle, Serializer, StatementCompiler,
};
