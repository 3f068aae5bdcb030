#[macro_use]
pub mod serializer;
pub use serializer::{
    CompiledStatement, Context, Flavor, Formatter, ParamStyle, Params, Placeholder, Serializer,
};

pub mod compiler;
pub use compiler::{
    ColumnOptions, CompositeKeyAwareCompiler, DefaultColumns, DefaultCompiler, InRhs,
    ResolvedPath, StatementCompiler,
};

mod install;
pub use install::{install, is_installed};
