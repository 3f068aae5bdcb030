use crate::Builder;

use compositekey_core::{Result, Schema};
use compositekey_sql::{
    CompositeKeyAwareCompiler, DefaultCompiler, Flavor, ParamStyle, Serializer,
};

use serde::Deserialize;

/// Serializer settings, typically deserialized from an application's
/// configuration file.
///
/// ```toml
/// flavor = "mysql"
/// composite_keys = true
/// param_style = "format"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// `postgresql`, `mysql` or `sqlite`
    pub flavor: String,

    /// Force a compiler. Unset follows [`install`](crate::install).
    pub composite_keys: Option<bool>,

    /// Overrides the flavor's parameter style
    pub param_style: Option<ParamStyle>,
}

impl Config {
    pub fn builder(self) -> Builder {
        Builder::from(self)
    }

    pub fn flavor(&self) -> Result<Flavor> {
        self.flavor.parse()
    }

    pub fn serializer<'a>(&self, schema: &'a Schema) -> Result<Serializer<'a>> {
        let mut serializer = Serializer::new(schema, self.flavor()?);

        serializer = match self.composite_keys {
            Some(true) => serializer.with_compiler(CompositeKeyAwareCompiler),
            Some(false) => serializer.with_compiler(DefaultCompiler),
            None => serializer,
        };

        if let Some(style) = self.param_style {
            serializer = serializer.with_param_style(style);
        }

        Ok(serializer)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            flavor: "postgresql".to_string(),
            composite_keys: None,
            param_style: None,
        }
    }
}
