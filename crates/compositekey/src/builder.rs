use crate::Config;

use compositekey_core::{driver::Capability, Result, Schema};
use compositekey_sql::{ParamStyle, Serializer};

/// Fluent construction of a [`Serializer`].
#[derive(Debug, Default)]
pub struct Builder {
    config: Config,

    /// Overrides the flavor's default capabilities
    capability: Option<Capability>,
}

impl Builder {
    pub fn flavor(&mut self, flavor: &str) -> &mut Self {
        self.config.flavor = flavor.to_string();
        self
    }

    pub fn composite_keys(&mut self, enabled: bool) -> &mut Self {
        self.config.composite_keys = Some(enabled);
        self
    }

    pub fn param_style(&mut self, style: ParamStyle) -> &mut Self {
        self.config.param_style = Some(style);
        self
    }

    pub fn capability(&mut self, capability: Capability) -> &mut Self {
        self.capability = Some(capability);
        self
    }

    pub fn build<'a>(&self, schema: &'a Schema) -> Result<Serializer<'a>> {
        let serializer = self.config.serializer(schema)?;

        Ok(match &self.capability {
            Some(capability) => serializer.with_capability(capability.clone()),
            None => serializer,
        })
    }
}

impl From<Config> for Builder {
    fn from(config: Config) -> Self {
        Builder {
            config,
            capability: None,
        }
    }
}
