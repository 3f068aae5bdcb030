use super::{ParamStyle, Serializer};

use compositekey_core::{driver::Capability, Error, Result, Schema};

use serde::Deserialize;
use std::str::FromStr;

/// SQL dialect family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    Postgresql,
    Sqlite,
    Mysql,
}

impl Flavor {
    pub fn quote_name(self, name: &str) -> String {
        match self {
            Flavor::Mysql => {
                if name.starts_with('`') && name.ends_with('`') {
                    name.to_string()
                } else {
                    format!("`{name}`")
                }
            }
            _ => {
                if name.starts_with('"') && name.ends_with('"') {
                    name.to_string()
                } else {
                    format!("\"{name}\"")
                }
            }
        }
    }

    /// Token inserting the database-generated primary key value.
    pub fn pk_default_value(self) -> &'static str {
        match self {
            Flavor::Sqlite => "NULL",
            _ => "DEFAULT",
        }
    }

    pub fn default_param_style(self) -> ParamStyle {
        match self {
            Flavor::Postgresql => ParamStyle::Numeric,
            Flavor::Mysql => ParamStyle::Qmark,
            Flavor::Sqlite => ParamStyle::NumberedQmark,
        }
    }

    pub fn default_capability(self) -> Capability {
        match self {
            Flavor::Postgresql => Capability::POSTGRESQL,
            Flavor::Mysql => Capability::MYSQL,
            Flavor::Sqlite => Capability::SQLITE,
        }
    }

    /// Hook adjusting per-row placeholders and parameters of a non-bulk
    /// INSERT. Every supported flavor leaves them untouched.
    pub fn modify_insert_params<T>(self, rows: Vec<T>) -> Vec<T> {
        rows
    }

    pub fn is_sqlite(self) -> bool {
        matches!(self, Flavor::Sqlite)
    }

    pub fn is_mysql(self) -> bool {
        matches!(self, Flavor::Mysql)
    }
}

impl FromStr for Flavor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Flavor> {
        match s {
            "postgresql" | "postgres" => Ok(Flavor::Postgresql),
            "mysql" => Ok(Flavor::Mysql),
            "sqlite" => Ok(Flavor::Sqlite),
            _ => Err(Error::invalid_config(format!("unknown SQL flavor `{s}`"))),
        }
    }
}

impl<'a> Serializer<'a> {
    pub fn sqlite(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, Flavor::Sqlite)
    }

    pub fn postgresql(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, Flavor::Postgresql)
    }

    pub fn mysql(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, Flavor::Mysql)
    }
}
