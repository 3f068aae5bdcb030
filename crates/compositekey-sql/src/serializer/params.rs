use super::{Formatter, ToSql};

use compositekey_core::stmt::Value;

use serde::Deserialize;
use std::fmt::Write;

/// Collects bound parameters in the order their placeholders are written.
pub trait Params {
    fn push(&mut self, param: &Value) -> Placeholder;
}

/// 1-based position of a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder(pub usize);

/// How parameter markers are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamStyle {
    /// `%s`
    Format,

    /// `?`
    Qmark,

    /// `$1`, `$2`, ...
    Numeric,

    /// `?1`, `?2`, ...
    NumberedQmark,
}

impl Params for Vec<Value> {
    fn push(&mut self, value: &Value) -> Placeholder {
        self.push(value.clone());
        Placeholder(self.len())
    }
}

impl ToSql for Placeholder {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let _ = match f.style {
            ParamStyle::Format => write!(f.dst, "%s"),
            ParamStyle::Qmark => write!(f.dst, "?"),
            ParamStyle::Numeric => write!(f.dst, "${}", self.0),
            ParamStyle::NumberedQmark => write!(f.dst, "?{}", self.0),
        };
    }
}
