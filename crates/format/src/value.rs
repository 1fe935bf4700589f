use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};

/// A loggable value, modeled as a closed tagged union.
///
/// Composite variants own their children, so plain trees cannot alias.
/// Shared or cyclic structure is expressed explicitly through
/// [`LogValue::Shared`], an alias node the serializer tracks for cycle
/// protection.
#[derive(Debug, Clone)]
pub enum LogValue {
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    BigInt(i128),
    Str(String),
    Symbol(String),
    /// A script function, carried as its source or display text.
    Function(String),
    Error {
        message: String,
        stack: Option<String>,
    },
    Date(DateTime<Utc>),
    /// A DOM element, carried as its outer markup.
    Html(String),
    Regex(String),
    Map(Vec<(LogValue, LogValue)>),
    Set(Vec<LogValue>),
    Array(Vec<LogValue>),
    Object(Vec<(String, LogValue)>),
    /// An aliasable node; the only way shared/cyclic structure can occur.
    Shared(Rc<RefCell<LogValue>>),
}

impl LogValue {
    /// Wraps a value in a new aliasable node.
    pub fn shared(value: LogValue) -> Rc<RefCell<LogValue>> {
        Rc::new(RefCell::new(value))
    }

    /// The value's primitive type name, used in serialization-failure
    /// placeholders.
    pub fn type_name(&self) -> &'static str {
        match self {
            LogValue::Undefined => "undefined",
            LogValue::Bool(_) => "boolean",
            LogValue::Int(_) | LogValue::Float(_) => "number",
            LogValue::BigInt(_) => "bigint",
            LogValue::Str(_) => "string",
            LogValue::Symbol(_) => "symbol",
            LogValue::Function(_) => "function",
            _ => "object",
        }
    }
}

impl From<&str> for LogValue {
    fn from(s: &str) -> Self {
        LogValue::Str(s.to_owned())
    }
}

impl From<String> for LogValue {
    fn from(s: String) -> Self {
        LogValue::Str(s)
    }
}

impl From<bool> for LogValue {
    fn from(b: bool) -> Self {
        LogValue::Bool(b)
    }
}

impl From<i32> for LogValue {
    fn from(n: i32) -> Self {
        LogValue::Int(n.into())
    }
}

impl From<i64> for LogValue {
    fn from(n: i64) -> Self {
        LogValue::Int(n)
    }
}

impl From<f64> for LogValue {
    fn from(n: f64) -> Self {
        LogValue::Float(n)
    }
}

impl From<DateTime<Utc>> for LogValue {
    fn from(d: DateTime<Utc>) -> Self {
        LogValue::Date(d)
    }
}

impl From<serde_json::Value> for LogValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => LogValue::Null,
            serde_json::Value::Bool(b) => LogValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => LogValue::Int(i),
                None => LogValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => LogValue::Str(s),
            serde_json::Value::Array(items) => {
                LogValue::Array(items.into_iter().map(LogValue::from).collect())
            }
            serde_json::Value::Object(fields) => LogValue::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, LogValue::from(v)))
                    .collect(),
            ),
        }
    }
}
