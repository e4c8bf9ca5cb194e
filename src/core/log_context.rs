//! Structured key-value fields attached to records
//!
//! Both the caller-supplied `context` and the processor-populated `extra`
//! of a [`LogRecord`](super::record::LogRecord) use [`LogContext`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A single context value.
///
/// Serialized untagged, so a context looks like a plain JSON object on the
/// wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// JSON form used when records are shipped; non-finite floats become `null`
    #[must_use]
    pub fn to_json_value(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Int(i) => Value::from(*i),
            FieldValue::Float(f) => {
                serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number)
            }
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::List(items) => items.iter().map(FieldValue::to_json_value).collect(),
        }
    }
}

/// Placeholder text: strings are inserted bare, lists as `[a, b]`
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Bool(b) => fmt::Display::fmt(b, f),
            FieldValue::Int(i) => fmt::Display::fmt(i, f),
            FieldValue::Float(x) => fmt::Display::fmt(x, f),
            FieldValue::String(s) => f.write_str(s),
            FieldValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(item, f)?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! field_value_from {
    ($variant:ident: $($ty:ty),+) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::$variant(value.into())
                }
            }
        )+
    };
}

field_value_from!(Bool: bool);
field_value_from!(Int: i64, i32, u32, u16, u8);
field_value_from!(Float: f64, f32);
field_value_from!(String: String, &str);

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// Ordered key-value fields; insertion order is kept in output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogContext {
    fields: IndexMap<String, FieldValue>,
}

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.add_field(key, value);
        self
    }

    /// Set `key`, replacing a previous value in place
    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &IndexMap<String, FieldValue> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `key=value` pairs separated by spaces, as printed by the console handler
    pub fn format_fields(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.fields {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(key);
            out.push('=');
            out.push_str(&value.to_string());
        }
        out
    }

    pub fn to_json_value(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json_value()))
                .collect(),
        )
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_fields())
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for LogContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut context = Self::new();
        for (key, value) in iter {
            context.add_field(key, value);
        }
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_keep_insertion_order() {
        let context = LogContext::new()
            .with_field("zeta", 1)
            .with_field("alpha", "two")
            .with_field("ok", true);

        assert_eq!(context.format_fields(), "zeta=1 alpha=two ok=true");
        assert_eq!(
            context.to_json_value().to_string(),
            r#"{"zeta":1,"alpha":"two","ok":true}"#
        );
    }

    #[test]
    fn test_replacing_a_field_keeps_its_position() {
        let mut context: LogContext = [("a", 1), ("b", 2)].into_iter().collect();
        context.add_field("a", "one");

        assert_eq!(context.format_fields(), "a=one b=2");
        assert_eq!(context.len(), 2);
    }

    #[test]
    fn test_list_and_missing_values() {
        let value: FieldValue = vec!["a", "b"].into();
        assert_eq!(value.to_string(), "[a, b]");
        assert_eq!(value.to_json_value(), serde_json::json!(["a", "b"]));

        assert_eq!(FieldValue::from(None::<i64>), FieldValue::Null);
        assert_eq!(FieldValue::from(f64::NAN).to_json_value(), Value::Null);
    }
}
