use indexmap::IndexMap;
use std::error::Error as StdError;

/// Anything a caller can hand to the console
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
    Error(ErrorValue),
}

/// An error captured for printing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
    pub name: String,
    pub message: String,
    pub stack: Option<String>,
}

impl ErrorValue {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorValue {
            name: name.into(),
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// `Name: message`, or just the name when the message is empty
    pub fn summary(&self) -> String {
        if self.message.is_empty() {
            self.name.clone()
        } else {
            format!("{}: {}", self.name, self.message)
        }
    }
}

impl Value {
    /// Capture a `std::error::Error` together with its chain of sources.
    pub fn error<E: StdError + ?Sized>(err: &E) -> Self {
        let name = short_type_name(std::any::type_name::<E>());
        let summary = ErrorValue::new(name, err.to_string()).summary();
        let mut stack = summary;
        let mut source = err.source();
        while let Some(cause) = source {
            stack.push_str("\n    caused by: ");
            stack.push_str(&cause.to_string());
            source = cause.source();
        }
        Value::Error(ErrorValue::new(name, err.to_string()).with_stack(stack))
    }

    pub fn object<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Whether the value counts as "present" when probing for a stack or message
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Error(_) => true,
        }
    }

    /// Plain string conversion, the way `String(value)` reads in a script
    pub fn to_plain_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Undefined | Value::Null => String::new(),
                    other => other.to_plain_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => "[object Object]".to_string(),
            Value::Error(err) => err.summary(),
        }
    }
}

/// Integral values print without a fraction, `-0` prints as `0`, and
/// magnitudes from `1e21` up or below `1e-6` use exponent notation
/// (`1e+21`, `1.5e-7`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let text = format!("{:e}", n);
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => text,
        }
    } else {
        n.to_string()
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<ErrorValue> for Value {
    fn from(err: ErrorValue) -> Self {
        Value::Error(err)
    }
}

impl From<&anyhow::Error> for Value {
    fn from(err: &anyhow::Error) -> Self {
        // `{:?}` on anyhow lists the cause chain under "Caused by:"
        let stack = format!("Error: {:?}", err);
        Value::Error(ErrorValue::new("Error", err.to_string()).with_stack(stack))
    }
}

impl From<anyhow::Error> for Value {
    fn from(err: anyhow::Error) -> Self {
        Value::from(&err)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// Build a `Vec<Value>` from mixed arguments: `values!["took", 42, "ms"]`
#[macro_export]
macro_rules! values {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::Value::from($value)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fmt;

    #[derive(Debug)]
    struct Outer(Inner);

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("request failed")
        }
    }

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("connection reset")
        }
    }

    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    impl StdError for Inner {}

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(-42.0), "-42");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_extreme_magnitudes_use_exponents() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e30), "-2.5e+30");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(123456789012345680000.0), "123456789012345680000");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn test_error_captures_source_chain() {
        let value = Value::error(&Outer(Inner));
        match value {
            Value::Error(err) => {
                assert_eq!(err.name, "Outer");
                assert_eq!(err.message, "request failed");
                assert_eq!(
                    err.stack.as_deref(),
                    Some("Outer: request failed\n    caused by: connection reset")
                );
            }
            other => panic!("expected error value, got {:?}", other),
        }
    }

    #[test]
    fn test_anyhow_error_keeps_context() {
        let err = anyhow::anyhow!("disk full").context("saving settings");
        let Value::Error(value) = Value::from(&err) else {
            panic!("expected error value");
        };
        assert_eq!(value.message, "saving settings");
        let stack = value.stack.unwrap();
        assert!(stack.starts_with("Error: saving settings"));
        assert!(stack.contains("disk full"));
    }

    #[test]
    fn test_from_json() {
        let value = Value::from(json!({"a": 1, "b": [true, null]}));
        let expected = Value::object([
            ("a", Value::Number(1.0)),
            ("b", Value::Array(vec![Value::Bool(true), Value::Null])),
        ]);
        assert_eq!(value, expected);
    }

    #[test]
    fn test_values_macro_mixes_types() {
        let args = crate::values!["took", 42, None::<i32>, vec!["a", "b"]];
        assert_eq!(
            args,
            vec![
                Value::from("took"),
                Value::Number(42.0),
                Value::Null,
                Value::Array(vec![Value::from("a"), Value::from("b")]),
            ]
        );
        assert!(crate::values![].is_empty());
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::from("").is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(Value::from("x").is_truthy());
        assert!(Value::Object(IndexMap::new()).is_truthy());
    }

    #[test]
    fn test_plain_string_of_containers() {
        let array = Value::Array(vec![Value::Number(1.0), Value::Null, Value::from("x")]);
        assert_eq!(array.to_plain_string(), "1,,x");
        assert_eq!(Value::object([("a", 1)]).to_plain_string(), "[object Object]");
    }
}
