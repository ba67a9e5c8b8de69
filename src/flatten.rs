//! Reduce any console argument to printable text

use crate::inspect::{inspect, InspectOptions};
use crate::value::Value;

/// Flatten a value into the text the console prints for it.
///
/// Checked in order:
/// - undefined, null and numbers → their literal text
/// - strings → unchanged
/// - arrays of strings only → one element per line
/// - anything with a truthy stack, else a truthy message → that
/// - other arrays and objects → an inspection dump (arrays one level deep)
/// - everything else → plain string conversion
pub fn flatten(value: &Value, use_colors: bool) -> String {
    match value {
        Value::Undefined | Value::Null | Value::Number(_) => value.to_plain_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .map(Value::to_plain_string)
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Array(_) => inspect(
            value,
            InspectOptions {
                depth: 1,
                colors: use_colors,
            },
        ),
        Value::Object(map) => ["stack", "message"]
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|probe| probe.is_truthy())
            .map(Value::to_plain_string)
            .unwrap_or_else(|| {
                inspect(
                    value,
                    InspectOptions {
                        depth: 0,
                        colors: use_colors,
                    },
                )
            }),
        Value::Error(err) => match (&err.stack, err.message.as_str()) {
            (Some(stack), _) if !stack.is_empty() => stack.clone(),
            (_, message) if !message.is_empty() => message.to_string(),
            _ => inspect(
                value,
                InspectOptions {
                    depth: 0,
                    colors: use_colors,
                },
            ),
        },
        Value::Bool(_) => value.to_plain_string(),
    }
}
