//! Human-readable dumps of arrays and objects

use crate::colors::{ColorRequest, Colors};
use crate::value::{format_number, Value};
use once_cell::sync::Lazy;
use regex::Regex;

const BREAK_LENGTH: usize = 80;
const MAX_ARRAY_LENGTH: usize = 100;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z_0-9]*$").unwrap());
static ANSI_ESCAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectOptions {
    /// How many levels of nesting to expand below the top-level value
    pub depth: usize,
    pub colors: bool,
}

/// Per-kind formatters used while dumping
struct Palette {
    number: Colors,
    string: Colors,
    null: Colors,
    undefined: Colors,
    special: Colors,
}

impl Palette {
    fn new(use_colors: bool) -> Self {
        let colors = |request: ColorRequest| Colors::new(&request, use_colors);
        Palette {
            number: colors(ColorRequest::new().text("yellow")),
            string: colors(ColorRequest::new().text("green")),
            null: colors(ColorRequest::new().style("bold")),
            undefined: colors(ColorRequest::new().text("gray")),
            special: colors(ColorRequest::new().text("cyan")),
        }
    }
}

pub fn inspect(value: &Value, options: InspectOptions) -> String {
    let inspector = Inspector {
        depth: options.depth,
        palette: Palette::new(options.colors),
    };
    inspector.format_value(value, 0, 0)
}

struct Inspector {
    depth: usize,
    palette: Palette,
}

impl Inspector {
    fn format_value(&self, value: &Value, recurse_times: usize, indent: usize) -> String {
        match value {
            Value::Undefined => self.palette.undefined.format("undefined"),
            Value::Null => self.palette.null.format("null"),
            Value::Bool(b) => self.palette.number.format(&b.to_string()),
            Value::Number(n) => self.palette.number.format(&format_number(*n)),
            Value::String(s) => self.palette.string.format(&quote(s)),
            Value::Error(err) => {
                let text = match &err.stack {
                    Some(stack) if !stack.is_empty() => stack.clone(),
                    _ => format!("[{}]", err.summary()),
                };
                indent_continuation_lines(&text, indent)
            }
            Value::Array(items) => {
                if items.is_empty() {
                    return "[]".to_string();
                }
                if recurse_times > self.depth {
                    return self.palette.special.format("[Array]");
                }
                let mut entries: Vec<String> = items
                    .iter()
                    .take(MAX_ARRAY_LENGTH)
                    .map(|item| self.format_value(item, recurse_times + 1, indent + 2))
                    .collect();
                if items.len() > MAX_ARRAY_LENGTH {
                    let remaining = items.len() - MAX_ARRAY_LENGTH;
                    let plural = if remaining > 1 { "s" } else { "" };
                    entries.push(format!("... {} more item{}", remaining, plural));
                }
                reduce_to_single_string(entries, "[", "]", indent)
            }
            Value::Object(map) => {
                if map.is_empty() {
                    return "{}".to_string();
                }
                if recurse_times > self.depth {
                    return self.palette.special.format("[Object]");
                }
                let entries: Vec<String> = map
                    .iter()
                    .map(|(key, item)| {
                        format!(
                            "{}: {}",
                            self.format_key(key),
                            self.format_value(item, recurse_times + 1, indent + 2)
                        )
                    })
                    .collect();
                reduce_to_single_string(entries, "{", "}", indent)
            }
        }
    }

    fn format_key(&self, key: &str) -> String {
        if IDENTIFIER.is_match(key) {
            key.to_string()
        } else {
            self.palette.string.format(&quote(key))
        }
    }
}

/// Put entries on one line when they fit in the break length, otherwise one
/// entry per indented line.
fn reduce_to_single_string(entries: Vec<String>, open: &str, close: &str, indent: usize) -> String {
    if entries.is_empty() {
        return format!("{}{}", open, close);
    }

    let start = entries.len() + indent + open.len() + 10;
    let separators = entries.len() + start;
    let total = separators + entries.iter().map(|entry| visible_len(entry)).sum::<usize>();
    if separators + entries.len() <= BREAK_LENGTH && total <= BREAK_LENGTH {
        let joined = entries.join(", ");
        if !joined.contains('\n') {
            return format!("{} {} {}", open, joined, close);
        }
    }

    let indentation = format!("\n{}", " ".repeat(indent));
    format!(
        "{}{}  {}{}{}",
        open,
        indentation,
        entries.join(&format!(",{}  ", indentation)),
        indentation,
        close
    )
}

fn visible_len(text: &str) -> usize {
    ANSI_ESCAPE.replace_all(text, "").chars().count()
}

fn indent_continuation_lines(text: &str, indent: usize) -> String {
    if indent == 0 {
        return text.to_string();
    }
    let padding = " ".repeat(indent);
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line.to_string()
            } else {
                format!("{}{}", padding, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Quote with `'`, falling back to `"` or a backtick to avoid escaping.
fn quote(s: &str) -> String {
    let quote = if !s.contains('\'') {
        '\''
    } else if !s.contains('"') {
        '"'
    } else if !s.contains('`') && !s.contains("${") {
        '`'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\\' => out.push_str("\\\\"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
