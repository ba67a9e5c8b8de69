use serde::{Deserialize, Deserializer};

const ESC: &str = "\x1b[";

/// SGR codes for text styles
const STYLES: &[(&str, u8)] = &[
    ("normal", 0),
    ("bold", 1),
    ("dim", 2),
    ("italic", 3),
    ("underline", 4),
    ("inverse", 7),
    ("hidden", 8),
    ("strikethrough", 9),
];

/// SGR codes that undo a style, plus the shared text and background resets
const CLOSE: &[(&str, u8)] = &[
    ("normal", 0),
    ("bold", 22),
    ("dim", 22),
    ("italic", 23),
    ("underline", 24),
    ("inverse", 27),
    ("hidden", 28),
    ("strikethrough", 29),
    ("text", 39),
    ("background", 49),
];

/// SGR codes for foreground colors
const TEXTS: &[(&str, u8)] = &[
    ("black", 30),
    ("red", 31),
    ("green", 32),
    ("yellow", 33),
    ("blue", 34),
    ("magenta", 35),
    ("cyan", 36),
    ("lightgray", 37),
    ("lightgrey", 37),
    ("gray", 90),
    ("grey", 90),
    ("lightred", 91),
    ("lightgreen", 92),
    ("lightyellow", 93),
    ("lightblue", 94),
    ("lightmagenta", 95),
    ("lightcyan", 96),
    ("white", 97),
];

/// SGR codes for background colors. Note that gray and lightgray are swapped
/// relative to the text table.
const BACKGROUNDS: &[(&str, u8)] = &[
    ("black", 40),
    ("red", 41),
    ("green", 42),
    ("yellow", 43),
    ("blue", 44),
    ("magenta", 45),
    ("cyan", 46),
    ("gray", 47),
    ("grey", 47),
    ("lightgray", 100),
    ("lightgrey", 100),
    ("lightred", 101),
    ("lightgreen", 102),
    ("lightyellow", 103),
    ("lightblue", 104),
    ("lightmagenta", 105),
    ("lightcyan", 106),
    ("white", 107),
];

fn lookup(table: &[(&str, u8)], name: &str) -> Option<u8> {
    let name = name.to_lowercase();
    table
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, code)| *code)
}

/// A request for a text color, a background color and any number of styles.
///
/// Names are matched case-insensitively. Names missing from the palette are
/// ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorRequest {
    pub text: Option<String>,
    pub background: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub style: Option<Vec<String>>,
}

impl ColorRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, color: impl Into<String>) -> Self {
        self.text = Some(color.into());
        self
    }

    pub fn background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    /// Append a style; repeated calls keep their order.
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style.get_or_insert_with(Vec::new).push(style.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.background.is_none() && self.style.is_none()
    }

    /// Fill every field this request leaves unset from `base`.
    pub fn merged_over(self, base: &ColorRequest) -> ColorRequest {
        ColorRequest {
            text: self.text.or_else(|| base.text.clone()),
            background: self.background.or_else(|| base.background.clone()),
            style: self.style.or_else(|| base.style.clone()),
        }
    }
}

/// Accept either `style: bold` or `style: [bold, italic]`
fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => None,
        Some(OneOrMany::One(style)) => Some(vec![style]),
        Some(OneOrMany::Many(styles)) => Some(styles),
    })
}

/// Raw SGR codes collected while resolving a [`ColorRequest`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatCodes {
    pub opening: Vec<u8>,
    pub closing: Vec<u8>,
}

impl FormatCodes {
    /// Resolve styles, then background, then text color.
    pub fn resolve(request: &ColorRequest) -> Self {
        let mut codes = FormatCodes::default();
        if let Some(styles) = &request.style {
            codes.push_styles(styles);
        }
        if let Some(background) = &request.background {
            codes.push_background(background);
        }
        if let Some(text) = &request.text {
            codes.push_text(text);
        }
        codes
    }

    pub fn push_styles<S: AsRef<str>>(&mut self, styles: &[S]) {
        for style in styles {
            let style = style.as_ref();
            if let (Some(open), Some(close)) = (lookup(STYLES, style), lookup(CLOSE, style)) {
                self.opening.push(open);
                self.closing.push(close);
            }
        }
    }

    pub fn push_background(&mut self, background: &str) {
        if let Some(open) = lookup(BACKGROUNDS, background) {
            self.opening.push(open);
            self.closing.push(49);
        }
    }

    pub fn push_text(&mut self, text: &str) {
        if let Some(open) = lookup(TEXTS, text) {
            self.opening.push(open);
            self.closing.push(39);
        }
    }
}

fn escape(codes: &[u8]) -> String {
    let joined: Vec<String> = codes.iter().map(|code| code.to_string()).collect();
    format!("{}{}m", ESC, joined.join(";"))
}

/// Precomputed opening and closing escape sequences for one color request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Colors {
    opening: String,
    closing: String,
}

impl Colors {
    /// Build the escape sequences for `request`.
    ///
    /// With `use_colors` off both sequences are empty. With it on, a request
    /// that resolves to no codes still yields the bare `ESC[m`.
    pub fn new(request: &ColorRequest, use_colors: bool) -> Self {
        if !use_colors {
            return Self::plain();
        }
        let codes = FormatCodes::resolve(request);
        Colors {
            opening: escape(&codes.opening),
            closing: escape(&codes.closing),
        }
    }

    /// A formatter that leaves text untouched
    pub fn plain() -> Self {
        Colors {
            opening: String::new(),
            closing: String::new(),
        }
    }

    pub fn opening(&self) -> &str {
        &self.opening
    }

    pub fn closing(&self) -> &str {
        &self.closing
    }

    pub fn format(&self, text: &str) -> String {
        let mut out = String::with_capacity(self.opening.len() + text.len() + self.closing.len());
        out.push_str(&self.opening);
        out.push_str(text);
        out.push_str(&self.closing);
        out
    }
}
