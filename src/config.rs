use crate::colors::ColorRequest;
use crate::error::ConfigError;
use crate::level::{Level, Primitive};
use crate::timestamp::Timestamps;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Options for building a console
///
/// Everything here can come from a YAML or JSON file. Fields that are left
/// out keep their defaults, and per-level colors are merged field by field
/// over the default palette.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleOptions {
    /// Force colors on or off; `None` asks the primary stream
    #[serde(alias = "useColor")]
    pub use_color: Option<bool>,
    pub timestamps: Timestamps,
    pub utc: bool,
    pub colors: LevelColors,
    /// Overrides of the level → primitive routing
    pub types: HashMap<Level, Primitive>,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        ConsoleOptions {
            use_color: None,
            timestamps: Timestamps::Default,
            utc: false,
            colors: LevelColors::default(),
            types: HashMap::new(),
        }
    }
}

impl ConsoleOptions {
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&source)
    }
}

/// Color requests for the parts of one level's output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorSet {
    pub time: ColorRequest,
    pub message: ColorRequest,
    /// Configurable but not used when writing
    pub shard: ColorRequest,
}

impl ColorSet {
    fn base() -> Self {
        ColorSet {
            time: ColorRequest::new(),
            message: ColorRequest::new(),
            shard: ColorRequest::new().background("cyan").text("black"),
        }
    }

    fn with_time(mut self, time: ColorRequest) -> Self {
        self.time = time;
        self
    }

    fn with_message(mut self, message: ColorRequest) -> Self {
        self.message = message;
        self
    }

    fn merge(self, overrides: ColorSetOverrides) -> Self {
        let merge = |over: Option<ColorRequest>, base: ColorRequest| match over {
            Some(request) => request.merged_over(&base),
            None => base,
        };
        ColorSet {
            time: merge(overrides.time, self.time),
            message: merge(overrides.message, self.message),
            shard: merge(overrides.shard, self.shard),
        }
    }
}

/// The part of a [`ColorSet`] a config file spells out
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorSetOverrides {
    pub time: Option<ColorRequest>,
    pub message: Option<ColorRequest>,
    pub shard: Option<ColorRequest>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct LevelColorOverrides(pub HashMap<Level, ColorSetOverrides>);

/// One [`ColorSet`] per level
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "LevelColorOverrides")]
pub struct LevelColors {
    pub debug: ColorSet,
    pub error: ColorSet,
    pub log: ColorSet,
    pub verbose: ColorSet,
    pub warn: ColorSet,
    pub wtf: ColorSet,
}

impl Default for LevelColors {
    fn default() -> Self {
        LevelColors {
            debug: ColorSet::base().with_time(ColorRequest::new().background("magenta")),
            error: ColorSet::base().with_time(ColorRequest::new().background("red")),
            log: ColorSet::base().with_time(ColorRequest::new().background("blue")),
            verbose: ColorSet::base().with_time(ColorRequest::new().text("gray")),
            warn: ColorSet::base()
                .with_time(ColorRequest::new().background("lightyellow").text("black")),
            wtf: ColorSet::base()
                .with_message(ColorRequest::new().text("red"))
                .with_time(ColorRequest::new().background("red")),
        }
    }
}

impl LevelColors {
    pub fn get(&self, level: Level) -> &ColorSet {
        match level {
            Level::Debug => &self.debug,
            Level::Error => &self.error,
            Level::Log => &self.log,
            Level::Verbose => &self.verbose,
            Level::Warn => &self.warn,
            Level::Wtf => &self.wtf,
        }
    }

    pub fn get_mut(&mut self, level: Level) -> &mut ColorSet {
        match level {
            Level::Debug => &mut self.debug,
            Level::Error => &mut self.error,
            Level::Log => &mut self.log,
            Level::Verbose => &mut self.verbose,
            Level::Warn => &mut self.warn,
            Level::Wtf => &mut self.wtf,
        }
    }
}

impl From<LevelColorOverrides> for LevelColors {
    fn from(overrides: LevelColorOverrides) -> Self {
        let mut colors = LevelColors::default();
        for (level, set) in overrides.0 {
            let merged = colors.get(level).clone().merge(set);
            *colors.get_mut(level) = merged;
        }
        colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_stock_palette() {
        let options = ConsoleOptions::default();
        assert_eq!(options.timestamps, Timestamps::Default);
        assert!(!options.utc);
        assert!(options.use_color.is_none());

        let warn = &options.colors.warn;
        assert_eq!(warn.time.background.as_deref(), Some("lightyellow"));
        assert_eq!(warn.time.text.as_deref(), Some("black"));
        assert!(warn.message.is_empty());
        assert_eq!(warn.shard.background.as_deref(), Some("cyan"));

        let wtf = &options.colors.wtf;
        assert_eq!(wtf.message.text.as_deref(), Some("red"));
        assert_eq!(wtf.time.background.as_deref(), Some("red"));

        assert_eq!(options.colors.verbose.time.text.as_deref(), Some("gray"));
        assert_eq!(options.colors.debug.time.background.as_deref(), Some("magenta"));
    }

    #[test]
    fn test_empty_document_is_default() {
        let options = ConsoleOptions::from_yaml_str("{}").unwrap();
        assert_eq!(options, ConsoleOptions::default());
    }

    #[test]
    fn test_level_colors_merge_over_defaults() {
        let options = ConsoleOptions::from_yaml_str(
            r#"
colors:
  log:
    time: { text: white }
    message: { style: [bold, underline] }
"#,
        )
        .unwrap();

        let log = &options.colors.log;
        assert_eq!(log.time.background.as_deref(), Some("blue"));
        assert_eq!(log.time.text.as_deref(), Some("white"));
        assert_eq!(
            log.message.style,
            Some(vec!["bold".to_string(), "underline".to_string()])
        );
        assert_eq!(log.shard, ColorSet::base().shard);
        assert_eq!(options.colors.error, LevelColors::default().error);
    }

    #[test]
    fn test_json_options_with_camel_case_keys() {
        let options = ConsoleOptions::from_yaml_str(
            r#"{"useColor": false, "timestamps": "HH:mm", "utc": true, "types": {"debug": "error"}}"#,
        )
        .unwrap();
        assert_eq!(options.use_color, Some(false));
        assert_eq!(options.timestamps, Timestamps::Custom("HH:mm".to_string()));
        assert!(options.utc);
        assert_eq!(options.types.get(&Level::Debug), Some(&Primitive::Error));
    }

    #[test]
    fn test_unknown_level_in_colors_is_rejected() {
        let err = ConsoleOptions::from_yaml_str("colors: { info: { time: { text: red } } }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_primitive_in_types_is_rejected() {
        let err = ConsoleOptions::from_yaml_str("types: { debug: info }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = ConsoleOptions::from_file(Path::new("/nonexistent/console.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/console.yaml"));
    }
}
