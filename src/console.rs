use crate::colors::Colors;
use crate::config::{ColorSet, ConsoleOptions};
use crate::error::ConsoleError;
use crate::flatten::flatten;
use crate::level::{ConsoleTypes, Level, Primitive, StreamKind};
use crate::sink::Sink;
use crate::timestamp::Template;
use crate::value::Value;
use chrono::{DateTime, Local, Utc};
use std::collections::HashMap;
use std::io::{self, Write};

/// Source of the current time
pub type Clock = Box<dyn Fn() -> DateTime<Utc> + Send>;

/// Formatters for the parts of one level's output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelFormatters {
    pub time: Colors,
    pub message: Colors,
    /// Built from the options but never used when writing
    pub shard: Colors,
}

impl LevelFormatters {
    fn new(set: &ColorSet, use_colors: bool) -> Self {
        LevelFormatters {
            time: Colors::new(&set.time, use_colors),
            message: Colors::new(&set.message, use_colors),
            shard: Colors::new(&set.shard, use_colors),
        }
    }
}

/// Builds a [`Console`] from options plus the streams and clock it should use
pub struct ConsoleBuilder {
    options: ConsoleOptions,
    stdout: Option<Box<dyn Sink>>,
    stderr: Option<Box<dyn Sink>>,
    clock: Option<Clock>,
}

impl ConsoleBuilder {
    pub fn new(options: ConsoleOptions) -> Self {
        ConsoleBuilder {
            options,
            stdout: None,
            stderr: None,
            clock: None,
        }
    }

    /// Primary stream for log, warn, debug and verbose
    pub fn stdout(mut self, sink: impl Sink + 'static) -> Self {
        self.stdout = Some(Box::new(sink));
        self
    }

    /// Stream for error and wtf
    pub fn stderr(mut self, sink: impl Sink + 'static) -> Self {
        self.stderr = Some(Box::new(sink));
        self
    }

    pub fn clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn build(self) -> Console {
        let stdout = self.stdout.unwrap_or_else(|| Box::new(io::stdout()));
        let stderr = self.stderr.unwrap_or_else(|| Box::new(io::stderr()));
        let use_colors = self
            .options
            .use_color
            .unwrap_or_else(|| stdout.is_terminal());

        let formatters = Level::ALL
            .iter()
            .map(|level| {
                let set = self.options.colors.get(*level);
                (*level, LevelFormatters::new(set, use_colors))
            })
            .collect();

        Console {
            stdout,
            stderr,
            formatters,
            types: ConsoleTypes::default().with_overrides(&self.options.types),
            template: self.options.timestamps.template(),
            utc: self.options.utc,
            use_colors,
            clock: self.clock.unwrap_or_else(|| Box::new(Utc::now)),
        }
    }
}

/// Leveled, timestamped, colorized console writer
pub struct Console {
    stdout: Box<dyn Sink>,
    stderr: Box<dyn Sink>,
    formatters: HashMap<Level, LevelFormatters>,
    types: ConsoleTypes,
    template: Option<Template>,
    utc: bool,
    use_colors: bool,
    clock: Clock,
}

impl Console {
    /// A console on the process's stdout and stderr
    pub fn new(options: ConsoleOptions) -> Self {
        ConsoleBuilder::new(options).build()
    }

    pub fn builder(options: ConsoleOptions) -> ConsoleBuilder {
        ConsoleBuilder::new(options)
    }

    pub fn use_colors(&self) -> bool {
        self.use_colors
    }

    pub fn utc(&self) -> bool {
        self.utc
    }

    pub fn set_utc(&mut self, utc: bool) {
        self.utc = utc;
    }

    pub fn formatters(&self, level: Level) -> &LevelFormatters {
        &self.formatters[&level]
    }

    pub fn types(&self) -> &ConsoleTypes {
        &self.types
    }

    /// The current time rendered through the template, `None` when
    /// timestamps are off
    pub fn timestamp(&self) -> Option<String> {
        let template = self.template.as_ref()?;
        let now = (self.clock)();
        Some(if self.utc {
            template.display(&now)
        } else {
            template.display(&now.with_timezone(&Local))
        })
    }

    /// Write `values` at the level named `level` (case-insensitive).
    pub fn write(&mut self, values: &[Value], level: &str) -> Result<(), ConsoleError> {
        let level: Level = level.parse()?;
        self.write_level(values, level)
    }

    /// Every physical line of the output gets its own timestamp and colors.
    pub fn write_level(&mut self, values: &[Value], level: Level) -> Result<(), ConsoleError> {
        let content = values
            .iter()
            .map(|value| flatten(value, self.use_colors))
            .collect::<Vec<_>>()
            .join("\n");

        let formatters = self.formatters(level);
        let prefix = match self.timestamp() {
            Some(timestamp) => format!("{} ", formatters.time.format(&format!("[{}]", timestamp))),
            None => String::new(),
        };
        let text = content
            .split('\n')
            .map(|line| format!("{}{}", prefix, formatters.message.format(line)))
            .collect::<Vec<_>>()
            .join("\n");

        let primitive = self.types.primitive(level);
        self.dispatch(primitive, text)
    }

    fn dispatch(&mut self, primitive: Primitive, mut text: String) -> Result<(), ConsoleError> {
        text.push('\n');
        let stream = match primitive.stream() {
            StreamKind::Primary => &mut self.stdout,
            StreamKind::Error => &mut self.stderr,
        };
        stream.write_all(text.as_bytes())?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), ConsoleError> {
        self.stdout.flush()?;
        self.stderr.flush()?;
        Ok(())
    }

    pub fn log(&mut self, values: &[Value]) -> Result<(), ConsoleError> {
        self.write_level(values, Level::Log)
    }

    pub fn warn(&mut self, values: &[Value]) -> Result<(), ConsoleError> {
        self.write_level(values, Level::Warn)
    }

    pub fn error(&mut self, values: &[Value]) -> Result<(), ConsoleError> {
        self.write_level(values, Level::Error)
    }

    pub fn debug(&mut self, values: &[Value]) -> Result<(), ConsoleError> {
        self.write_level(values, Level::Debug)
    }

    pub fn verbose(&mut self, values: &[Value]) -> Result<(), ConsoleError> {
        self.write_level(values, Level::Verbose)
    }

    /// What a terrible failure
    pub fn wtf(&mut self, values: &[Value]) -> Result<(), ConsoleError> {
        self.write_level(values, Level::Wtf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use crate::timestamp::Timestamps;
    use crate::values;
    use chrono::TimeZone;

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 7, 14, 5, 9).unwrap()
    }

    fn capture(options: ConsoleOptions) -> (Console, MemorySink, MemorySink) {
        let stdout = MemorySink::new();
        let stderr = MemorySink::new();
        let console = Console::builder(options)
            .stdout(stdout.clone())
            .stderr(stderr.clone())
            .clock(fixed_clock)
            .build();
        (console, stdout, stderr)
    }

    fn plain() -> ConsoleOptions {
        ConsoleOptions {
            use_color: Some(false),
            timestamps: Timestamps::Off,
            ..ConsoleOptions::default()
        }
    }

    #[test]
    fn test_hello_world_plain() {
        let (mut console, stdout, stderr) = capture(plain());
        console.log(&values!["Hello, world!"]).unwrap();
        assert_eq!(stdout.contents(), "Hello, world!\n");
        assert_eq!(stderr.contents(), "");
    }

    #[test]
    fn test_utc_timestamp_prefix() {
        let (mut console, stdout, _) = capture(ConsoleOptions {
            use_color: Some(false),
            utc: true,
            ..ConsoleOptions::default()
        });
        console.log(&values!["ready"]).unwrap();
        assert_eq!(stdout.contents(), "[2024-03-07 14:05:09] ready\n");
    }

    #[test]
    fn test_every_line_gets_a_prefix() {
        let (mut console, stdout, _) = capture(ConsoleOptions {
            use_color: Some(false),
            utc: true,
            timestamps: Timestamps::Custom("HH:mm".to_string()),
            ..ConsoleOptions::default()
        });
        console.log(&values!["first\nsecond", "third"]).unwrap();
        assert_eq!(
            stdout.lines(),
            vec!["[14:05] first", "[14:05] second", "[14:05] third"]
        );
    }

    #[test]
    fn test_colored_log_line() {
        let (mut console, stdout, _) = capture(ConsoleOptions {
            use_color: Some(true),
            utc: true,
            ..ConsoleOptions::default()
        });
        console.log(&values!["hi"]).unwrap();
        assert_eq!(
            stdout.contents(),
            "\x1b[44m[2024-03-07 14:05:09]\x1b[49m \x1b[mhi\x1b[m\n"
        );
    }

    #[test]
    fn test_wtf_colors_message_red_on_error_stream() {
        let (mut console, stdout, stderr) = capture(ConsoleOptions {
            use_color: Some(true),
            timestamps: Timestamps::Off,
            ..ConsoleOptions::default()
        });
        console.wtf(&values!["uh oh"]).unwrap();
        assert_eq!(stdout.contents(), "");
        assert_eq!(stderr.contents(), "\x1b[31muh oh\x1b[39m\n");
    }

    #[test]
    fn test_levels_route_to_streams() {
        let (mut console, stdout, stderr) = capture(plain());
        console.log(&values!["log"]).unwrap();
        console.warn(&values!["warn"]).unwrap();
        console.error(&values!["error"]).unwrap();
        console.debug(&values!["debug"]).unwrap();
        console.verbose(&values!["verbose"]).unwrap();
        console.wtf(&values!["wtf"]).unwrap();
        assert_eq!(stdout.lines(), vec!["log", "warn", "debug", "verbose"]);
        assert_eq!(stderr.lines(), vec!["error", "wtf"]);
    }

    #[test]
    fn test_type_overrides_reroute() {
        let mut options = plain();
        options.types.insert(Level::Debug, Primitive::Error);
        let (mut console, stdout, stderr) = capture(options);
        console.debug(&values!["moved"]).unwrap();
        assert_eq!(stdout.contents(), "");
        assert_eq!(stderr.contents(), "moved\n");
    }

    #[test]
    fn test_write_by_name_is_case_insensitive() {
        let (mut console, stdout, _) = capture(plain());
        console.write(&values!["shout"], "WARN").unwrap();
        assert_eq!(stdout.contents(), "shout\n");
    }

    #[test]
    fn test_unknown_level_writes_nothing() {
        let (mut console, stdout, stderr) = capture(plain());
        let err = console.write(&values!["lost"], "info").unwrap_err();
        assert!(matches!(err, ConsoleError::UnknownLevel(_)));
        assert_eq!(stdout.contents(), "");
        assert_eq!(stderr.contents(), "");
    }

    #[test]
    fn test_mixed_values() {
        let (mut console, stdout, _) = capture(plain());
        console
            .log(&[
                Value::from(1),
                Value::Null,
                Value::Undefined,
                Value::from(vec!["a", "b"]),
                Value::object([("a", 1)]),
            ])
            .unwrap();
        assert_eq!(
            stdout.lines(),
            vec!["1", "null", "undefined", "a", "b", "{ a: 1 }"]
        );
    }

    #[test]
    fn test_empty_call_writes_one_line() {
        let (mut console, stdout, _) = capture(plain());
        console.log(&[]).unwrap();
        assert_eq!(stdout.contents(), "\n");
    }

    #[test]
    fn test_color_follows_primary_stream_when_unset() {
        let build = |stdout: MemorySink| {
            Console::builder(ConsoleOptions::default())
                .stdout(stdout)
                .stderr(MemorySink::new())
                .build()
        };
        assert!(build(MemorySink::terminal()).use_colors());
        assert!(!build(MemorySink::new()).use_colors());
    }

    #[test]
    fn test_timestamp_honors_utc_toggle() {
        let (mut console, _, _) = capture(ConsoleOptions {
            timestamps: Timestamps::Custom("HH:mm:ss".to_string()),
            ..plain()
        });
        console.set_utc(true);
        assert_eq!(console.timestamp().as_deref(), Some("14:05:09"));
        console.set_utc(false);
        let local = fixed_clock().with_timezone(&Local).format("%H:%M:%S").to_string();
        assert_eq!(console.timestamp(), Some(local));

        let (off, _, _) = capture(plain());
        assert!(off.timestamp().is_none());
    }

    #[test]
    fn test_shard_formatter_is_built() {
        let (console, _, _) = capture(ConsoleOptions {
            use_color: Some(true),
            ..ConsoleOptions::default()
        });
        assert_eq!(console.formatters(Level::Log).shard.opening(), "\x1b[46;30m");
    }

    #[test]
    fn test_unclosed_bracket_in_template_is_printed() {
        let (mut console, stdout, _) = capture(ConsoleOptions {
            timestamps: Timestamps::Custom("[HH".to_string()),
            utc: true,
            ..plain()
        });
        console.log(&values!["up"]).unwrap();
        assert_eq!(stdout.contents(), "[[14] up\n");
    }
}
