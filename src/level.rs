use crate::error::ConsoleError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Severity of a console write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Log,
    Warn,
    Error,
    Debug,
    Verbose,
    /// What a terrible failure
    Wtf,
}

impl Level {
    pub const ALL: [Level; 6] = [
        Level::Log,
        Level::Warn,
        Level::Error,
        Level::Debug,
        Level::Verbose,
        Level::Wtf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Log => "log",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Debug => "debug",
            Level::Verbose => "verbose",
            Level::Wtf => "wtf",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Level {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "log" => Ok(Level::Log),
            "warn" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "debug" => Ok(Level::Debug),
            "verbose" => Ok(Level::Verbose),
            "wtf" => Ok(Level::Wtf),
            _ => Err(ConsoleError::UnknownLevel(s.to_string())),
        }
    }
}

/// Which of the two output streams a write ends up on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Primary,
    Error,
}

/// The console method a level is written through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Log,
    Warn,
    Error,
}

impl Primitive {
    /// `log` and `warn` go to the primary stream, `error` to the error stream
    pub fn stream(&self) -> StreamKind {
        match self {
            Primitive::Log | Primitive::Warn => StreamKind::Primary,
            Primitive::Error => StreamKind::Error,
        }
    }
}

/// Level → primitive routing table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleTypes {
    routes: HashMap<Level, Primitive>,
}

impl Default for ConsoleTypes {
    fn default() -> Self {
        let routes = HashMap::from([
            (Level::Debug, Primitive::Log),
            (Level::Error, Primitive::Error),
            (Level::Log, Primitive::Log),
            (Level::Verbose, Primitive::Log),
            (Level::Warn, Primitive::Warn),
            (Level::Wtf, Primitive::Error),
        ]);
        ConsoleTypes { routes }
    }
}

impl ConsoleTypes {
    pub fn primitive(&self, level: Level) -> Primitive {
        // Every level is seeded by Default and overrides only replace entries
        self.routes.get(&level).copied().unwrap_or(Primitive::Log)
    }

    pub fn set(&mut self, level: Level, primitive: Primitive) {
        self.routes.insert(level, primitive);
    }

    /// Apply overrides on top of the current table
    pub fn with_overrides(mut self, overrides: &HashMap<Level, Primitive>) -> Self {
        for (level, primitive) in overrides {
            self.set(*level, *primitive);
        }
        self
    }
}
