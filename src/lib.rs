// src/lib.rs
pub mod colors;
pub mod config;
pub mod console;
pub mod error;
pub mod flatten;
pub mod inspect;
pub mod level;
pub mod logger;
pub mod sink;
pub mod timestamp;
pub mod value;

pub use error::*;

pub use colors::{ColorRequest, Colors, FormatCodes};
pub use config::{ColorSet, ConsoleOptions, LevelColors};
pub use console::{Console, ConsoleBuilder, LevelFormatters};
pub use flatten::flatten;
pub use level::{ConsoleTypes, Level, Primitive, StreamKind};
pub use logger::ConsoleLogger;
pub use sink::{MemorySink, Sink};
pub use timestamp::{Template, Timestamps};
pub use value::{ErrorValue, Value};
