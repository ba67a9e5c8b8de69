//! Route records from the `log` crate through a [`Console`]

use crate::console::Console;
use crate::level::Level;
use crate::value::Value;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::sync::{Mutex, MutexGuard};

pub struct ConsoleLogger {
    console: Mutex<Console>,
    max_level: LevelFilter,
}

impl ConsoleLogger {
    pub fn new(console: Console, max_level: LevelFilter) -> Self {
        ConsoleLogger {
            console: Mutex::new(console),
            max_level,
        }
    }

    /// Install as the global logger
    pub fn init(self) -> Result<(), SetLoggerError> {
        log::set_max_level(self.max_level);
        log::set_boxed_logger(Box::new(self))
    }

    fn lock(&self) -> MutexGuard<'_, Console> {
        self.console.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// error → error, warn → warn, info → log, debug → debug, trace → verbose
pub fn console_level(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::Error,
        log::Level::Warn => Level::Warn,
        log::Level::Info => Level::Log,
        log::Level::Debug => Level::Debug,
        log::Level::Trace => Level::Verbose,
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = Value::from(record.args().to_string());
        // A logger has nowhere to report its own write failures
        let _ = self
            .lock()
            .write_level(&[message], console_level(record.level()));
    }

    fn flush(&self) {
        let _ = self.lock().flush();
    }
}
