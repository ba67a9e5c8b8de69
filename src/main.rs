use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead};
use std::path::PathBuf;

use klasa_console::{Console, ConsoleOptions, Level, Timestamps, Value};

#[derive(Parser)]
#[command(name = "klasa-console")]
#[command(about = "Print leveled, timestamped, colorized console lines")]
#[command(version)]
struct Args {
    /// Messages to print, one value each (default: lines from stdin)
    #[arg(value_name = "MESSAGE")]
    messages: Vec<String>,

    /// Severity to write at
    #[arg(short = 'l', long, value_enum, default_value = "log")]
    level: Level,

    /// Options file (YAML or JSON)
    #[arg(short = 'c', long = "config")]
    config_file: Option<PathBuf>,

    /// Force colored output
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Leave out timestamps
    #[arg(long, conflicts_with = "timestamp_format")]
    no_timestamps: bool,

    /// Custom timestamp template, e.g. "HH:mm:ss"
    #[arg(short = 't', long, value_name = "TEMPLATE")]
    timestamp_format: Option<String>,

    /// Render timestamps in UTC
    #[arg(long)]
    utc: bool,

    /// Parse each message as JSON before printing
    #[arg(long)]
    json: bool,
}

impl Args {
    /// Command-line flags win over the config file
    fn options(&self) -> Result<ConsoleOptions> {
        let mut options = match &self.config_file {
            Some(path) => ConsoleOptions::from_file(path)?,
            None => ConsoleOptions::default(),
        };

        if self.color {
            options.use_color = Some(true);
        } else if self.no_color {
            options.use_color = Some(false);
        }

        if self.no_timestamps {
            options.timestamps = Timestamps::Off;
        } else if let Some(template) = &self.timestamp_format {
            options.timestamps = Timestamps::Custom(template.clone());
        }

        if self.utc {
            options.utc = true;
        }

        Ok(options)
    }

    fn to_value(&self, message: String) -> Value {
        if self.json {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&message) {
                return Value::from(json);
            }
        }
        Value::String(message)
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let options = args.options()?;
    let mut console = Console::new(options);

    let messages = if args.messages.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .context("Failed to read stdin")?
    } else {
        args.messages.clone()
    };

    let values: Vec<Value> = messages
        .into_iter()
        .map(|message| args.to_value(message))
        .collect();

    console.write_level(&values, args.level)?;
    console.flush()?;
    Ok(())
}
