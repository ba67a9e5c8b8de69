//! Timestamp templates in the `YYYY-MM-DD HH:mm:ss` style

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fmt::{Display, Write};

pub const DEFAULT_TEMPLATE: &str = "YYYY-MM-DD HH:mm:ss";

/// Longest tokens first so that `YYYY` wins over `YY` and `MMMM` over `MM`
static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\[[^\]]*\]|YYYY|YY|Q|MMMM|MMM|MM|M|DDDD|DDD|DD|D|dddd|ddd|dd|d|HH|H|hh|h|A|a|mm|m|ss|s|SSS|SS|S|ZZ|Z|X|x",
    )
    .unwrap()
});

/// How a console renders timestamps
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "TimestampSetting")]
pub enum Timestamps {
    Off,
    #[default]
    Default,
    Custom(String),
}

impl Timestamps {
    /// Compile the configured template, `None` when timestamps are off
    pub fn template(&self) -> Option<Template> {
        match self {
            Timestamps::Off => None,
            Timestamps::Default => Some(Template::parse(DEFAULT_TEMPLATE)),
            Timestamps::Custom(pattern) => Some(Template::parse(pattern)),
        }
    }
}

/// Config files write `timestamps: false`, `timestamps: true` or a template
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TimestampSetting {
    Enabled(bool),
    Template(String),
}

impl From<TimestampSetting> for Timestamps {
    fn from(setting: TimestampSetting) -> Self {
        match setting {
            TimestampSetting::Enabled(false) => Timestamps::Off,
            TimestampSetting::Enabled(true) => Timestamps::Default,
            TimestampSetting::Template(pattern) => Timestamps::Custom(pattern),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year,
    ShortYear,
    Quarter,
    MonthName,
    ShortMonthName,
    PaddedMonth,
    Month,
    PaddedDayOfYear,
    DayOfYear,
    PaddedDay,
    Day,
    WeekdayName,
    ShortWeekdayName,
    MinWeekdayName,
    Weekday,
    PaddedHour,
    Hour,
    PaddedHour12,
    Hour12,
    UpperMeridiem,
    LowerMeridiem,
    PaddedMinute,
    Minute,
    PaddedSecond,
    Second,
    Millisecond,
    Centisecond,
    Decisecond,
    OffsetCompact,
    Offset,
    UnixSeconds,
    UnixMillis,
}

impl Field {
    fn from_token(token: &str) -> Option<Field> {
        let field = match token {
            "YYYY" => Field::Year,
            "YY" => Field::ShortYear,
            "Q" => Field::Quarter,
            "MMMM" => Field::MonthName,
            "MMM" => Field::ShortMonthName,
            "MM" => Field::PaddedMonth,
            "M" => Field::Month,
            "DDDD" => Field::PaddedDayOfYear,
            "DDD" => Field::DayOfYear,
            "DD" => Field::PaddedDay,
            "D" => Field::Day,
            "dddd" => Field::WeekdayName,
            "ddd" => Field::ShortWeekdayName,
            "dd" => Field::MinWeekdayName,
            "d" => Field::Weekday,
            "HH" => Field::PaddedHour,
            "H" => Field::Hour,
            "hh" => Field::PaddedHour12,
            "h" => Field::Hour12,
            "A" => Field::UpperMeridiem,
            "a" => Field::LowerMeridiem,
            "mm" => Field::PaddedMinute,
            "m" => Field::Minute,
            "ss" => Field::PaddedSecond,
            "s" => Field::Second,
            "SSS" => Field::Millisecond,
            "SS" => Field::Centisecond,
            "S" => Field::Decisecond,
            "ZZ" => Field::OffsetCompact,
            "Z" => Field::Offset,
            "X" => Field::UnixSeconds,
            "x" => Field::UnixMillis,
            _ => return None,
        };
        Some(field)
    }

    fn render<Tz>(&self, time: &DateTime<Tz>, out: &mut String)
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let hour12 = match time.hour() % 12 {
            0 => 12,
            hour => hour,
        };
        let millis = time.timestamp_subsec_millis().min(999);
        // Writing into a String cannot fail
        let _ = match self {
            Field::Year => write!(out, "{:04}", time.year()),
            Field::ShortYear => write!(out, "{:02}", time.year().rem_euclid(100)),
            Field::Quarter => write!(out, "{}", (time.month() - 1) / 3 + 1),
            Field::MonthName => write!(out, "{}", time.format("%B")),
            Field::ShortMonthName => write!(out, "{}", time.format("%b")),
            Field::PaddedMonth => write!(out, "{:02}", time.month()),
            Field::Month => write!(out, "{}", time.month()),
            Field::PaddedDayOfYear => write!(out, "{:03}", time.ordinal()),
            Field::DayOfYear => write!(out, "{}", time.ordinal()),
            Field::PaddedDay => write!(out, "{:02}", time.day()),
            Field::Day => write!(out, "{}", time.day()),
            Field::WeekdayName => write!(out, "{}", time.format("%A")),
            Field::ShortWeekdayName => write!(out, "{}", time.format("%a")),
            Field::MinWeekdayName => {
                let name = time.format("%a").to_string();
                write!(out, "{}", &name[..2])
            }
            Field::Weekday => write!(out, "{}", time.weekday().num_days_from_sunday()),
            Field::PaddedHour => write!(out, "{:02}", time.hour()),
            Field::Hour => write!(out, "{}", time.hour()),
            Field::PaddedHour12 => write!(out, "{:02}", hour12),
            Field::Hour12 => write!(out, "{}", hour12),
            Field::UpperMeridiem => out.write_str(if time.hour() < 12 { "AM" } else { "PM" }),
            Field::LowerMeridiem => out.write_str(if time.hour() < 12 { "am" } else { "pm" }),
            Field::PaddedMinute => write!(out, "{:02}", time.minute()),
            Field::Minute => write!(out, "{}", time.minute()),
            Field::PaddedSecond => write!(out, "{:02}", time.second()),
            Field::Second => write!(out, "{}", time.second()),
            Field::Millisecond => write!(out, "{:03}", millis),
            Field::Centisecond => write!(out, "{:02}", millis / 10),
            Field::Decisecond => write!(out, "{}", millis / 100),
            Field::OffsetCompact => write!(out, "{}", time.format("%z")),
            Field::Offset => write!(out, "{}", time.format("%:z")),
            Field::UnixSeconds => write!(out, "{}", time.timestamp()),
            Field::UnixMillis => write!(out, "{}", time.timestamp_millis()),
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Field(Field),
}

/// A compiled timestamp template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pattern: String,
    tokens: Vec<Token>,
}

impl Template {
    /// Compile `pattern`. Text inside `[...]` is copied verbatim, and a `[`
    /// with no closing `]` is an ordinary character.
    pub fn parse(pattern: &str) -> Self {
        let mut tokens = Vec::new();
        let mut last = 0;

        for found in TOKEN_REGEX.find_iter(pattern) {
            if found.start() > last {
                tokens.push(Token::Literal(pattern[last..found.start()].to_string()));
            }
            let text = found.as_str();
            if text.starts_with('[') {
                tokens.push(Token::Literal(text[1..text.len() - 1].to_string()));
            } else if let Some(field) = Field::from_token(text) {
                tokens.push(Token::Field(field));
            }
            last = found.end();
        }
        if last < pattern.len() {
            tokens.push(Token::Literal(pattern[last..].to_string()));
        }

        Template {
            pattern: pattern.to_string(),
            tokens,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Render `time` in whatever zone it carries
    pub fn display<Tz>(&self, time: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut out = String::with_capacity(self.pattern.len() + 8);
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Field(field) => field.render(time, &mut out),
            }
        }
        out
    }
}
