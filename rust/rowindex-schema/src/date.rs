//! Date patterns.
//!
//! Patterns use the familiar letter syntax (`yyyy/MM/dd HH:mm:ss.SSS`), with
//! `||` separating alternatives that are tried in order. Letters are
//! translated once into chrono format strings; each parse builds its own
//! chrono parser state, so a pattern can be shared freely across threads.
//!
//! Supported letters:
//!
//! | Letters  | Meaning                     |
//! |----------|-----------------------------|
//! | `yyyy`   | four digit year             |
//! | `yy`     | two digit year              |
//! | `MM`     | month number                |
//! | `MMM`    | abbreviated month name      |
//! | `MMMM`   | full month name             |
//! | `dd`     | day of month                |
//! | `HH`     | hour of day (0-23)          |
//! | `mm`     | minute                      |
//! | `ss`     | second                      |
//! | `SSS`    | millisecond                 |
//! | `Z`      | zone offset such as `+0100` |
//!
//! Text between single quotes is literal, and `''` is a single quote. Any
//! other non-letter character is literal too. Fields the pattern leaves out
//! default to 1970-01-01T00:00:00 in UTC.

use std::fmt;

use chrono::format::{Parsed, StrftimeItems, parse};
use rowindex_common::{error::Error, result::Result};

pub const DEFAULT_DATE_PATTERN: &str = "yyyy/MM/dd HH:mm:ss||yyyy/MM/dd";

const ALTERNATIVE_SEPARATOR: &str = "||";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Fields {
    year: bool,
    month: bool,
    day: bool,
    hour: bool,
    minute: bool,
    second: bool,
    offset: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DateFormat {
    strftime: String,
    fields: Fields,
}

impl DateFormat {
    fn compile(pattern: &str) -> Result<DateFormat> {
        let mut strftime = String::with_capacity(pattern.len() * 2);
        let mut fields = Fields::default();
        let chars: Vec<char> = pattern.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c == '\'' {
                if chars.get(i + 1) == Some(&'\'') {
                    strftime.push('\'');
                    i += 2;
                    continue;
                }
                let start = i + 1;
                let Some(len) = chars[start..].iter().position(|&c| c == '\'') else {
                    return Err(Error::invalid_arg(
                        "pattern",
                        format!("unterminated quote in {pattern:?}"),
                    ));
                };
                for &literal in &chars[start..start + len] {
                    push_literal(&mut strftime, literal);
                }
                i = start + len + 1;
                continue;
            }
            if !c.is_ascii_alphabetic() {
                push_literal(&mut strftime, c);
                i += 1;
                continue;
            }

            let run = chars[i..].iter().take_while(|&&x| x == c).count();
            let directive = match (c, run) {
                ('y', 2) => {
                    fields.year = true;
                    "%y"
                }
                ('y', _) => {
                    fields.year = true;
                    "%Y"
                }
                ('M', 1 | 2) => {
                    fields.month = true;
                    "%m"
                }
                ('M', 3) => {
                    fields.month = true;
                    "%b"
                }
                ('M', _) => {
                    fields.month = true;
                    "%B"
                }
                ('d', 1 | 2) => {
                    fields.day = true;
                    "%d"
                }
                ('H', 1 | 2) => {
                    fields.hour = true;
                    "%H"
                }
                ('m', 1 | 2) => {
                    fields.minute = true;
                    "%M"
                }
                ('s', 1 | 2) => {
                    fields.second = true;
                    "%S"
                }
                ('S', 3) => "%3f",
                ('Z', 1) => {
                    fields.offset = true;
                    "%z"
                }
                _ => {
                    return Err(Error::invalid_arg(
                        "pattern",
                        format!(
                            "unsupported letters {:?} in {pattern:?}",
                            c.to_string().repeat(run)
                        ),
                    ));
                }
            };
            strftime.push_str(directive);
            i += run;
        }
        Ok(DateFormat { strftime, fields })
    }

    fn parse_millis(&self, text: &str) -> Option<i64> {
        let mut parsed = Parsed::new();
        parse(&mut parsed, text, StrftimeItems::new(&self.strftime)).ok()?;

        let fields = self.fields;
        if !fields.year {
            parsed.set_year(1970).ok()?;
        }
        if !fields.month {
            parsed.set_month(1).ok()?;
        }
        if !fields.day {
            parsed.set_day(1).ok()?;
        }
        if !fields.hour {
            parsed.set_hour(0).ok()?;
        }
        if !fields.minute {
            parsed.set_minute(0).ok()?;
        }
        if !fields.second {
            parsed.set_second(0).ok()?;
        }

        if fields.offset {
            parsed.to_datetime().ok().map(|dt| dt.timestamp_millis())
        } else {
            parsed
                .to_naive_datetime_with_offset(0)
                .ok()
                .map(|dt| dt.and_utc().timestamp_millis())
        }
    }
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

/// A compiled date pattern with one or more alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    source: String,
    formats: Vec<DateFormat>,
}

impl DatePattern {
    /// Compiles `pattern`.
    ///
    /// # Errors
    /// Returns an invalid argument error for empty alternatives, unterminated
    /// quotes and letters outside the supported set.
    pub fn new(pattern: &str) -> Result<DatePattern> {
        let formats = pattern
            .split(ALTERNATIVE_SEPARATOR)
            .map(|alternative| {
                if alternative.trim().is_empty() {
                    return Err(Error::invalid_arg(
                        "pattern",
                        format!("empty alternative in {pattern:?}"),
                    ));
                }
                DateFormat::compile(alternative)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(DatePattern {
            source: pattern.to_string(),
            formats,
        })
    }

    /// The pattern text as configured.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Parses `text` with the first matching alternative, returning epoch
    /// milliseconds.
    pub fn parse_millis(&self, text: &str) -> Option<i64> {
        self.formats.iter().find_map(|f| f.parse_millis(text))
    }
}

impl Default for DatePattern {
    fn default() -> Self {
        DatePattern {
            source: DEFAULT_DATE_PATTERN.to_string(),
            formats: vec![
                DateFormat {
                    strftime: "%Y/%m/%d %H:%M:%S".to_string(),
                    fields: Fields {
                        year: true,
                        month: true,
                        day: true,
                        hour: true,
                        minute: true,
                        second: true,
                        offset: false,
                    },
                },
                DateFormat {
                    strftime: "%Y/%m/%d".to_string(),
                    fields: Fields {
                        year: true,
                        month: true,
                        day: true,
                        ..Fields::default()
                    },
                },
            ],
        }
    }
}

impl fmt::Display for DatePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
