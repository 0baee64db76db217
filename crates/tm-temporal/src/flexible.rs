//! Heuristic parsing of human-entered date strings.
//!
//! The parser does not implement a grammar. It looks at the shape of the
//! text (how many slashes, spaces and dashes, and where the first dash is)
//! to guess a layout, then parses that layout strictly. Shapes are checked in
//! a fixed order, so an ambiguous input such as `05-06-2020` is read as
//! whichever layout comes first (`dd-MM-yyyy`).
//!
//! # Layouts
//!
//! | shape | layout |
//! |---|---|
//! | ends with `BC` | rejected |
//! | one `/` | `MM/yyyy` |
//! | two `/` | `dd/MM/yyyy` |
//! | two spaces | `dd <month> yyyy` |
//! | one space, fewer than three `-` | `yyyy-MM-dd HH:mm:ss`, else `<month> yyyy` |
//! | one `-` at offset 2 | `MM-yyyy` |
//! | one `-` elsewhere | `yyyy-MM` |
//! | two or more `-` | ISO 8601, else `yyyy-MM-dd` (first `-` at offset 4) or `dd-MM-yyyy` |
//! | no `-` | `yyyy` |
//!
//! Month names are French (`janvier` … `décembre`, accents optional) or
//! English, case-insensitive. Inputs without a UTC offset are interpreted in
//! the configured timezone; the result is always UTC.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use tracing::debug;

use crate::error::TemporalError;
use crate::options::ParseOptions;

/// The layout guessed from the shape of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `MM/yyyy`
    MonthYearSlash,
    /// `dd/MM/yyyy`
    DayMonthYearSlash,
    /// `dd <month> yyyy`
    DayMonthNameYear,
    /// `yyyy-MM-dd HH:mm:ss`, falling back to `<month> yyyy`
    DateTimeOrMonthNameYear,
    /// `MM-yyyy`
    MonthYearDash,
    /// `yyyy-MM`
    YearMonthDash,
    /// ISO 8601, falling back to `yyyy-MM-dd` or `dd-MM-yyyy`
    IsoOrFullDate,
    /// `yyyy`
    Year,
}

impl Layout {
    /// Guess the layout from the shape of already-trimmed text.
    pub fn classify(s: &str) -> Layout {
        let slashes = s.matches('/').count();
        let spaces = s.matches(' ').count();
        let dashes = s.matches('-').count();

        if slashes == 1 {
            Layout::MonthYearSlash
        } else if slashes == 2 {
            Layout::DayMonthYearSlash
        } else if spaces == 2 {
            Layout::DayMonthNameYear
        } else if spaces == 1 && dashes < 3 {
            Layout::DateTimeOrMonthNameYear
        } else if dashes == 1 {
            if s.find('-') == Some(2) {
                Layout::MonthYearDash
            } else {
                Layout::YearMonthDash
            }
        } else if dashes >= 2 {
            Layout::IsoOrFullDate
        } else {
            Layout::Year
        }
    }
}

/// Parses human-entered dates with a configured default timezone.
#[derive(Debug, Clone, Default)]
pub struct FlexibleDateParser {
    options: ParseOptions,
}

impl FlexibleDateParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a date string into an absolute UTC timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::Unsupported`] for `BC` dates and
    /// [`TemporalError::InvalidFormat`] when a field is not numeric, a month
    /// name is unknown, the date does not exist, or the local time does not
    /// exist in the configured timezone.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{Datelike, Timelike};
    /// use tm_temporal::FlexibleDateParser;
    ///
    /// let parser = FlexibleDateParser::default();
    /// let dt = parser.parse("23 novembre 2050").unwrap();
    /// assert_eq!((dt.year(), dt.month(), dt.day()), (2050, 11, 23));
    /// assert_eq!(dt.hour(), 0);
    /// ```
    pub fn parse(&self, text: &str) -> Result<DateTime<Utc>, TemporalError> {
        let s = text.trim();
        if s.is_empty() {
            return Err(TemporalError::InvalidFormat("empty date string".to_string()));
        }
        if s.ends_with("BC") {
            return Err(TemporalError::Unsupported(format!(
                "BC dates are not supported: '{s}'"
            )));
        }

        let layout = Layout::classify(s);
        debug!(text = s, ?layout, "parsing flexible date");

        match layout {
            Layout::MonthYearSlash => {
                let [month, year] = split_fields::<2>(s, '/')?;
                self.local_date(number(year, s)?, number(month, s)?, 1, s)
            }
            Layout::DayMonthYearSlash => {
                let [day, month, year] = split_fields::<3>(s, '/')?;
                self.local_date(number(year, s)?, number(month, s)?, number(day, s)?, s)
            }
            Layout::DayMonthNameYear => {
                let [day, month, year] = split_fields::<3>(s, ' ')?;
                let day = day.strip_suffix("er").unwrap_or(day);
                self.local_date(number(year, s)?, month_name(month, s)?, number(day, s)?, s)
            }
            Layout::DateTimeOrMonthNameYear => {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                    return self.localize(naive, s);
                }
                let [month, year] = split_fields::<2>(s, ' ')?;
                self.local_date(number(year, s)?, month_name(month, s)?, 1, s)
            }
            Layout::MonthYearDash => {
                let [month, year] = split_fields::<2>(s, '-')?;
                self.local_date(number(year, s)?, number(month, s)?, 1, s)
            }
            Layout::YearMonthDash => {
                let [year, month] = split_fields::<2>(s, '-')?;
                self.local_date(number(year, s)?, number(month, s)?, 1, s)
            }
            Layout::IsoOrFullDate => {
                if let Some(dt) = self.try_iso8601(s) {
                    return Ok(dt);
                }
                let fields = split_fields::<3>(s, '-')?;
                let [day, month, year] = if s.find('-') == Some(4) {
                    let [year, month, day] = fields;
                    [day, month, year]
                } else {
                    fields
                };
                self.local_date(number(year, s)?, number(month, s)?, number(day, s)?, s)
            }
            Layout::Year => self.local_date(number(s, s)?, 1, 1, s),
        }
    }

    /// Strict ISO 8601 date-time, with or without a UTC offset.
    fn try_iso8601(&self, s: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%:z"] {
            if let Ok(dt) = DateTime::parse_from_str(s, format) {
                return Some(dt.with_timezone(&Utc));
            }
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return self.localize(naive, s).ok();
            }
        }
        None
    }

    fn local_date(
        &self,
        year: i32,
        month: u32,
        day: u32,
        text: &str,
    ) -> Result<DateTime<Utc>, TemporalError> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            TemporalError::InvalidFormat(format!(
                "no such date {year}-{month:02}-{day:02} in '{text}'"
            ))
        })?;
        self.localize(date.and_time(NaiveTime::MIN), text)
    }

    fn localize(&self, naive: NaiveDateTime, text: &str) -> Result<DateTime<Utc>, TemporalError> {
        let tz = self.options.timezone;
        tz.from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| {
                TemporalError::InvalidFormat(format!(
                    "'{text}' does not exist in timezone {}",
                    tz.name()
                ))
            })
    }
}

/// Parse a date string with default options (UTC).
///
/// See [`FlexibleDateParser::parse`].
pub fn parse_flexible(text: &str) -> Result<DateTime<Utc>, TemporalError> {
    FlexibleDateParser::default().parse(text)
}

// ── Field helpers ───────────────────────────────────────────────────────────

fn split_fields<'a, const N: usize>(s: &'a str, sep: char) -> Result<[&'a str; N], TemporalError> {
    let fields: Vec<&str> = s.split(sep).map(str::trim).collect();
    fields.try_into().map_err(|fields: Vec<&str>| {
        TemporalError::InvalidFormat(format!(
            "expected {N} '{sep}'-separated fields in '{s}', found {}",
            fields.len()
        ))
    })
}

fn number<T: FromStr>(field: &str, text: &str) -> Result<T, TemporalError> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TemporalError::InvalidFormat(format!(
            "expected a number, found '{field}' in '{text}'"
        )));
    }
    field.parse().map_err(|_| {
        TemporalError::InvalidFormat(format!("number out of range '{field}' in '{text}'"))
    })
}

/// Month number (1-12) from a French or English month name.
fn month_name(field: &str, text: &str) -> Result<u32, TemporalError> {
    let folded: String = field
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'é' | 'è' | 'ê' => 'e',
            'û' | 'ù' => 'u',
            'ô' => 'o',
            c => c,
        })
        .collect();

    let month = match folded.as_str() {
        "janvier" | "january" => 1,
        "fevrier" | "february" => 2,
        "mars" | "march" => 3,
        "avril" | "april" => 4,
        "mai" | "may" => 5,
        "juin" | "june" => 6,
        "juillet" | "july" => 7,
        "aout" | "august" => 8,
        "septembre" | "september" => 9,
        "octobre" | "october" => 10,
        "novembre" | "november" => 11,
        "decembre" | "december" => 12,
        _ => {
            return Err(TemporalError::InvalidFormat(format!(
                "unknown month name '{field}' in '{text}'"
            )))
        }
    };
    Ok(month)
}

// ── Tests ───────────────────────────────────────────────────────────────────
