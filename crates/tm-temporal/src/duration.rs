//! ISO 8601 period durations.
//!
//! A [`PeriodDuration`] is the structured form of `P[nY][nM][nW][nD][T[nH][nM][nS]]`.
//! Components are whole numbers and each one is either present or absent;
//! `P1D` and `P1DT0S` are different values even though they have the same
//! length.
//!
//! Conversion to milliseconds uses fixed calendar approximations (365-day
//! year, 30.42-day month). It is not calendar-aware: leap years and month
//! lengths are ignored on purpose so that a duration has a length without
//! being anchored to a date.
//!
//! # Functions
//!
//! - [`PeriodDuration::parse`] — text → structured duration
//! - [`PeriodDuration::to_millis`] — structured duration → milliseconds
//! - [`PeriodDuration::from_millis`] — milliseconds → structured duration
//! - `Display` — structured duration → canonical text

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::TemporalError;

pub const MILLIS_PER_YEAR: u64 = 31_536_000_000;
pub const MILLIS_PER_MONTH: u64 = 2_628_000_000;
pub const MILLIS_PER_WEEK: u64 = 604_800_000;
pub const MILLIS_PER_DAY: u64 = 86_400_000;
pub const MILLIS_PER_HOUR: u64 = 3_600_000;
pub const MILLIS_PER_MINUTE: u64 = 60_000;
pub const MILLIS_PER_SECOND: u64 = 1_000;

/// An ISO 8601 duration with optional whole-number components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PeriodDuration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weeks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds: Option<u64>,
}

impl PeriodDuration {
    /// The zero-length duration, rendered as `PT0S`.
    pub fn zero() -> Self {
        Self::default().with_seconds(0)
    }

    pub fn with_years(mut self, n: u64) -> Self {
        self.years = Some(n);
        self
    }

    pub fn with_months(mut self, n: u64) -> Self {
        self.months = Some(n);
        self
    }

    pub fn with_weeks(mut self, n: u64) -> Self {
        self.weeks = Some(n);
        self
    }

    pub fn with_days(mut self, n: u64) -> Self {
        self.days = Some(n);
        self
    }

    pub fn with_hours(mut self, n: u64) -> Self {
        self.hours = Some(n);
        self
    }

    pub fn with_minutes(mut self, n: u64) -> Self {
        self.minutes = Some(n);
        self
    }

    pub fn with_seconds(mut self, n: u64) -> Self {
        self.seconds = Some(n);
        self
    }

    /// True when no component is present.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn has_time_part(&self) -> bool {
        self.hours.is_some() || self.minutes.is_some() || self.seconds.is_some()
    }

    /// Parse an ISO 8601 duration string.
    ///
    /// Designators are scanned in the fixed order `Y`, `M`, `W`, `D`, then,
    /// after the `T` marker, `H`, `M`, `S`. The two `M` designators are told
    /// apart only by which side of `T` they fall on.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::InvalidFormat`] if the text does not start
    /// with `P`, if a designator is not preceded by a run of ASCII digits, or
    /// if any text is left once every designator has been consumed.
    ///
    /// # Examples
    ///
    /// ```
    /// use tm_temporal::PeriodDuration;
    ///
    /// let d = PeriodDuration::parse("P1Y2MT3M").unwrap();
    /// assert_eq!(d.months, Some(2));
    /// assert_eq!(d.minutes, Some(3));
    /// ```
    pub fn parse(text: &str) -> Result<Self, TemporalError> {
        let rest = text.strip_prefix('P').ok_or_else(|| {
            TemporalError::InvalidFormat(format!("duration must start with 'P': '{text}'"))
        })?;

        let (mut date_part, time_part) = match rest.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (rest, None),
        };

        let mut duration = PeriodDuration {
            years: take_component(&mut date_part, 'Y', text)?,
            months: take_component(&mut date_part, 'M', text)?,
            weeks: take_component(&mut date_part, 'W', text)?,
            days: take_component(&mut date_part, 'D', text)?,
            ..Default::default()
        };
        if !date_part.is_empty() {
            return Err(TemporalError::InvalidFormat(format!(
                "unexpected '{date_part}' in '{text}'"
            )));
        }

        if let Some(mut time_part) = time_part {
            duration.hours = take_component(&mut time_part, 'H', text)?;
            duration.minutes = take_component(&mut time_part, 'M', text)?;
            duration.seconds = take_component(&mut time_part, 'S', text)?;
            if !time_part.is_empty() {
                return Err(TemporalError::InvalidFormat(format!(
                    "unexpected '{time_part}' after 'T' in '{text}'"
                )));
            }
        }

        Ok(duration)
    }

    /// Total length in milliseconds using the fixed unit constants.
    ///
    /// Absent components contribute zero. Saturates at `u64::MAX`.
    pub fn to_millis(&self) -> u64 {
        [
            (self.years, MILLIS_PER_YEAR),
            (self.months, MILLIS_PER_MONTH),
            (self.weeks, MILLIS_PER_WEEK),
            (self.days, MILLIS_PER_DAY),
            (self.hours, MILLIS_PER_HOUR),
            (self.minutes, MILLIS_PER_MINUTE),
            (self.seconds, MILLIS_PER_SECOND),
        ]
        .iter()
        .fold(0u64, |total, (n, unit)| {
            total.saturating_add(n.unwrap_or(0).saturating_mul(*unit))
        })
    }

    /// Decompose a millisecond count into components, largest unit first.
    ///
    /// Only non-zero units are populated and the sub-second remainder is
    /// dropped. Zero milliseconds yields `PT0S`.
    pub fn from_millis(millis: u64) -> Self {
        let mut remaining = millis;
        let mut take = |unit: u64| {
            let n = remaining / unit;
            remaining %= unit;
            (n > 0).then_some(n)
        };

        let duration = PeriodDuration {
            years: take(MILLIS_PER_YEAR),
            months: take(MILLIS_PER_MONTH),
            weeks: take(MILLIS_PER_WEEK),
            days: take(MILLIS_PER_DAY),
            hours: take(MILLIS_PER_HOUR),
            minutes: take(MILLIS_PER_MINUTE),
            seconds: take(MILLIS_PER_SECOND),
        };

        if duration.is_empty() {
            Self::zero()
        } else {
            duration
        }
    }

    /// The same length as a chrono [`TimeDelta`], clamped to `TimeDelta::MAX`.
    pub fn to_time_delta(&self) -> TimeDelta {
        i64::try_from(self.to_millis())
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .unwrap_or(TimeDelta::MAX)
    }
}

/// Consume `<digits><designator>` from the front of the text, if the designator occurs.
fn take_component(
    rest: &mut &str,
    designator: char,
    original: &str,
) -> Result<Option<u64>, TemporalError> {
    let Some(idx) = rest.find(designator) else {
        return Ok(None);
    };

    let digits = &rest[..idx];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TemporalError::InvalidFormat(format!(
            "expected number before '{designator}' in '{original}'"
        )));
    }
    let n: u64 = digits.parse().map_err(|_| {
        TemporalError::InvalidFormat(format!("number out of range in '{original}'"))
    })?;

    *rest = &rest[idx + designator.len_utf8()..];
    Ok(Some(n))
}

impl fmt::Display for PeriodDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("P")?;
        for (n, unit) in [
            (self.years, 'Y'),
            (self.months, 'M'),
            (self.weeks, 'W'),
            (self.days, 'D'),
        ] {
            if let Some(n) = n {
                write!(f, "{n}{unit}")?;
            }
        }
        if self.has_time_part() {
            f.write_str("T")?;
            for (n, unit) in [(self.hours, 'H'), (self.minutes, 'M'), (self.seconds, 'S')] {
                if let Some(n) = n {
                    write!(f, "{n}{unit}")?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for PeriodDuration {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
