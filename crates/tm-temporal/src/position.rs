//! Temporal positions and their normalization to an absolute timestamp.
//!
//! A [`Position`] holds exactly one of the ISO 19108 position
//! representations. [`Position::resolve`] turns whichever one is present into
//! a `DateTime<Utc>`, or `None` when the representation cannot be placed on
//! the time line (an indeterminate value, an impossible calendar date, a
//! value outside chrono's range). `None` means "incomparable", not failure:
//! callers decide what to do with it.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TemporalError;
use crate::interval_length::TimeUnit;

/// Julian day number of the Unix epoch (1970-01-01T00:00:00Z).
const UNIX_EPOCH_JULIAN_DAY: f64 = 2_440_587.5;

/// First Julian day number of the Gregorian calendar (1582-10-15).
const GREGORIAN_REFORM_DAY: f64 = 2_299_161.0;

// ── Representations ─────────────────────────────────────────────────────────

/// A year/month/day triplet (month and day are 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    fn to_naive(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

/// Which calendar a [`CalendarDate`] produced from a Julian day is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarSystem {
    Julian,
    Gregorian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32, second: u32) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }
}

/// A calendar date with a time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateAndTime {
    pub date: CalendarDate,
    pub time: ClockTime,
}

/// An astronomical Julian day number (days since -4712-01-01T12:00 Julian).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JulianDate {
    pub day_number: f64,
}

impl JulianDate {
    pub fn new(day_number: f64) -> Self {
        Self { day_number }
    }

    /// Convert the day number to a calendar date.
    ///
    /// Day numbers from the 1582 reform onwards use the Gregorian correction;
    /// earlier ones are expressed in the proleptic Julian calendar, which is
    /// what was in civil use at the time.
    ///
    /// # Examples
    ///
    /// ```
    /// use tm_temporal::{CalendarDate, CalendarSystem, JulianDate};
    ///
    /// let (date, system) = JulianDate::new(2_299_159.5).to_calendar();
    /// assert_eq!(date, CalendarDate::new(1582, 10, 4));
    /// assert_eq!(system, CalendarSystem::Julian);
    /// ```
    pub fn to_calendar(&self) -> (CalendarDate, CalendarSystem) {
        let z = (self.day_number + 0.5).floor();
        let (a, system) = if z < GREGORIAN_REFORM_DAY {
            (z, CalendarSystem::Julian)
        } else {
            let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
            (z + 1.0 + alpha - (alpha / 4.0).floor(), CalendarSystem::Gregorian)
        };

        let b = a + 1524.0;
        let c = ((b - 122.1) / 365.25).floor();
        let d = (365.25 * c).floor();
        let e = ((b - d) / 30.6001).floor();

        let day = b - d - (30.6001 * e).floor();
        let month = if e < 14.0 { e - 1.0 } else { e - 13.0 };
        let year = if month > 2.0 { c - 4716.0 } else { c - 4715.0 };

        (
            CalendarDate::new(year as i32, month as u32, day as u32),
            system,
        )
    }

    fn to_utc(self) -> Option<DateTime<Utc>> {
        let millis = ((self.day_number - UNIX_EPOCH_JULIAN_DAY) * 86_400_000.0).round();
        if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
            return None;
        }
        DateTime::from_timestamp_millis(millis as i64)
    }
}

/// A named span of time used as an ordinal reference frame (a geological
/// epoch, a dynasty). Eras may be subdivided into member eras.
///
/// The bounds are private: an era never begins after it ends, whether it was
/// built with [`OrdinalEra::new`] or deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OrdinalEraFields")]
pub struct OrdinalEra {
    name: String,
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    members: Vec<OrdinalEra>,
}

#[derive(Deserialize)]
struct OrdinalEraFields {
    name: String,
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
    #[serde(default)]
    members: Vec<OrdinalEra>,
}

impl TryFrom<OrdinalEraFields> for OrdinalEra {
    type Error = TemporalError;

    fn try_from(fields: OrdinalEraFields) -> Result<Self, Self::Error> {
        let mut era = OrdinalEra::new(fields.name, fields.begin, fields.end)?;
        era.members = fields.members;
        Ok(era)
    }
}

impl OrdinalEra {
    /// # Errors
    ///
    /// Returns [`TemporalError::InvalidArgument`] if `begin` is after `end`.
    pub fn new(
        name: impl Into<String>,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, TemporalError> {
        let name = name.into();
        if begin > end {
            return Err(TemporalError::InvalidArgument(format!(
                "era '{name}' begins after it ends"
            )));
        }
        Ok(Self {
            name,
            begin,
            end,
            members: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn begin(&self) -> DateTime<Utc> {
        self.begin
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn members(&self) -> &[OrdinalEra] {
        &self.members
    }

    pub fn with_member(mut self, member: OrdinalEra) -> Self {
        self.members.push(member);
        self
    }

    /// Depth-first lookup of this era or one of its members by name.
    pub fn find(&self, name: &str) -> Option<&OrdinalEra> {
        if self.name == name {
            return Some(self);
        }
        self.members.iter().find_map(|m| m.find(name))
    }

    pub fn midpoint(&self) -> DateTime<Utc> {
        self.begin + (self.end - self.begin) / 2
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdinalPosition {
    pub era: OrdinalEra,
}

/// A coordinate system measuring time as a count of units from an origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalCoordinateSystem {
    pub name: String,
    pub origin: DateTime<Utc>,
    pub interval: TimeUnit,
}

impl TemporalCoordinateSystem {
    pub fn new(name: impl Into<String>, origin: DateTime<Utc>, interval: TimeUnit) -> Self {
        Self {
            name: name.into(),
            origin,
            interval,
        }
    }

    pub fn coordinate(&self, value: f64) -> TemporalCoordinate {
        TemporalCoordinate {
            system: self.clone(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalCoordinate {
    pub system: TemporalCoordinateSystem,
    pub value: f64,
}

impl TemporalCoordinate {
    fn to_utc(&self) -> Option<DateTime<Utc>> {
        let millis = (self.value * self.system.interval.millis() as f64).round();
        if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
            return None;
        }
        let offset = TimeDelta::try_milliseconds(millis as i64)?;
        self.system.origin.checked_add_signed(offset)
    }
}

/// ISO 19108 indeterminate position values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndeterminateValue {
    Unknown,
    Now,
    Before,
    After,
}

// ── Position ────────────────────────────────────────────────────────────────

/// A point in time in one of several representations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    DateTime(DateTime<Utc>),
    Calendar(CalendarDate),
    Julian(JulianDate),
    DateAndTime(DateAndTime),
    Ordinal(OrdinalPosition),
    Coordinate(TemporalCoordinate),
    Indeterminate(IndeterminateValue),
}

impl Position {
    /// Normalize the position to an absolute UTC timestamp.
    ///
    /// | representation | result |
    /// |---|---|
    /// | `DateTime` | unchanged |
    /// | `Julian` | `(jd − 2440587.5)` days after the Unix epoch |
    /// | `Calendar` | midnight UTC of the proleptic Gregorian date |
    /// | `DateAndTime` | that date at the clock time, UTC |
    /// | `Ordinal` | midpoint of the era |
    /// | `Coordinate` | origin + value × unit |
    /// | `Indeterminate` | `None` |
    ///
    /// `Now` is not resolved: nothing in this crate reads the system clock.
    pub fn resolve(&self) -> Option<DateTime<Utc>> {
        let resolved = match self {
            Position::DateTime(dt) => Some(*dt),
            Position::Julian(jd) => jd.to_utc(),
            Position::Calendar(date) => date
                .to_naive()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc()),
            Position::DateAndTime(dt) => dt
                .date
                .to_naive()
                .and_then(|d| d.and_hms_opt(dt.time.hour, dt.time.minute, dt.time.second))
                .map(|naive| naive.and_utc()),
            Position::Ordinal(ordinal) => Some(ordinal.era.midpoint()),
            Position::Coordinate(coordinate) => coordinate.to_utc(),
            Position::Indeterminate(_) => None,
        };

        if resolved.is_none() {
            debug!(position = ?self, "temporal position does not resolve to a date");
        }
        resolved
    }
}

impl From<DateTime<Utc>> for Position {
    fn from(dt: DateTime<Utc>) -> Self {
        Position::DateTime(dt)
    }
}

impl From<CalendarDate> for Position {
    fn from(date: CalendarDate) -> Self {
        Position::Calendar(date)
    }
}

impl From<JulianDate> for Position {
    fn from(jd: JulianDate) -> Self {
        Position::Julian(jd)
    }
}

impl From<DateAndTime> for Position {
    fn from(dt: DateAndTime) -> Self {
        Position::DateAndTime(dt)
    }
}

impl From<OrdinalEra> for Position {
    fn from(era: OrdinalEra) -> Self {
        Position::Ordinal(OrdinalPosition { era })
    }
}

impl From<TemporalCoordinate> for Position {
    fn from(coordinate: TemporalCoordinate) -> Self {
        Position::Coordinate(coordinate)
    }
}

impl From<IndeterminateValue> for Position {
    fn from(value: IndeterminateValue) -> Self {
        Position::Indeterminate(value)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_resolve_datetime_passthrough() {
        let dt = utc(2026, 2, 18, 14, 30, 0);
        assert_eq!(Position::from(dt).resolve(), Some(dt));
    }

    #[test]
    fn test_resolve_calendar_date_is_midnight() {
        let pos = Position::from(CalendarDate::new(2050, 11, 23));
        assert_eq!(pos.resolve(), Some(utc(2050, 11, 23, 0, 0, 0)));
    }

    #[test]
    fn test_resolve_impossible_calendar_date() {
        let pos = Position::from(CalendarDate::new(2021, 2, 29));
        assert_eq!(pos.resolve(), None);
    }

    #[test]
    fn test_resolve_date_and_time() {
        let pos = Position::from(DateAndTime {
            date: CalendarDate::new(2020, 6, 1),
            time: ClockTime::new(8, 15, 30),
        });
        assert_eq!(pos.resolve(), Some(utc(2020, 6, 1, 8, 15, 30)));
    }

    #[test]
    fn test_resolve_invalid_clock_time() {
        let pos = Position::from(DateAndTime {
            date: CalendarDate::new(2020, 6, 1),
            time: ClockTime::new(25, 0, 0),
        });
        assert_eq!(pos.resolve(), None);
    }

    #[test]
    fn test_resolve_julian_j2000() {
        // JD 2451545.0 is the J2000.0 epoch: 2000-01-01 12:00 UTC
        let pos = Position::from(JulianDate::new(2_451_545.0));
        assert_eq!(pos.resolve(), Some(utc(2000, 1, 1, 12, 0, 0)));
    }

    #[test]
    fn test_resolve_julian_unix_epoch() {
        let pos = Position::from(JulianDate::new(UNIX_EPOCH_JULIAN_DAY));
        assert_eq!(pos.resolve(), Some(DateTime::UNIX_EPOCH));
    }

    #[test]
    fn test_resolve_julian_non_finite() {
        assert_eq!(Position::from(JulianDate::new(f64::NAN)).resolve(), None);
        assert_eq!(Position::from(JulianDate::new(f64::INFINITY)).resolve(), None);
    }

    #[test]
    fn test_julian_to_calendar_gregorian() {
        let (date, system) = JulianDate::new(2_451_545.0).to_calendar();
        assert_eq!(date, CalendarDate::new(2000, 1, 1));
        assert_eq!(system, CalendarSystem::Gregorian);
    }

    #[test]
    fn test_julian_to_calendar_reform_boundary() {
        // Thursday 4 October 1582 (Julian) was followed by Friday 15 October 1582 (Gregorian)
        let (before, before_system) = JulianDate::new(2_299_159.5).to_calendar();
        let (after, after_system) = JulianDate::new(2_299_160.5).to_calendar();
        assert_eq!(before, CalendarDate::new(1582, 10, 4));
        assert_eq!(before_system, CalendarSystem::Julian);
        assert_eq!(after, CalendarDate::new(1582, 10, 15));
        assert_eq!(after_system, CalendarSystem::Gregorian);
    }

    #[test]
    fn test_julian_to_calendar_day_zero() {
        let (date, system) = JulianDate::new(0.0).to_calendar();
        assert_eq!(date, CalendarDate::new(-4712, 1, 1));
        assert_eq!(system, CalendarSystem::Julian);
    }

    #[test]
    fn test_resolve_ordinal_era_midpoint() {
        let era = OrdinalEra::new("Q1", utc(2020, 1, 1, 0, 0, 0), utc(2020, 1, 3, 0, 0, 0)).unwrap();
        assert_eq!(Position::from(era).resolve(), Some(utc(2020, 1, 2, 0, 0, 0)));
    }

    #[test]
    fn test_ordinal_era_rejects_reversed_bounds() {
        let err =
            OrdinalEra::new("bad", utc(2020, 1, 3, 0, 0, 0), utc(2020, 1, 1, 0, 0, 0)).unwrap_err();
        assert!(err.to_string().contains("begins after it ends"), "got: {err}");
    }

    #[test]
    fn test_ordinal_era_deserialize_rejects_reversed_bounds() {
        let json = r#"{"name":"bad","begin":"2020-01-03T00:00:00Z","end":"2020-01-01T00:00:00Z"}"#;
        let err = serde_json::from_str::<OrdinalEra>(json).unwrap_err();
        assert!(err.to_string().contains("begins after it ends"), "got: {err}");
    }

    #[test]
    fn test_ordinal_era_serde_keeps_members() {
        let era = OrdinalEra::new("Mesozoic", utc(1800, 1, 1, 0, 0, 0), utc(1950, 1, 1, 0, 0, 0))
            .unwrap()
            .with_member(
                OrdinalEra::new("Cretaceous", utc(1900, 1, 1, 0, 0, 0), utc(1950, 1, 1, 0, 0, 0))
                    .unwrap(),
            );
        let json = serde_json::to_string(&era).unwrap();
        let back: OrdinalEra = serde_json::from_str(&json).unwrap();
        assert_eq!(back, era);
        assert_eq!(back.members().len(), 1);
        assert_eq!(back.begin(), utc(1800, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_ordinal_era_find_member() {
        let cretaceous = OrdinalEra::new(
            "Cretaceous",
            utc(1900, 1, 1, 0, 0, 0),
            utc(1950, 1, 1, 0, 0, 0),
        )
        .unwrap();
        let mesozoic = OrdinalEra::new(
            "Mesozoic",
            utc(1800, 1, 1, 0, 0, 0),
            utc(1950, 1, 1, 0, 0, 0),
        )
        .unwrap()
        .with_member(cretaceous.clone());

        assert_eq!(mesozoic.find("Cretaceous"), Some(&cretaceous));
        assert!(mesozoic.find("Jurassic").is_none());
    }

    #[test]
    fn test_resolve_temporal_coordinate() {
        let system = TemporalCoordinateSystem::new("days", utc(2020, 1, 1, 0, 0, 0), TimeUnit::Day);
        let pos = Position::from(system.coordinate(1.5));
        assert_eq!(pos.resolve(), Some(utc(2020, 1, 2, 12, 0, 0)));
    }

    #[test]
    fn test_resolve_temporal_coordinate_negative() {
        let system =
            TemporalCoordinateSystem::new("hours", utc(2020, 1, 1, 0, 0, 0), TimeUnit::Hour);
        let pos = Position::from(system.coordinate(-2.0));
        assert_eq!(pos.resolve(), Some(utc(2019, 12, 31, 22, 0, 0)));
    }

    #[test]
    fn test_resolve_indeterminate_is_none() {
        for value in [
            IndeterminateValue::Unknown,
            IndeterminateValue::Now,
            IndeterminateValue::Before,
            IndeterminateValue::After,
        ] {
            assert_eq!(Position::from(value).resolve(), None);
        }
    }
}
