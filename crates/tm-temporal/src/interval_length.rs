//! Interval lengths expressed as `value × radix^(-factor)` time units.

use serde::{Deserialize, Serialize};

use crate::duration::{
    PeriodDuration, MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_MONTH,
    MILLIS_PER_SECOND, MILLIS_PER_WEEK, MILLIS_PER_YEAR,
};
use crate::error::TemporalError;

/// A unit of time with the same fixed lengths as the duration codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl TimeUnit {
    pub fn millis(self) -> u64 {
        match self {
            TimeUnit::Year => MILLIS_PER_YEAR,
            TimeUnit::Month => MILLIS_PER_MONTH,
            TimeUnit::Week => MILLIS_PER_WEEK,
            TimeUnit::Day => MILLIS_PER_DAY,
            TimeUnit::Hour => MILLIS_PER_HOUR,
            TimeUnit::Minute => MILLIS_PER_MINUTE,
            TimeUnit::Second => MILLIS_PER_SECOND,
        }
    }
}

/// A length of time given as a multiple of a scaled unit.
///
/// `IntervalLength { unit: Second, radix: 10, factor: 3, value: 250 }` is
/// 250 milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalLength {
    pub unit: TimeUnit,
    pub radix: u32,
    pub factor: i32,
    pub value: u64,
}

impl IntervalLength {
    /// # Errors
    ///
    /// Returns [`TemporalError::InvalidArgument`] if `radix` is zero.
    pub fn new(unit: TimeUnit, radix: u32, factor: i32, value: u64) -> Result<Self, TemporalError> {
        if radix == 0 {
            return Err(TemporalError::InvalidArgument(
                "interval length radix must be positive".to_string(),
            ));
        }
        Ok(Self {
            unit,
            radix,
            factor,
            value,
        })
    }

    /// A plain count of whole units (radix 1, factor 0).
    pub fn whole(unit: TimeUnit, value: u64) -> Self {
        Self {
            unit,
            radix: 1,
            factor: 0,
            value,
        }
    }

    pub fn to_millis(&self) -> f64 {
        let scale = f64::from(self.radix).powi(-self.factor);
        self.value as f64 * scale * self.unit.millis() as f64
    }

    /// Rounded to whole milliseconds, then decomposed like any other millisecond count.
    pub fn to_period_duration(&self) -> PeriodDuration {
        let millis = self.to_millis().round();
        // `as` saturates for out-of-range floats
        PeriodDuration::from_millis(millis as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_units() {
        let len = IntervalLength::whole(TimeUnit::Hour, 3);
        assert_eq!(len.to_millis(), 10_800_000.0);
        assert_eq!(len.to_period_duration().to_string(), "PT3H");
    }

    #[test]
    fn test_scaled_down() {
        let len = IntervalLength::new(TimeUnit::Second, 10, 3, 250).unwrap();
        assert!((len.to_millis() - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_scaled_up() {
        let len = IntervalLength::new(TimeUnit::Day, 10, -1, 2).unwrap();
        assert_eq!(len.to_period_duration().to_string(), "P2W6D");
    }

    #[test]
    fn test_zero_radix_rejected() {
        let err = IntervalLength::new(TimeUnit::Day, 0, 0, 1).unwrap_err();
        assert!(err.to_string().contains("radix"), "got: {err}");
    }
}
