//! Gaps between primitives and the length of a period.
//!
//! Both computations go through the relation classifier: the distance is zero
//! whenever the operands touch or overlap, and only `Before`/`After` pairs
//! have a gap to measure.

use chrono::{DateTime, Utc};

use crate::duration::PeriodDuration;
use crate::primitive::{Period, TemporalPrimitive};
use crate::relation::{relate, Bounds};

/// Absolute gap in milliseconds between `a` and `b`.
///
/// Zero for every relation other than `Before`/`After`; otherwise the
/// smallest boundary-to-boundary gap. `None` when the operands are
/// incomparable.
pub fn distance_millis(a: &TemporalPrimitive, b: &TemporalPrimitive) -> Option<u64> {
    Some(gap_millis(Bounds::of(a)?, Bounds::of(b)?))
}

/// The gap between `a` and `b` as a duration.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tm_temporal::{distance, Instant, Period, TemporalPrimitive};
///
/// let day = |d| Utc.with_ymd_and_hms(2020, 1, d, 0, 0, 0).unwrap();
/// let p = TemporalPrimitive::from(Period::between(day(1), day(5)).unwrap());
/// let t = TemporalPrimitive::from(Instant::at(day(8)));
/// assert_eq!(distance(&p, &t).unwrap().to_string(), "P3D");
/// ```
pub fn distance(a: &TemporalPrimitive, b: &TemporalPrimitive) -> Option<PeriodDuration> {
    distance_millis(a, b).map(PeriodDuration::from_millis)
}

/// Zero for an instant; for a period, the distance between its own
/// beginning and ending. `None` for topological primitives and unresolved
/// boundaries.
pub fn length(primitive: &TemporalPrimitive) -> Option<PeriodDuration> {
    match primitive {
        TemporalPrimitive::Instant(instant) => {
            instant.date()?;
            Some(PeriodDuration::zero())
        }
        TemporalPrimitive::Period(period) => period_length(period),
        TemporalPrimitive::Topological(_) => None,
    }
}

pub(crate) fn period_length(period: &Period) -> Option<PeriodDuration> {
    let begin = Bounds::of_instant(period.beginning())?;
    let end = Bounds::of_instant(period.ending())?;
    Some(PeriodDuration::from_millis(gap_millis(begin, end)))
}

fn gap_millis(a: Bounds, b: Bounds) -> u64 {
    if !relate(a, b).is_disjoint() {
        return 0;
    }
    match (a, b) {
        (Bounds::Point(x), Bounds::Point(y)) => abs_millis(x, y),
        (Bounds::Point(t), Bounds::Span(begin, end))
        | (Bounds::Span(begin, end), Bounds::Point(t)) => {
            abs_millis(t, begin).min(abs_millis(t, end))
        }
        (Bounds::Span(ab, ae), Bounds::Span(bb, be)) => {
            abs_millis(be, ab).min(abs_millis(bb, ae))
        }
    }
}

fn abs_millis(x: DateTime<Utc>, y: DateTime<Utc>) -> u64 {
    (x - y).num_milliseconds().unsigned_abs()
}

// ── Tests ───────────────────────────────────────────────────────────────────
