//! Allen relations between temporal primitives.
//!
//! [`relative_position`] classifies how one instant or period lies with
//! respect to another. The classification is a set of pure decision tables
//! over boundary comparisons, generic over any `Ord` time value so that the
//! tables can be exercised with plain integers.
//!
//! A result of `None` means the primitives are incomparable: one of them is a
//! topological primitive, or one of the positions involved does not resolve
//! to a date.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::primitive::{Instant, Period, TemporalPrimitive};

/// The thirteen Allen relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Before,
    After,
    Equals,
    Begins,
    BegunBy,
    Ends,
    EndedBy,
    During,
    Contains,
    Meets,
    MetBy,
    Overlaps,
    OverlappedBy,
}

impl Relation {
    pub const ALL: [Relation; 13] = [
        Relation::Before,
        Relation::After,
        Relation::Equals,
        Relation::Begins,
        Relation::BegunBy,
        Relation::Ends,
        Relation::EndedBy,
        Relation::During,
        Relation::Contains,
        Relation::Meets,
        Relation::MetBy,
        Relation::Overlaps,
        Relation::OverlappedBy,
    ];

    /// The relation seen from the other operand.
    pub fn inverse(self) -> Relation {
        match self {
            Relation::Before => Relation::After,
            Relation::After => Relation::Before,
            Relation::Equals => Relation::Equals,
            Relation::Begins => Relation::BegunBy,
            Relation::BegunBy => Relation::Begins,
            Relation::Ends => Relation::EndedBy,
            Relation::EndedBy => Relation::Ends,
            Relation::During => Relation::Contains,
            Relation::Contains => Relation::During,
            Relation::Meets => Relation::MetBy,
            Relation::MetBy => Relation::Meets,
            Relation::Overlaps => Relation::OverlappedBy,
            Relation::OverlappedBy => Relation::Overlaps,
        }
    }

    /// True only for `Before` and `After`: the operands share no point.
    pub fn is_disjoint(self) -> bool {
        matches!(self, Relation::Before | Relation::After)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Relation::Before => "before",
            Relation::After => "after",
            Relation::Equals => "equals",
            Relation::Begins => "begins",
            Relation::BegunBy => "begun_by",
            Relation::Ends => "ends",
            Relation::EndedBy => "ended_by",
            Relation::During => "during",
            Relation::Contains => "contains",
            Relation::Meets => "meets",
            Relation::MetBy => "met_by",
            Relation::Overlaps => "overlaps",
            Relation::OverlappedBy => "overlapped_by",
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Resolved boundaries ─────────────────────────────────────────────────────

/// A primitive reduced to its resolved boundary dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bounds {
    Point(DateTime<Utc>),
    Span(DateTime<Utc>, DateTime<Utc>),
}

impl Bounds {
    pub(crate) fn of(primitive: &TemporalPrimitive) -> Option<Bounds> {
        match primitive {
            TemporalPrimitive::Instant(instant) => Self::of_instant(instant),
            TemporalPrimitive::Period(period) => Self::of_period(period),
            TemporalPrimitive::Topological(_) => {
                debug!("topological primitives have no relative position");
                None
            }
        }
    }

    pub(crate) fn of_instant(instant: &Instant) -> Option<Bounds> {
        instant.date().map(Bounds::Point)
    }

    pub(crate) fn of_period(period: &Period) -> Option<Bounds> {
        Some(Bounds::Span(
            period.beginning().date()?,
            period.ending().date()?,
        ))
    }
}

pub(crate) fn relate(a: Bounds, b: Bounds) -> Relation {
    match (a, b) {
        (Bounds::Point(x), Bounds::Point(y)) => classify_points(x, y),
        (Bounds::Span(begin, end), Bounds::Point(t)) => classify_span_point(begin, end, t),
        (Bounds::Point(t), Bounds::Span(begin, end)) => {
            classify_span_point(begin, end, t).inverse()
        }
        (Bounds::Span(ab, ae), Bounds::Span(bb, be)) => classify_spans(ab, ae, bb, be),
    }
}

// ── Public API ──────────────────────────────────────────────────────────────

/// The relation of `a` with respect to `b`.
///
/// Returns `None` when either operand is a topological primitive or has a
/// boundary whose position does not resolve to a date.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tm_temporal::{relative_position, Period, Relation, TemporalPrimitive};
///
/// let day = |d| Utc.with_ymd_and_hms(2020, 1, d, 0, 0, 0).unwrap();
/// let a = TemporalPrimitive::from(Period::between(day(1), day(5)).unwrap());
/// let b = TemporalPrimitive::from(Period::between(day(5), day(9)).unwrap());
/// assert_eq!(relative_position(&a, &b), Some(Relation::Meets));
/// ```
pub fn relative_position(a: &TemporalPrimitive, b: &TemporalPrimitive) -> Option<Relation> {
    let relation = relate(Bounds::of(a)?, Bounds::of(b)?);
    Some(relation)
}

// ── Decision tables ─────────────────────────────────────────────────────────

/// Point × point.
pub(crate) fn classify_points<T: Ord>(a: T, b: T) -> Relation {
    match a.cmp(&b) {
        Ordering::Less => Relation::Before,
        Ordering::Equal => Relation::Equals,
        Ordering::Greater => Relation::After,
    }
}

/// Span `[begin, end]` × point `t`, relation of the span.
///
/// | condition | relation |
/// |---|---|
/// | `end < t` | Before |
/// | `end == t` | EndedBy |
/// | `begin < t < end` | Contains |
/// | `begin == t` | BegunBy |
/// | `t < begin` | After |
///
/// Rows are checked top to bottom, so a zero-length span at `t` is EndedBy.
pub(crate) fn classify_span_point<T: Ord>(begin: T, end: T, t: T) -> Relation {
    match (end.cmp(&t), begin.cmp(&t)) {
        (Ordering::Less, _) => Relation::Before,
        (Ordering::Equal, _) => Relation::EndedBy,
        (Ordering::Greater, Ordering::Less) => Relation::Contains,
        (Ordering::Greater, Ordering::Equal) => Relation::BegunBy,
        (Ordering::Greater, Ordering::Greater) => Relation::After,
    }
}

/// Span `a = [ab, ae]` × span `b = [bb, be]`, relation of `a`.
///
/// A zero-length span is a point: two of them compare as instants, and one
/// against a proper span goes through the span × point table.
///
/// | condition | relation |
/// |---|---|
/// | `ab == ae`, `bb == be` | instant × instant |
/// | `ab == ae` | inverse of span `b` × point `ab` |
/// | `bb == be` | span `a` × point `bb` |
/// | `ae < bb` | Before |
/// | `ae == bb` | Meets |
/// | `ab < bb < ae < be` | Overlaps |
/// | `ab == bb`, `ae < be` | Begins |
/// | `ab == bb`, `ae > be` | BegunBy |
/// | `ab > bb`, `ae < be` | During |
/// | `ab < bb`, `ae > be` | Contains |
/// | `ab == bb`, `ae == be` | Equals |
/// | `bb < ab < be < ae` | OverlappedBy |
/// | `ab > bb`, `ae == be` | Ends |
/// | `ab < bb`, `ae == be` | EndedBy |
/// | `ab == be` | MetBy |
/// | otherwise (`ab > be`) | After |
///
/// Below the zero-length rows, exactly one row matches.
pub(crate) fn classify_spans<T: Ord>(ab: T, ae: T, bb: T, be: T) -> Relation {
    match (ab == ae, bb == be) {
        (true, true) => return classify_points(ab, bb),
        (true, false) => return classify_span_point(bb, be, ab).inverse(),
        (false, true) => return classify_span_point(ab, ae, bb),
        (false, false) => {}
    }
    if ae < bb {
        Relation::Before
    } else if ae == bb {
        Relation::Meets
    } else if ab < bb && ae < be {
        // ae > bb holds here
        Relation::Overlaps
    } else if ab == bb && ae < be {
        Relation::Begins
    } else if ab == bb && ae > be {
        Relation::BegunBy
    } else if ab > bb && ae < be {
        Relation::During
    } else if ab < bb && ae > be {
        Relation::Contains
    } else if ab == bb && ae == be {
        Relation::Equals
    } else if ab > bb && ab < be && ae > be {
        Relation::OverlappedBy
    } else if ab > bb && ae == be {
        Relation::Ends
    } else if ab < bb && ae == be {
        Relation::EndedBy
    } else if ab == be {
        Relation::MetBy
    } else {
        Relation::After
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{IndeterminateValue, Position};
    use crate::topology::{Node, TopologicalPrimitive};
    use chrono::TimeZone;

    fn day(m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, m, d, 0, 0, 0).unwrap()
    }

    fn instant(m: u32, d: u32) -> TemporalPrimitive {
        Instant::at(day(m, d)).into()
    }

    fn period(from: (u32, u32), to: (u32, u32)) -> TemporalPrimitive {
        Period::between(day(from.0, from.1), day(to.0, to.1))
            .unwrap()
            .into()
    }

    // ── Decision tables ─────────────────────────────────────────────────

    #[test]
    fn test_points_table() {
        assert_eq!(classify_points(1, 2), Relation::Before);
        assert_eq!(classify_points(2, 2), Relation::Equals);
        assert_eq!(classify_points(3, 2), Relation::After);
    }

    #[test]
    fn test_span_point_table() {
        // span [10, 20]
        assert_eq!(classify_span_point(10, 20, 25), Relation::Before);
        assert_eq!(classify_span_point(10, 20, 20), Relation::EndedBy);
        assert_eq!(classify_span_point(10, 20, 15), Relation::Contains);
        assert_eq!(classify_span_point(10, 20, 10), Relation::BegunBy);
        assert_eq!(classify_span_point(10, 20, 5), Relation::After);
    }

    #[test]
    fn test_span_point_zero_length_span() {
        assert_eq!(classify_span_point(10, 10, 10), Relation::EndedBy);
    }

    #[test]
    fn test_spans_table_covers_all_thirteen() {
        // b = [10, 20] throughout
        let rows = [
            ((0, 5), Relation::Before),
            ((0, 10), Relation::Meets),
            ((5, 15), Relation::Overlaps),
            ((10, 15), Relation::Begins),
            ((10, 25), Relation::BegunBy),
            ((12, 18), Relation::During),
            ((5, 25), Relation::Contains),
            ((10, 20), Relation::Equals),
            ((15, 25), Relation::OverlappedBy),
            ((15, 20), Relation::Ends),
            ((5, 20), Relation::EndedBy),
            ((20, 25), Relation::MetBy),
            ((25, 30), Relation::After),
        ];
        for ((ab, ae), expected) in rows {
            assert_eq!(
                classify_spans(ab, ae, 10, 20),
                expected,
                "a = [{ab}, {ae}]"
            );
        }
        let seen: std::collections::HashSet<_> = rows.iter().map(|(_, r)| *r).collect();
        assert_eq!(seen.len(), Relation::ALL.len());
    }

    #[test]
    fn test_spans_inverse_symmetry() {
        let bounds = [(0, 5), (0, 10), (5, 15), (10, 15), (10, 25), (12, 18), (5, 25), (10, 20)];
        for (ab, ae) in bounds {
            for (bb, be) in bounds {
                assert_eq!(
                    classify_spans(ab, ae, bb, be),
                    classify_spans(bb, be, ab, ae).inverse(),
                    "a = [{ab}, {ae}], b = [{bb}, {be}]"
                );
            }
        }
    }

    #[test]
    fn test_spans_zero_length_behaves_as_point() {
        // a = [10, 10] against b = [10, 20]
        assert_eq!(classify_spans(10, 10, 10, 20), Relation::Begins);
        assert_eq!(classify_spans(10, 20, 10, 10), Relation::BegunBy);
        assert_eq!(classify_spans(20, 20, 10, 20), Relation::Ends);
        assert_eq!(classify_spans(15, 15, 10, 20), Relation::During);
        assert_eq!(classify_spans(5, 5, 10, 20), Relation::Before);
        assert_eq!(classify_spans(7, 7, 7, 7), Relation::Equals);
        assert_eq!(classify_spans(7, 7, 8, 8), Relation::Before);
    }

    #[test]
    fn test_spans_inverse_symmetry_with_zero_length() {
        let bounds = [(0, 0), (5, 5), (10, 10), (20, 20), (5, 9), (5, 15), (10, 20), (0, 30)];
        for (ab, ae) in bounds {
            for (bb, be) in bounds {
                assert_eq!(
                    classify_spans(ab, ae, bb, be),
                    classify_spans(bb, be, ab, ae).inverse(),
                    "a = [{ab}, {ae}], b = [{bb}, {be}]"
                );
            }
        }
    }

    // ── Relation ────────────────────────────────────────────────────────

    #[test]
    fn test_inverse_is_involution() {
        for r in Relation::ALL {
            assert_eq!(r.inverse().inverse(), r);
        }
    }

    #[test]
    fn test_is_disjoint() {
        let disjoint: Vec<_> = Relation::ALL.into_iter().filter(|r| r.is_disjoint()).collect();
        assert_eq!(disjoint, vec![Relation::Before, Relation::After]);
    }

    #[test]
    fn test_display_matches_serde() {
        for r in Relation::ALL {
            let json = serde_json::to_string(&r).unwrap();
            assert_eq!(json, format!("\"{r}\""));
        }
    }

    // ── relative_position ───────────────────────────────────────────────

    #[test]
    fn test_instants() {
        assert_eq!(
            relative_position(&instant(1, 1), &instant(1, 2)),
            Some(Relation::Before)
        );
        assert_eq!(
            relative_position(&instant(1, 2), &instant(1, 2)),
            Some(Relation::Equals)
        );
        assert_eq!(
            relative_position(&instant(1, 3), &instant(1, 2)),
            Some(Relation::After)
        );
    }

    #[test]
    fn test_period_and_instant() {
        let p = period((1, 10), (1, 20));
        let cases = [
            ((1, 25), Relation::Before),
            ((1, 20), Relation::EndedBy),
            ((1, 15), Relation::Contains),
            ((1, 10), Relation::BegunBy),
            ((1, 5), Relation::After),
        ];
        for ((m, d), expected) in cases {
            let t = instant(m, d);
            assert_eq!(relative_position(&p, &t), Some(expected));
            assert_eq!(relative_position(&t, &p), Some(expected.inverse()));
        }
    }

    #[test]
    fn test_periods_meet() {
        let a = period((1, 1), (6, 1));
        let b = period((6, 1), (12, 1));
        assert_eq!(relative_position(&a, &b), Some(Relation::Meets));
        assert_eq!(relative_position(&b, &a), Some(Relation::MetBy));
    }

    #[test]
    fn test_periods_during() {
        let a = period((3, 1), (4, 1));
        let b = period((1, 1), (12, 1));
        assert_eq!(relative_position(&a, &b), Some(Relation::During));
        assert_eq!(relative_position(&b, &a), Some(Relation::Contains));
    }

    #[test]
    fn test_unresolved_instant_is_none() {
        let unknown = TemporalPrimitive::from(Instant::new(Position::from(
            IndeterminateValue::Unknown,
        )));
        assert_eq!(relative_position(&unknown, &instant(1, 1)), None);
        assert_eq!(relative_position(&period((1, 1), (2, 1)), &unknown), None);
    }

    #[test]
    fn test_topological_operand_is_none() {
        let node = TemporalPrimitive::Topological(TopologicalPrimitive::Node(Node::new(Some(
            Instant::at(day(1, 1)),
        ))));
        assert_eq!(relative_position(&node, &instant(1, 1)), None);
        assert_eq!(relative_position(&instant(1, 1), &node), None);
    }
}
