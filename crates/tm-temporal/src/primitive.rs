//! Instants, periods and the primitive sum type.
//!
//! A [`Period`] keeps its boundaries private so that the
//! beginning-not-after-ending invariant holds for its whole life: it is
//! checked by [`Period::new`], by every setter and on deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::distance;
use crate::duration::PeriodDuration;
use crate::error::TemporalError;
use crate::position::Position;
use crate::relation::{self, Bounds, Relation};
use crate::topology::TopologicalPrimitive;

// ── Instant ─────────────────────────────────────────────────────────────────

/// A zero-dimensional point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instant {
    pub position: Position,
    /// Periods this instant is the beginning of.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub begun_by: Vec<Period>,
    /// Periods this instant is the ending of.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ended_by: Vec<Period>,
}

impl Instant {
    pub fn new(position: impl Into<Position>) -> Self {
        Self {
            position: position.into(),
            begun_by: Vec::new(),
            ended_by: Vec::new(),
        }
    }

    /// An instant at an absolute UTC date.
    pub fn at(date: DateTime<Utc>) -> Self {
        Self::new(date)
    }

    /// The resolved date, or `None` if the position cannot be normalized.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.position.resolve()
    }

    /// Record a period that begins at this instant.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::InvalidArgument`] if the period's beginning
    /// is not at this instant.
    pub fn add_begun_by(&mut self, period: Period) -> Result<(), TemporalError> {
        if period.beginning().date().is_none() || period.beginning().date() != self.date() {
            return Err(TemporalError::InvalidArgument(
                "period does not begin at this instant".to_string(),
            ));
        }
        self.begun_by.push(period);
        Ok(())
    }

    /// Record a period that ends at this instant.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::InvalidArgument`] if the period's ending is
    /// not at this instant.
    pub fn add_ended_by(&mut self, period: Period) -> Result<(), TemporalError> {
        if period.ending().date().is_none() || period.ending().date() != self.date() {
            return Err(TemporalError::InvalidArgument(
                "period does not end at this instant".to_string(),
            ));
        }
        self.ended_by.push(period);
        Ok(())
    }

    pub fn relative_position(&self, other: &TemporalPrimitive) -> Option<Relation> {
        Some(relation::relate(Bounds::of_instant(self)?, Bounds::of(other)?))
    }
}

// ── Period ──────────────────────────────────────────────────────────────────

/// A one-dimensional interval bounded by two instants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PeriodBounds")]
pub struct Period {
    beginning: Box<Instant>,
    ending: Box<Instant>,
}

/// Serialized form of a [`Period`], checked by [`Period::new`] on the way in.
#[derive(Deserialize)]
struct PeriodBounds {
    beginning: Instant,
    ending: Instant,
}

impl TryFrom<PeriodBounds> for Period {
    type Error = TemporalError;

    fn try_from(bounds: PeriodBounds) -> Result<Self, Self::Error> {
        Period::new(bounds.beginning, bounds.ending)
    }
}

impl Period {
    /// # Errors
    ///
    /// Returns [`TemporalError::InvalidArgument`] if either boundary does not
    /// resolve to a date or if the beginning is after the ending.
    pub fn new(beginning: Instant, ending: Instant) -> Result<Self, TemporalError> {
        check_order(&beginning, &ending)?;
        Ok(Self {
            beginning: Box::new(beginning),
            ending: Box::new(ending),
        })
    }

    /// A period between two absolute UTC dates.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::InvalidArgument`] if `beginning` is after `ending`.
    pub fn between(beginning: DateTime<Utc>, ending: DateTime<Utc>) -> Result<Self, TemporalError> {
        Self::new(Instant::at(beginning), Instant::at(ending))
    }

    pub fn beginning(&self) -> &Instant {
        &self.beginning
    }

    pub fn ending(&self) -> &Instant {
        &self.ending
    }

    /// Replace the beginning, keeping the period unchanged on error.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Period::new`].
    pub fn set_beginning(&mut self, beginning: Instant) -> Result<(), TemporalError> {
        check_order(&beginning, &self.ending)?;
        self.beginning = Box::new(beginning);
        Ok(())
    }

    /// Replace the ending, keeping the period unchanged on error.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Period::new`].
    pub fn set_ending(&mut self, ending: Instant) -> Result<(), TemporalError> {
        check_order(&self.beginning, &ending)?;
        self.ending = Box::new(ending);
        Ok(())
    }

    pub fn relative_position(&self, other: &TemporalPrimitive) -> Option<Relation> {
        Some(relation::relate(Bounds::of_period(self)?, Bounds::of(other)?))
    }

    /// Length of the period; see [`distance::length`].
    pub fn length(&self) -> Option<PeriodDuration> {
        distance::period_length(self)
    }
}

fn check_order(beginning: &Instant, ending: &Instant) -> Result<(), TemporalError> {
    let (Some(begin), Some(end)) = (beginning.date(), ending.date()) else {
        return Err(TemporalError::InvalidArgument(
            "period boundaries must resolve to dates".to_string(),
        ));
    };
    match relation::classify_points(begin, end) {
        Relation::Before | Relation::Equals => Ok(()),
        _ => Err(TemporalError::InvalidArgument(format!(
            "period beginning {} is after ending {}",
            begin.to_rfc3339(),
            end.to_rfc3339()
        ))),
    }
}

// ── TemporalPrimitive ───────────────────────────────────────────────────────

/// Any temporal primitive: a geometric instant or period, or a topological
/// node or edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalPrimitive {
    Instant(Instant),
    Period(Period),
    Topological(TopologicalPrimitive),
}

impl From<Instant> for TemporalPrimitive {
    fn from(instant: Instant) -> Self {
        TemporalPrimitive::Instant(instant)
    }
}

impl From<Period> for TemporalPrimitive {
    fn from(period: Period) -> Self {
        TemporalPrimitive::Period(period)
    }
}

impl From<TopologicalPrimitive> for TemporalPrimitive {
    fn from(primitive: TopologicalPrimitive) -> Self {
        TemporalPrimitive::Topological(primitive)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
