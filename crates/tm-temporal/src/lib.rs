//! # tm-temporal
//!
//! Temporal objects after the ISO 19108 "TM_" model.
//!
//! The crate provides instants, periods, temporal positions and durations,
//! together with the computations applications actually need over them:
//! Allen-relation classification, gap and length evaluation, the ISO 8601
//! period-duration codec and a heuristic parser for human-entered dates.
//!
//! ## Modules
//!
//! - [`duration`] — ISO 8601 `PnYnMnWnDTnHnMnS` durations ↔ text ↔ milliseconds
//! - [`interval_length`] — unit/radix/factor interval lengths
//! - [`position`] — temporal positions (calendar, Julian, ordinal era, ...) → absolute timestamp
//! - [`primitive`] — instants, periods and the primitive sum type
//! - [`relation`] — Allen relation between two primitives
//! - [`distance`] — gap between primitives and length of a period
//! - [`topology`] — nodes and edges realized by instants and periods
//! - [`flexible`] — human-entered date strings → absolute timestamp
//! - [`options`] — parser options
//! - [`tz_cache`] — process-wide timezone lookup cache
//! - [`error`] — Error types

pub mod distance;
pub mod duration;
pub mod error;
pub mod flexible;
pub mod interval_length;
pub mod options;
pub mod position;
pub mod primitive;
pub mod relation;
pub mod topology;
pub mod tz_cache;

pub use distance::{distance, distance_millis, length};
pub use duration::PeriodDuration;
pub use error::TemporalError;
pub use flexible::{parse_flexible, FlexibleDateParser};
pub use interval_length::{IntervalLength, TimeUnit};
pub use options::ParseOptions;
pub use position::{
    CalendarDate, CalendarSystem, ClockTime, DateAndTime, IndeterminateValue, JulianDate,
    OrdinalEra, OrdinalPosition, Position, TemporalCoordinate, TemporalCoordinateSystem,
};
pub use primitive::{Instant, Period, TemporalPrimitive};
pub use relation::{relative_position, Relation};
pub use topology::{Edge, EdgeId, Node, NodeId, TopologicalComplex, TopologicalPrimitive};
pub use tz_cache::resolve_timezone;
