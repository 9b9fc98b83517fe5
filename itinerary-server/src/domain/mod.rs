//! Domain types for the itinerary planner.
//!
//! This module contains the validated feed types (stops, trips, calendar)
//! and the leg tree the planner produces. All types enforce their
//! invariants at construction time, so code that receives these types can
//! trust their validity.

mod calendar;
mod error;
mod ids;
mod leg;
mod stop;
mod time;
mod trip;

pub use calendar::{CalendarEntry, CalendarException, ExceptionKind, WeekdayMask};
pub use error::DomainError;
pub use ids::{InvalidId, RouteId, ServiceId, StopId, TripId};
pub use leg::{Leg, LegId, LegIter, LegKind};
pub use stop::{Coordinate, Stop};
pub use time::{ClockTime, TimeError};
pub use trip::{StopVisit, Trip};
