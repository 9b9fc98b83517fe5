//! Itinerary planner.
//!
//! This module answers: "if I leave at this time and visit these stops in
//! order, which ferries and drives can I take, and what follows each?"
//!
//! The engine expands every option for each stop pair into a tree of legs,
//! and the relation index answers ancestor and descendant queries over it.

mod config;
mod expand;
mod itinerary;
mod relations;


pub use config::{
    ConfigError, EngineConfig, MAX_DISEMBARK_MINS, MAX_DRIVE_MULTIPLIER, MAX_DRIVE_MULTIPLIERS,
    MAX_FERRY_OPTIONS,
};
pub use expand::{Engine, PlanError, Timetable, stop_pairs};
pub use itinerary::{Itinerary, PathSummary};
pub use relations::LegRelations;
