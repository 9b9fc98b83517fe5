//! Web layer for the itinerary planner.
//!
//! Provides JSON endpoints for looking up stops and planning itineraries.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
