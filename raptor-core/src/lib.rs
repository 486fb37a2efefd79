//! Earliest-arrival public transit routing with RAPTOR.
//!
//! The crate is organised the way the data flows: GTFS tables are loaded
//! into typed records ([`loading`]), indexed once into an immutable
//! [`TransitNetwork`] ([`model`]) and queried with the round-based scanner
//! ([`routing`]).

pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;
pub mod time;

pub use error::Error;
pub use model::{
    Direction, Footpath, RaptorStopId, Route, RouteId, Stop, StopTime, StopTimeId, Time,
    TransitNetwork, Trip, TripId,
};

/// Largest departure time accepted by a query: GTFS times of a single
/// service day may run past midnight, but never past the second day.
pub const MAX_DEPARTURE_TIME: Time = 86400 * 2;
