//! Data model for public transportation routing
//!
//! Contains types and structures for representing a transit network.

pub mod transit;

pub use transit::data::TransitNetwork;
pub use transit::types::{
    Direction, Footpath, RaptorStopId, Route, RouteId, Stop, StopTime, StopTimeId, Time, Trip,
    TripId,
};
