//! Public transit network model

pub mod data;
pub mod types;

pub use data::TransitNetwork;
pub use types::{
    Direction, Footpath, RaptorStopId, Route, RouteId, Stop, StopTime, StopTimeId, Time, Trip,
    TripId,
};
