//! Typed entity tables handed to the indexer

use chrono::NaiveDate;
use geo::Point;

use crate::{Direction, Time};

#[derive(Debug, Clone, PartialEq)]
pub struct StopRecord {
    pub stop_id: String,
    pub name: String,
    /// (lon, lat)
    pub geometry: Point<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRecord {
    pub route_id: String,
    pub short_name: String,
    pub long_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRecord {
    pub trip_id: String,
    pub route_id: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopTimeRecord {
    pub trip_id: String,
    pub stop_id: String,
    pub arrival: Time,
    pub departure: Time,
    pub stop_sequence: u32,
}

/// Validated, in-memory entity tables of a single static schedule
#[derive(Debug, Clone, Default)]
pub struct FeedTables {
    pub stops: Vec<StopRecord>,
    pub routes: Vec<RouteRecord>,
    pub trips: Vec<TripRecord>,
    pub stop_times: Vec<StopTimeRecord>,
    /// Day the schedule was filtered for
    pub service_date: Option<NaiveDate>,
}
