use geo::Point;
use serde::{Deserialize, Serialize};

/// Seconds since midnight of the service day
pub type Time = u32;
/// Dense index of a stop in [`TransitNetwork::stops`](super::TransitNetwork)
pub type RaptorStopId = usize;
/// Dense index of a (route, direction) pattern
pub type RouteId = usize;
/// Dense index of a trip
pub type TripId = usize;
/// Dense index into the stop time arena
pub type StopTimeId = usize;

/// GTFS `direction_id`. A route id may run two physically distinct
/// patterns, so routes are keyed by (route id, direction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Outbound,
    Inbound,
}

impl Direction {
    /// Parses a GTFS `direction_id` field; an empty field means a single
    /// direction feed.
    pub fn from_gtfs(value: &str) -> Option<Self> {
        match value.trim() {
            "" | "0" => Some(Direction::Outbound),
            "1" => Some(Direction::Inbound),
            _ => None,
        }
    }

    pub fn as_gtfs(self) -> u8 {
        match self {
            Direction::Outbound => 0,
            Direction::Inbound => 1,
        }
    }
}

/// Transit stop
///
/// The `*_start`/`*_len` pairs are ranges into the flat vectors of
/// [`TransitNetwork`](super::TransitNetwork).
#[derive(Debug, Clone)]
pub struct Stop {
    /// GTFS identifier
    pub stop_id: String,
    /// Display name
    pub name: String,
    /// Stop location (lon, lat)
    pub geometry: Point<f64>,
    /// Stop times calling here, ascending by departure
    pub departures_start: usize,
    pub departures_len: usize,
    /// Routes serving the stop
    pub routes_start: usize,
    pub routes_len: usize,
    /// Footpaths leaving the stop
    pub footpaths_start: usize,
    pub footpaths_len: usize,
}

impl Stop {
    pub fn new(stop_id: String, name: String, geometry: Point<f64>) -> Self {
        Self {
            stop_id,
            name,
            geometry,
            departures_start: 0,
            departures_len: 0,
            routes_start: 0,
            routes_len: 0,
            footpaths_start: 0,
            footpaths_len: 0,
        }
    }
}

/// Route pattern for one (route id, direction) pair
#[derive(Debug, Clone)]
pub struct Route {
    pub route_id: String,
    pub short_name: String,
    pub direction: Direction,
    /// Canonical stop pattern, taken from the trip with most stop times
    pub stops_start: usize,
    pub num_stops: usize,
    /// Trips sorted by arrival at their first stop
    pub trips_start: usize,
    pub num_trips: usize,
}

#[derive(Debug, Clone)]
pub struct Trip {
    pub trip_id: String,
    pub route: RouteId,
    pub direction: Direction,
    /// Contiguous range of the stop time arena, ascending by stop sequence
    pub stop_times_start: usize,
    pub num_stop_times: usize,
}

impl Trip {
    pub fn stop_times_range(&self) -> std::ops::Range<StopTimeId> {
        self.stop_times_start..self.stop_times_start + self.num_stop_times
    }
}

/// A single call of a trip at a stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopTime {
    pub trip: TripId,
    pub stop: RaptorStopId,
    pub arrival: Time,
    pub departure: Time,
    pub stop_sequence: u32,
}

/// Walking connection to another stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footpath {
    pub target_stop: RaptorStopId,
    /// Walking time in seconds
    pub duration: Time,
}
