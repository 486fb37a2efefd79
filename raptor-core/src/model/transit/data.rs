//! Indexed public transit network and methods to work with it

use chrono::NaiveDate;
use hashbrown::HashMap;

use super::types::{
    Footpath, RaptorStopId, Route, RouteId, Stop, StopTime, StopTimeId, Time, Trip, TripId,
};
use crate::loading::IndexReport;
use crate::routing::raptor::RaptorError;

/// Main public transit data structure, built once by
/// [`index_network`](crate::loading::index_network) and read-only afterwards.
///
/// Entities refer to each other by dense indices; variable length
/// associations are stored in flat vectors addressed by the
/// `*_start`/`*_len` ranges kept on the owning entity.
#[derive(Debug, Clone, Default)]
pub struct TransitNetwork {
    /// All stops
    pub stops: Vec<Stop>,
    /// All (route, direction) patterns
    pub routes: Vec<Route>,
    /// All trips, grouped by route
    pub trips: Vec<Trip>,
    /// Stop times, grouped by trip and ascending by stop sequence
    pub stop_times: Vec<StopTime>,
    /// Canonical stop pattern for each route
    pub route_stops: Vec<RaptorStopId>,
    /// Trips of each route, ascending by first arrival
    pub route_trips: Vec<TripId>,
    /// Stop times at each stop, ascending by departure
    pub stop_departures: Vec<StopTimeId>,
    /// Routes through each stop
    pub stop_routes: Vec<RouteId>,
    /// Footpaths between stops
    pub footpaths: Vec<Footpath>,
    /// Service day the timetable was filtered for, if any
    pub service_date: Option<NaiveDate>,
    /// Entities skipped while indexing
    pub index_report: IndexReport,
    pub(crate) stop_lookup: HashMap<String, RaptorStopId>,
    pub(crate) trip_lookup: HashMap<String, TripId>,
}

impl TransitNetwork {
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }

    /// Resolves a GTFS stop id
    pub fn stop_by_id(&self, stop_id: &str) -> Option<RaptorStopId> {
        self.stop_lookup.get(stop_id).copied()
    }

    /// Resolves a GTFS trip id
    pub fn trip_by_id(&self, trip_id: &str) -> Option<TripId> {
        self.trip_lookup.get(trip_id).copied()
    }

    /// check if such stop exists
    pub(crate) fn validate_stop(&self, stop: RaptorStopId) -> Result<(), RaptorError> {
        if stop >= self.stops.len() {
            Err(RaptorError::InvalidStop)
        } else {
            Ok(())
        }
    }

    /// Canonical stops for specific route
    pub fn get_route_stops(&self, route_id: RouteId) -> Result<&[RaptorStopId], RaptorError> {
        self.routes
            .get(route_id)
            .ok_or(RaptorError::InvalidRoute)
            .and_then(|route| {
                let end = route.stops_start + route.num_stops;
                if end > self.route_stops.len() {
                    Err(RaptorError::InvalidRoute)
                } else {
                    Ok(&self.route_stops[route.stops_start..end])
                }
            })
    }

    /// Trips for specific route, in first arrival order
    pub fn get_route_trips(&self, route_id: RouteId) -> Result<&[TripId], RaptorError> {
        let route = self.routes.get(route_id).ok_or(RaptorError::InvalidRoute)?;
        let end = route.trips_start + route.num_trips;
        if end > self.route_trips.len() {
            Err(RaptorError::InvalidRoute)
        } else {
            Ok(&self.route_trips[route.trips_start..end])
        }
    }

    /// `StopTime` slice for specific trip
    pub fn get_trip(&self, trip_id: TripId) -> Result<&[StopTime], RaptorError> {
        let trip = self.trips.get(trip_id).ok_or(RaptorError::InvalidTrip)?;
        self.stop_times
            .get(trip.stop_times_range())
            .ok_or(RaptorError::InvalidTrip)
    }

    /// Stop times calling at the stop, ascending by departure
    pub(crate) fn stop_departures(&self, stop_idx: RaptorStopId) -> &[StopTimeId] {
        let stop = &self.stops[stop_idx];
        &self.stop_departures[stop.departures_start..stop.departures_start + stop.departures_len]
    }

    /// Returns routes through the specified stop
    pub fn routes_for_stop(&self, stop_idx: RaptorStopId) -> &[RouteId] {
        let start = self.stops[stop_idx].routes_start;
        let end = start + self.stops[stop_idx].routes_len;
        &self.stop_routes[start..end]
    }

    /// Returns footpaths from the specified stop
    pub fn get_stop_footpaths(&self, stop_id: RaptorStopId) -> Result<&[Footpath], RaptorError> {
        self.validate_stop(stop_id)?;
        let stop = &self.stops[stop_id];
        let end = stop.footpaths_start + stop.footpaths_len;
        if end > self.footpaths.len() {
            Err(RaptorError::InvalidStop)
        } else {
            Ok(&self.footpaths[stop.footpaths_start..end])
        }
    }

    /// Walking time between two stops, if a footpath exists
    pub fn footpath_duration(&self, from: RaptorStopId, to: RaptorStopId) -> Option<Time> {
        self.get_stop_footpaths(from)
            .ok()?
            .iter()
            .find(|footpath| footpath.target_stop == to)
            .map(|footpath| footpath.duration)
    }

    /// Get the location of a transit stop by ID
    pub fn transit_stop_location(&self, stop_id: RaptorStopId) -> geo::Point<f64> {
        if stop_id < self.stops.len() {
            self.stops[stop_id].geometry
        } else {
            // Default coordinates if stop ID is invalid
            geo::Point::new(0.0, 0.0)
        }
    }

    /// Get the name of a transit stop by ID
    pub fn transit_stop_name(&self, stop_id: RaptorStopId) -> Option<&str> {
        self.stops.get(stop_id).map(|stop| stop.name.as_str())
    }
}
