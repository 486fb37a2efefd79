//! One-time indexing pass turning entity tables into the routing network

use std::collections::BTreeMap;

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use log::{info, warn};
use serde::Serialize;

use super::footpaths::{WalkingModel, calculate_footpaths};
use super::tables::{FeedTables, RouteRecord, StopTimeRecord};
use crate::{Direction, RaptorStopId, Route, Stop, StopTime, TransitNetwork, Trip, TripId};

/// Counts of malformed entities skipped while indexing.
///
/// Malformed entities never fail indexing: each one is dropped with a
/// warning so that the same feed always produces the same network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    pub duplicate_stops: usize,
    pub duplicate_trips: usize,
    pub routes_without_trips: usize,
    pub trips_with_unknown_route: usize,
    pub trips_without_stop_times: usize,
    pub stop_times_with_unknown_trip: usize,
    pub stop_times_with_unknown_stop: usize,
}

impl IndexReport {
    pub fn skipped(&self) -> usize {
        self.duplicate_stops
            + self.duplicate_trips
            + self.routes_without_trips
            + self.trips_with_unknown_route
            + self.trips_without_stop_times
            + self.stop_times_with_unknown_trip
            + self.stop_times_with_unknown_stop
    }
}

/// Trip that survived validation, before it gets its final index
struct TripCandidate {
    trip_id: String,
    calls: Vec<Call>,
}

#[derive(Clone, Copy)]
struct Call {
    stop: RaptorStopId,
    arrival: crate::Time,
    departure: crate::Time,
    stop_sequence: u32,
}

impl TripCandidate {
    fn first_arrival(&self) -> crate::Time {
        self.calls.first().map_or(crate::Time::MAX, |call| call.arrival)
    }
}

/// Build the routing network from entity tables.
///
/// Produces, for every stop, its departure-sorted stop times and the routes
/// serving it; for every trip, its stop-sequence-sorted stop times; for every
/// (route, direction) its first-arrival-sorted trips and canonical stop
/// pattern; and footpaths between stops as given by `walking`.
pub fn index_network<W: WalkingModel + ?Sized>(tables: FeedTables, walking: &W) -> TransitNetwork {
    let FeedTables {
        stops: stop_records,
        routes: route_records,
        trips: trip_records,
        stop_times: stop_time_records,
        service_date,
    } = tables;
    let mut report = IndexReport::default();

    // Stops
    let mut stop_lookup: HashMap<String, RaptorStopId> = HashMap::with_capacity(stop_records.len());
    let mut stops: Vec<Stop> = Vec::with_capacity(stop_records.len());
    for record in stop_records {
        if stop_lookup.contains_key(&record.stop_id) {
            warn!("Duplicate stop '{}' skipped", record.stop_id);
            report.duplicate_stops += 1;
            continue;
        }
        stop_lookup.insert(record.stop_id.clone(), stops.len());
        stops.push(Stop::new(record.stop_id, record.name, record.geometry));
    }

    let route_meta: HashMap<&str, &RouteRecord> = route_records
        .iter()
        .map(|route| (route.route_id.as_str(), route))
        .collect();

    // Trips, keyed by (route id, direction)
    let mut candidate_lookup: HashMap<String, usize> = HashMap::with_capacity(trip_records.len());
    let mut candidate_keys: Vec<(String, Direction)> = Vec::with_capacity(trip_records.len());
    let mut candidates: Vec<TripCandidate> = Vec::with_capacity(trip_records.len());
    for record in trip_records {
        if !route_meta.contains_key(record.route_id.as_str()) {
            warn!(
                "Trip '{}' references unknown route '{}', skipped",
                record.trip_id, record.route_id
            );
            report.trips_with_unknown_route += 1;
            continue;
        }
        if candidate_lookup.contains_key(&record.trip_id) {
            warn!("Duplicate trip '{}' skipped", record.trip_id);
            report.duplicate_trips += 1;
            continue;
        }
        candidate_lookup.insert(record.trip_id.clone(), candidates.len());
        candidate_keys.push((record.route_id, record.direction));
        candidates.push(TripCandidate {
            trip_id: record.trip_id,
            calls: Vec::new(),
        });
    }

    attach_stop_times(
        &mut candidates,
        &candidate_lookup,
        &stop_lookup,
        stop_time_records,
        &mut report,
    );

    // Group trips by (route id, direction); BTreeMap keeps route order stable
    let mut patterns: BTreeMap<(String, Direction), Vec<TripCandidate>> = BTreeMap::new();
    for (candidate, key) in candidates.into_iter().zip(candidate_keys) {
        if candidate.calls.is_empty() {
            warn!("Trip '{}' has no valid stop times, skipped", candidate.trip_id);
            report.trips_without_stop_times += 1;
            continue;
        }
        patterns.entry(key).or_default().push(candidate);
    }

    {
        let served_routes: HashSet<&str> =
            patterns.keys().map(|(route_id, _)| route_id.as_str()).collect();
        for route in &route_records {
            if !served_routes.contains(route.route_id.as_str()) {
                warn!("Route '{}' has no trips, skipped", route.route_id);
                report.routes_without_trips += 1;
            }
        }
    }

    let mut routes: Vec<Route> = Vec::with_capacity(patterns.len());
    let mut trips: Vec<Trip> = Vec::new();
    let mut stop_times: Vec<StopTime> = Vec::new();
    let mut route_stops: Vec<RaptorStopId> = Vec::new();
    let mut route_trips: Vec<TripId> = Vec::new();
    let mut trip_lookup: HashMap<String, TripId> = HashMap::new();

    for ((route_id, direction), route_candidates) in patterns {
        let route_idx = routes.len();
        let sorted = route_candidates
            .into_iter()
            .sorted_by(|a, b| {
                a.first_arrival()
                    .cmp(&b.first_arrival())
                    .then_with(|| a.trip_id.cmp(&b.trip_id))
            })
            .collect::<Vec<_>>();

        // Canonical pattern: the first trip with the most stop times
        let canonical = sorted
            .iter()
            .fold(None::<&TripCandidate>, |best, candidate| match best {
                Some(best) if best.calls.len() >= candidate.calls.len() => Some(best),
                _ => Some(candidate),
            })
            .map(|candidate| candidate.calls.iter().map(|call| call.stop).collect::<Vec<_>>())
            .unwrap_or_default();

        let stops_start = route_stops.len();
        route_stops.extend_from_slice(&canonical);
        let trips_start = route_trips.len();
        let num_trips = sorted.len();

        for candidate in sorted {
            let trip_idx = trips.len();
            let stop_times_start = stop_times.len();
            stop_times.extend(candidate.calls.iter().map(|call| StopTime {
                trip: trip_idx,
                stop: call.stop,
                arrival: call.arrival,
                departure: call.departure,
                stop_sequence: call.stop_sequence,
            }));
            trip_lookup.insert(candidate.trip_id.clone(), trip_idx);
            trips.push(Trip {
                trip_id: candidate.trip_id,
                route: route_idx,
                direction,
                stop_times_start,
                num_stop_times: candidate.calls.len(),
            });
            route_trips.push(trip_idx);
        }

        let short_name = route_meta
            .get(route_id.as_str())
            .map(|meta| display_route_name(meta))
            .unwrap_or_default();
        routes.push(Route {
            route_id,
            short_name,
            direction,
            stops_start,
            num_stops: canonical.len(),
            trips_start,
            num_trips,
        });
    }

    let stop_departures = index_stop_departures(&mut stops, &stop_times);
    let stop_routes = index_stop_routes(&mut stops, &stop_times, &trips);
    let footpaths = calculate_footpaths(&mut stops, walking);

    info!(
        "Indexed {} stops, {} routes, {} trips and {} stop times",
        stops.len(),
        routes.len(),
        trips.len(),
        stop_times.len()
    );
    if report.skipped() > 0 {
        warn!("Skipped {} malformed entities: {report:?}", report.skipped());
    }

    TransitNetwork {
        stops,
        routes,
        trips,
        stop_times,
        route_stops,
        route_trips,
        stop_departures,
        stop_routes,
        footpaths,
        service_date,
        index_report: report,
        stop_lookup,
        trip_lookup,
    }
}

fn attach_stop_times(
    candidates: &mut [TripCandidate],
    candidate_lookup: &HashMap<String, usize>,
    stop_lookup: &HashMap<String, RaptorStopId>,
    stop_time_records: Vec<StopTimeRecord>,
    report: &mut IndexReport,
) {
    for record in stop_time_records {
        let Some(&candidate) = candidate_lookup.get(&record.trip_id) else {
            warn!(
                "Stop time references unknown trip '{}', skipped",
                record.trip_id
            );
            report.stop_times_with_unknown_trip += 1;
            continue;
        };
        let Some(&stop) = stop_lookup.get(&record.stop_id) else {
            warn!(
                "Trip '{}' references unknown stop '{}', stop time skipped",
                record.trip_id, record.stop_id
            );
            report.stop_times_with_unknown_stop += 1;
            continue;
        };
        candidates[candidate].calls.push(Call {
            stop,
            arrival: record.arrival,
            departure: record.departure,
            stop_sequence: record.stop_sequence,
        });
    }

    for candidate in candidates.iter_mut() {
        candidate.calls.sort_by_key(|call| call.stop_sequence);
    }
}

fn display_route_name(route: &RouteRecord) -> String {
    if route.short_name.is_empty() {
        route.long_name.clone()
    } else {
        route.short_name.clone()
    }
}

/// Departure-sorted stop times of every stop, flattened
fn index_stop_departures(stops: &mut [Stop], stop_times: &[StopTime]) -> Vec<usize> {
    let mut per_stop: Vec<Vec<usize>> = vec![Vec::new(); stops.len()];
    for (stop_time_idx, stop_time) in stop_times.iter().enumerate() {
        per_stop[stop_time.stop].push(stop_time_idx);
    }

    let mut stop_departures = Vec::with_capacity(stop_times.len());
    for (stop, mut departures) in stops.iter_mut().zip(per_stop) {
        departures.sort_by_key(|&idx| (stop_times[idx].departure, idx));
        stop.departures_start = stop_departures.len();
        stop.departures_len = departures.len();
        stop_departures.extend(departures);
    }
    stop_departures
}

/// Routes whose trips call at every stop, flattened
fn index_stop_routes(stops: &mut [Stop], stop_times: &[StopTime], trips: &[Trip]) -> Vec<usize> {
    let mut per_stop: Vec<Vec<usize>> = vec![Vec::new(); stops.len()];
    for stop_time in stop_times {
        per_stop[stop_time.stop].push(trips[stop_time.trip].route);
    }

    let mut stop_routes = Vec::new();
    for (stop, routes) in stops.iter_mut().zip(per_stop) {
        let routes = routes.into_iter().sorted_unstable().dedup().collect::<Vec<_>>();
        stop.routes_start = stop_routes.len();
        stop.routes_len = routes.len();
        stop_routes.extend(routes);
    }
    stop_routes
}
