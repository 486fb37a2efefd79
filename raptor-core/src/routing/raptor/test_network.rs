//! Small hand-written networks for the routing unit tests. The integration
//! tests cannot see this module and keep their own copy in `tests/common`.

use geo::Point;

use crate::loading::{
    FeedTables, RouteRecord, StopRecord, StopTimeRecord, TripRecord, WalkingModel, index_network,
};
use crate::{Direction, RaptorStopId, Stop, Time, TransitNetwork};

/// Walking only between explicitly listed stop pairs
struct ListedWalking(Vec<(String, String, Time)>);

impl WalkingModel for ListedWalking {
    fn walking_time(&self, from: &Stop, to: &Stop) -> Option<Time> {
        self.0
            .iter()
            .find(|(a, b, _)| *a == from.stop_id && *b == to.stop_id)
            .map(|&(_, _, duration)| duration)
    }
}

pub(crate) struct NetworkBuilder {
    tables: FeedTables,
    walks: Vec<(String, String, Time)>,
}

impl NetworkBuilder {
    pub(crate) fn new(stops: &[&str]) -> Self {
        let stops = stops
            .iter()
            .enumerate()
            .map(|(idx, &id)| StopRecord {
                stop_id: id.to_string(),
                name: format!("Stop {}", id.to_uppercase()),
                geometry: Point::new(idx as f64 * 0.01, 0.0),
            })
            .collect();
        Self {
            tables: FeedTables {
                stops,
                ..FeedTables::default()
            },
            walks: Vec::new(),
        }
    }

    /// Adds an outbound trip whose calls arrive and depart at the same time
    pub(crate) fn trip(mut self, trip_id: &str, route_id: &str, calls: &[(&str, Time)]) -> Self {
        if !self.tables.routes.iter().any(|r| r.route_id == route_id) {
            self.tables.routes.push(RouteRecord {
                route_id: route_id.to_string(),
                short_name: route_id.to_string(),
                long_name: String::new(),
            });
        }
        self.tables.trips.push(TripRecord {
            trip_id: trip_id.to_string(),
            route_id: route_id.to_string(),
            direction: Direction::Outbound,
        });
        for (seq, &(stop_id, time)) in (1u32..).zip(calls) {
            self.tables.stop_times.push(StopTimeRecord {
                trip_id: trip_id.to_string(),
                stop_id: stop_id.to_string(),
                arrival: time,
                departure: time,
                stop_sequence: seq,
            });
        }
        self
    }

    /// Adds a footpath in both directions
    pub(crate) fn walk(mut self, a: &str, b: &str, duration: Time) -> Self {
        self.walks.push((a.to_string(), b.to_string(), duration));
        self.walks.push((b.to_string(), a.to_string(), duration));
        self
    }

    pub(crate) fn build(self) -> TransitNetwork {
        index_network(self.tables, &ListedWalking(self.walks))
    }
}

pub(crate) fn stop(network: &TransitNetwork, id: &str) -> RaptorStopId {
    network
        .stop_by_id(id)
        .unwrap_or_else(|| panic!("unknown stop {id}"))
}
