//! Network fixtures shared by the integration tests, kept in step with
//! the unit test builder in `routing/raptor/test_network.rs`
#![allow(dead_code)]

use geo::Point;
use raptor_core::prelude::*;
use raptor_core::{Stop, TransitNetwork};

/// Footpaths only between listed ordered stop pairs
pub struct ListedWalking(pub Vec<(String, String, Time)>);

impl WalkingModel for ListedWalking {
    fn walking_time(&self, from: &Stop, to: &Stop) -> Option<Time> {
        self.0
            .iter()
            .find(|(a, b, _)| *a == from.stop_id && *b == to.stop_id)
            .map(|&(_, _, duration)| duration)
    }
}

#[derive(Default)]
pub struct FeedBuilder {
    pub tables: FeedTables,
    walks: Vec<(String, String, Time)>,
}

impl FeedBuilder {
    pub fn with_stops(ids: &[&str]) -> Self {
        let mut builder = Self::default();
        for (idx, id) in ids.iter().enumerate() {
            builder.tables.stops.push(StopRecord {
                stop_id: (*id).to_string(),
                name: format!("{id} station"),
                geometry: Point::new(idx as f64 * 0.01, 0.0),
            });
        }
        builder
    }

    /// Adds a trip; each call is (stop, arrival, departure)
    pub fn trip(
        mut self,
        trip_id: &str,
        route_id: &str,
        direction: Direction,
        calls: &[(&str, Time, Time)],
    ) -> Self {
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
            direction,
        });
        for (sequence, &(stop_id, arrival, departure)) in (1u32..).zip(calls) {
            self.tables.stop_times.push(StopTimeRecord {
                trip_id: trip_id.to_string(),
                stop_id: stop_id.to_string(),
                arrival,
                departure,
                stop_sequence: sequence,
            });
        }
        self
    }

    /// Outbound trip whose calls arrive and depart at the same time
    pub fn simple_trip(self, trip_id: &str, route_id: &str, calls: &[(&str, Time)]) -> Self {
        let calls: Vec<_> = calls.iter().map(|&(stop, time)| (stop, time, time)).collect();
        self.trip(trip_id, route_id, Direction::Outbound, &calls)
    }

    /// Footpath in both directions
    pub fn walk(mut self, a: &str, b: &str, duration: Time) -> Self {
        self.walks.push((a.to_string(), b.to_string(), duration));
        self.walks.push((b.to_string(), a.to_string(), duration));
        self
    }

    pub fn build(self) -> TransitNetwork {
        index_network(self.tables, &ListedWalking(self.walks))
    }
}

pub fn query(source: &str, target: &str, departure_time: Time) -> Query {
    Query {
        source: source.to_string(),
        target: target.to_string(),
        date: None,
        departure_time,
    }
}

/// Checks that legs chain from source to target without going back in time
pub fn assert_sound(network: &TransitNetwork, journey: &Journey, source: &str, target: &str) {
    let source = network.stop_by_id(source).expect("source stop");
    let target = network.stop_by_id(target).expect("target stop");
    let legs = &journey.legs;
    assert!(!legs.is_empty(), "journey without legs");
    assert_eq!(legs[0].from_stop(), source);
    assert_eq!(legs[legs.len() - 1].to_stop(), target);
    assert!(legs[0].departure_time() >= journey.departure_time);
    assert_eq!(legs[legs.len() - 1].arrival_time(), journey.arrival_time);
    for leg in legs {
        assert!(leg.departure_time() <= leg.arrival_time(), "{leg:?}");
    }
    for pair in legs.windows(2) {
        assert_eq!(pair[0].to_stop(), pair[1].from_stop(), "{pair:?}");
        assert!(pair[0].arrival_time() <= pair[1].departure_time(), "{pair:?}");
    }
    assert!(journey.transit_legs() <= journey.round);
}
