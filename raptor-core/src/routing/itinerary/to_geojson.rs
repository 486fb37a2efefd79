use geo::{Coord, LineString, line_string};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use crate::{
    Error, RaptorStopId, Time, TransitNetwork, TripId,
    routing::raptor::{Journey, JourneyLeg},
};

impl Journey {
    /// Converts the journey to a `GeoJSON` `FeatureCollection` with one
    /// `LineString` feature per leg.
    pub fn to_geojson(&self, network: &TransitNetwork) -> Result<FeatureCollection, Error> {
        let features = self
            .legs
            .iter()
            .enumerate()
            .map(|(idx, leg)| match *leg {
                JourneyLeg::Transit {
                    trip,
                    from_stop,
                    departure_time,
                    to_stop,
                    arrival_time,
                } => create_transit_feature(
                    network,
                    idx,
                    trip,
                    from_stop,
                    to_stop,
                    departure_time,
                    arrival_time,
                ),
                JourneyLeg::Walk {
                    from_stop,
                    departure_time,
                    to_stop,
                    arrival_time,
                    duration,
                } => create_walk_feature(
                    network,
                    idx,
                    from_stop,
                    to_stop,
                    departure_time,
                    arrival_time,
                    duration,
                ),
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self, network: &TransitNetwork) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson(network)?)
            .map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

/// Stops passed by `trip` from `from_stop` up to `to_stop`, both included
fn trip_stops(
    network: &TransitNetwork,
    trip: TripId,
    from_stop: RaptorStopId,
    to_stop: RaptorStopId,
) -> Result<Vec<RaptorStopId>, Error> {
    let stop_times = network.get_trip(trip)?;
    let start = stop_times
        .iter()
        .position(|st| st.stop == from_stop)
        .ok_or_else(|| Error::GeoJsonError(format!("trip {trip} does not call at {from_stop}")))?;
    let end = stop_times[start..]
        .iter()
        .position(|st| st.stop == to_stop)
        .map(|offset| start + offset)
        .ok_or_else(|| Error::GeoJsonError(format!("trip {trip} does not call at {to_stop}")))?;
    Ok(stop_times[start..=end].iter().map(|st| st.stop).collect())
}

fn create_transit_feature(
    network: &TransitNetwork,
    leg_idx: usize,
    trip: TripId,
    from_stop: RaptorStopId,
    to_stop: RaptorStopId,
    departure_time: Time,
    arrival_time: Time,
) -> Result<Feature, Error> {
    let coords: Vec<Coord<f64>> = trip_stops(network, trip, from_stop, to_stop)?
        .into_iter()
        .map(|stop| network.transit_stop_location(stop).into())
        .collect();
    let geometry = Geometry::new(GeoJsonValue::from(&LineString::new(coords)));

    let trip_data = &network.trips[trip];
    let route = &network.routes[trip_data.route];
    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "leg_type": "transit",
            "leg_index": leg_idx,
            "route_id": route.route_id,
            "route_name": route.short_name,
            "trip_id": trip_data.trip_id,
            "from_name": network.transit_stop_name(from_stop).unwrap_or_default(),
            "to_name": network.transit_stop_name(to_stop).unwrap_or_default(),
            "departure_time": departure_time,
            "arrival_time": arrival_time,
            "duration": arrival_time.saturating_sub(departure_time),
        }
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn create_walk_feature(
    network: &TransitNetwork,
    leg_idx: usize,
    from_stop: RaptorStopId,
    to_stop: RaptorStopId,
    departure_time: Time,
    arrival_time: Time,
    duration: Time,
) -> Result<Feature, Error> {
    let from_loc = network.transit_stop_location(from_stop);
    let to_loc = network.transit_stop_location(to_stop);
    let direct_line = line_string![
        (x: from_loc.x(), y: from_loc.y()),
        (x: to_loc.x(), y: to_loc.y())
    ];
    let geometry = Geometry::new(GeoJsonValue::from(&direct_line));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "leg_type": "walk",
            "leg_index": leg_idx,
            "from_name": network.transit_stop_name(from_stop).unwrap_or_default(),
            "to_name": network.transit_stop_name(to_stop).unwrap_or_default(),
            "departure_time": departure_time,
            "arrival_time": arrival_time,
            "duration": duration,
        }
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use geojson::Value;

    use crate::routing::raptor::test_network::{NetworkBuilder, stop};
    use crate::routing::raptor::{Query, RaptorConfig, find_journeys};

    #[test]
    fn test_journey_to_geojson() {
        let network = NetworkBuilder::new(&["a", "b", "c", "d"])
            .trip("t1", "L", &[("a", 100), ("b", 200), ("c", 300)])
            .walk("c", "d", 60)
            .build();
        let query = Query {
            source: "a".into(),
            target: "d".into(),
            date: None,
            departure_time: 0,
        };
        let journeys = find_journeys(&network, &query, &RaptorConfig::default()).unwrap();
        let collection = journeys[0].to_geojson(&network).unwrap();
        assert_eq!(collection.features.len(), 2);

        let transit = &collection.features[0];
        let Some(Value::LineString(coords)) = transit.geometry.as_ref().map(|g| &g.value) else {
            panic!("transit leg is not a line string");
        };
        // Boarding, intermediate and alighting stop
        assert_eq!(coords.len(), 3);
        assert_eq!(transit.property("leg_type").unwrap(), "transit");
        assert_eq!(transit.property("trip_id").unwrap(), "t1");
        assert_eq!(transit.property("from_name").unwrap(), "Stop A");

        let walk = &collection.features[1];
        assert_eq!(walk.property("leg_type").unwrap(), "walk");
        assert_eq!(walk.property("duration"), Some(&serde_json::json!(60)));
        let c = stop(&network, "c");
        assert_eq!(journeys[0].legs[1].from_stop(), c);

        let text = journeys[0].to_geojson_string(&network).unwrap();
        assert!(text.contains("\"FeatureCollection\""));
    }
}
