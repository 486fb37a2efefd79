use chrono::{Datelike, NaiveDate, Weekday};
use geo::Point;
use hashbrown::HashSet;
use log::{info, warn};

use super::{
    parser::{deserialize_gtfs_file, feed_file},
    raw_types::{FeedRoute, FeedService, FeedStop, FeedStopTime, FeedTrip},
};
use crate::loading::config::NetworkConfig;
use crate::loading::tables::{FeedTables, RouteRecord, StopRecord, StopTimeRecord, TripRecord};
use crate::{Direction, Error, time::parse_time};

/// Create entity tables from the GTFS directories of the configuration
///
/// # Errors
///
/// Returns an error if a required file is missing or unreadable
pub fn load_feed_tables(config: &NetworkConfig) -> Result<FeedTables, Error> {
    let RawFeed {
        stops,
        routes,
        mut trips,
        mut stop_times,
        services,
    } = load_raw_feed(config)?;

    if let Some(date) = config.date {
        filter_trips_by_service_day(date, &services, &mut trips, &mut stop_times);
    }

    let tables = FeedTables {
        stops: convert_stops(stops),
        routes: convert_routes(routes),
        trips: convert_trips(trips),
        stop_times: convert_stop_times(stop_times),
        service_date: config.date,
    };
    info!(
        "Loaded {} stops, {} routes, {} trips and {} stop times",
        tables.stops.len(),
        tables.routes.len(),
        tables.trips.len(),
        tables.stop_times.len()
    );
    Ok(tables)
}

struct RawFeed {
    stops: Vec<FeedStop>,
    routes: Vec<FeedRoute>,
    trips: Vec<FeedTrip>,
    stop_times: Vec<FeedStopTime>,
    services: Vec<FeedService>,
}

fn load_raw_feed(config: &NetworkConfig) -> Result<RawFeed, Error> {
    let mut feed = RawFeed {
        stops: Vec::new(),
        routes: Vec::new(),
        trips: Vec::new(),
        stop_times: Vec::new(),
        services: Vec::new(),
    };
    for dir in &config.gtfs_dirs {
        let required = |name: &str| {
            feed_file(dir, name).ok_or_else(|| {
                Error::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{name}.txt not found in {}", dir.display()),
                ))
            })
        };
        feed.stops
            .extend(deserialize_gtfs_file::<FeedStop>(&required("stops")?)?);
        feed.routes
            .extend(deserialize_gtfs_file::<FeedRoute>(&required("routes")?)?);
        feed.trips
            .extend(deserialize_gtfs_file::<FeedTrip>(&required("trips")?)?);
        feed.stop_times
            .extend(deserialize_gtfs_file::<FeedStopTime>(&required("stop_times")?)?);
        if let Some(calendar) = feed_file(dir, "calendar") {
            feed.services.extend(deserialize_gtfs_file::<FeedService>(&calendar)?);
        }
    }
    feed.stop_times.shrink_to_fit();
    Ok(feed)
}

fn runs_on(service: &FeedService, date: NaiveDate) -> bool {
    let flag = match date.weekday() {
        Weekday::Mon => &service.monday,
        Weekday::Tue => &service.tuesday,
        Weekday::Wed => &service.wednesday,
        Weekday::Thu => &service.thursday,
        Weekday::Fri => &service.friday,
        Weekday::Sat => &service.saturday,
        Weekday::Sun => &service.sunday,
    };
    flag == "1"
        && service.start_date.is_none_or(|start| start <= date)
        && service.end_date.is_none_or(|end| date <= end)
}

fn filter_trips_by_service_day(
    date: NaiveDate,
    services: &[FeedService],
    trips: &mut Vec<FeedTrip>,
    stop_times: &mut Vec<FeedStopTime>,
) {
    if services.is_empty() {
        warn!("No calendar in feed, keeping all trips for {date}");
        return;
    }

    // Create set of service_id running on the selected day
    let active_services: HashSet<&str> = services
        .iter()
        .filter(|service| runs_on(service, date))
        .map(|service| service.service_id.as_str())
        .collect();

    // Filter trips and respective stop_times by service day
    let before = trips.len();
    trips.retain(|trip| active_services.contains(trip.service_id.as_str()));
    let active_trips = trips
        .iter()
        .map(|trip| trip.trip_id.as_str())
        .collect::<HashSet<&str>>();
    stop_times.retain(|stop_time| active_trips.contains(stop_time.trip_id.as_str()));
    info!("{} of {before} trips run on {date}", trips.len());
}

/// Parses (lon, lat), `None` unless both are numbers
fn parse_coordinates(feed_stop: &FeedStop) -> Option<Point> {
    let lon = feed_stop.stop_lon.trim().parse::<f64>().ok()?;
    let lat = feed_stop.stop_lat.trim().parse::<f64>().ok()?;
    Some(Point::new(lon, lat))
}

fn convert_stops(stops: Vec<FeedStop>) -> Vec<StopRecord> {
    stops
        .into_iter()
        .map(|feed_stop| {
            let geometry = parse_coordinates(&feed_stop).unwrap_or_else(|| {
                warn!(
                    "Stop '{}' has invalid coordinates ('{}', '{}'), placed at (0, 0)",
                    feed_stop.stop_id, feed_stop.stop_lon, feed_stop.stop_lat
                );
                Point::new(0.0, 0.0)
            });
            let name = if feed_stop.stop_name.is_empty() {
                feed_stop.stop_id.clone()
            } else {
                feed_stop.stop_name
            };

            StopRecord {
                stop_id: feed_stop.stop_id,
                name,
                geometry,
            }
        })
        .collect()
}

fn convert_routes(routes: Vec<FeedRoute>) -> Vec<RouteRecord> {
    routes
        .into_iter()
        .map(|route| RouteRecord {
            route_id: route.route_id,
            short_name: route.route_short_name,
            long_name: route.route_long_name,
        })
        .collect()
}

fn convert_trips(trips: Vec<FeedTrip>) -> Vec<TripRecord> {
    trips
        .into_iter()
        .filter_map(|trip| {
            let Some(direction) = Direction::from_gtfs(&trip.direction_id) else {
                warn!(
                    "Trip '{}' has invalid direction_id '{}', skipped",
                    trip.trip_id, trip.direction_id
                );
                return None;
            };
            Some(TripRecord {
                trip_id: trip.trip_id,
                route_id: trip.route_id,
                direction,
            })
        })
        .collect()
}

fn convert_stop_times(stop_times: Vec<FeedStopTime>) -> Vec<StopTimeRecord> {
    stop_times
        .into_iter()
        .filter_map(|stop_time| match convert_stop_time(&stop_time) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(
                    "Stop time of trip '{}' at stop '{}' skipped: {e}",
                    stop_time.trip_id, stop_time.stop_id
                );
                None
            }
        })
        .collect()
}

fn convert_stop_time(stop_time: &FeedStopTime) -> Result<StopTimeRecord, Error> {
    // A blank field takes the value of the other one
    let (arrival, departure) = match (
        stop_time.arrival_time.is_empty(),
        stop_time.departure_time.is_empty(),
    ) {
        (true, true) => {
            return Err(Error::InvalidData("no arrival or departure time".into()));
        }
        (true, false) => {
            let departure = parse_time(&stop_time.departure_time)?;
            (departure, departure)
        }
        (false, true) => {
            let arrival = parse_time(&stop_time.arrival_time)?;
            (arrival, arrival)
        }
        (false, false) => (
            parse_time(&stop_time.arrival_time)?,
            parse_time(&stop_time.departure_time)?,
        ),
    };
    let stop_sequence = stop_time.stop_sequence.parse::<u32>().map_err(|e| {
        Error::InvalidData(format!(
            "invalid stop_sequence '{}': {e}",
            stop_time.stop_sequence
        ))
    })?;

    Ok(StopTimeRecord {
        trip_id: stop_time.trip_id.clone(),
        stop_id: stop_time.stop_id.clone(),
        arrival,
        departure,
        stop_sequence,
    })
}
