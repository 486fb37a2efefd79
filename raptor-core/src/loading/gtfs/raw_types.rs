//! Rows of the GTFS files as they appear on disk. Columns the router does
//! not use are ignored by the CSV reader.

use chrono::NaiveDate;
use serde::Deserialize;

use super::parser::deserialize_gtfs_date;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FeedStop {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_lat: String,
    pub stop_lon: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FeedRoute {
    pub route_id: String,
    pub route_short_name: String,
    pub route_long_name: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FeedTrip {
    pub route_id: String,
    pub service_id: String,
    pub trip_id: String,
    /// "0", "1" or empty
    pub direction_id: String,
}

/// Times are kept as text, they may exceed 24:00:00
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FeedStopTime {
    pub trip_id: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_id: String,
    pub stop_sequence: String,
}

/// A `calendar.txt` row: weekday flags and the validity range
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FeedService {
    pub service_id: String,
    pub monday: String,
    pub tuesday: String,
    pub wednesday: String,
    pub thursday: String,
    pub friday: String,
    pub saturday: String,
    pub sunday: String,
    #[serde(deserialize_with = "deserialize_gtfs_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(deserialize_with = "deserialize_gtfs_date")]
    pub end_date: Option<NaiveDate>,
}
