//! Processing raw GTFS data into entity tables

mod parser;
mod processor;
mod raw_types;

pub use parser::{deserialize_gtfs_file, feed_file};
pub use processor::load_feed_tables;
pub use raw_types::{FeedRoute, FeedService, FeedStop, FeedStopTime, FeedTrip};
