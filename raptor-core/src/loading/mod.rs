//! This module is responsible for loading GTFS data and indexing it into
//! the routing network.

mod builder;
mod config;
mod footpaths;
pub mod gtfs;
mod indexer;
mod tables;

pub use builder::create_transit_network;
pub use config::NetworkConfig;
pub use footpaths::{HaversineWalking, NoWalking, WalkingModel};
pub use gtfs::load_feed_tables;
pub use indexer::{IndexReport, index_network};
pub use tables::{FeedTables, RouteRecord, StopRecord, StopTimeRecord, TripRecord};
