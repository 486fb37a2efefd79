// Re-export key components
pub use crate::loading::{
    FeedTables, HaversineWalking, IndexReport, NetworkConfig, NoWalking, RouteRecord,
    StopRecord, StopTimeRecord, TripRecord, WalkingModel, create_transit_network,
    index_network, load_feed_tables,
};
pub use crate::model::TransitNetwork;
pub use crate::routing::raptor::{
    Journey, JourneyLeg, Label, Predecessor, Query, RaptorConfig, RaptorError, RaptorState,
    find_journeys, find_journeys_many, raptor, reconstruct_journeys,
};
pub use crate::time::{format_time, parse_time};

// Core types for transit routing
pub use crate::Error;
pub use crate::{Direction, RaptorStopId, RouteId, StopTimeId, Time, TripId};
