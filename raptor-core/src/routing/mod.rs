//! Journey planning over the indexed transit network

pub mod itinerary;
pub mod raptor;
