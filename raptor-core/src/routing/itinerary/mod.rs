//! Presentation of reconstructed journeys

mod to_geojson;
