//! Rendering of journeys for the terminal

use std::fmt::Write;

use geojson::FeatureCollection;
use raptor_core::prelude::*;
use serde::Serialize;

use crate::cli::{AppError, OutputFormat};

pub fn render(
    network: &TransitNetwork,
    journeys: &[Journey],
    format: OutputFormat,
) -> Result<String, AppError> {
    match format {
        OutputFormat::Text => Ok(render_text(network, journeys)),
        OutputFormat::Json => {
            let views: Vec<JourneyView<'_>> = journeys
                .iter()
                .map(|journey| JourneyView::new(network, journey))
                .collect();
            serde_json::to_string_pretty(&views).map_err(|e| AppError::Output(e.to_string()))
        }
        OutputFormat::Geojson => {
            let collection = journeys_to_geojson(network, journeys)?;
            serde_json::to_string(&collection).map_err(|e| AppError::Output(e.to_string()))
        }
    }
}

fn stop_label(network: &TransitNetwork, stop: RaptorStopId) -> &str {
    network.transit_stop_name(stop).unwrap_or("?")
}

fn format_duration(seconds: Time) -> String {
    let (hours, minutes, secs) = (seconds / 3600, seconds % 3600 / 60, seconds % 60);
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m {secs:02}s")
    } else {
        format!("{secs}s")
    }
}

fn render_text(network: &TransitNetwork, journeys: &[Journey]) -> String {
    if journeys.is_empty() {
        return "No journey found".to_string();
    }

    let mut out = String::new();
    for (idx, journey) in journeys.iter().enumerate() {
        let trips = journey.transit_legs();
        let _ = writeln!(
            out,
            "Journey {}: {} -> {} ({}, {} trip{})",
            idx + 1,
            format_time(journey.departure_time),
            format_time(journey.arrival_time),
            format_duration(journey.duration()),
            trips,
            if trips == 1 { "" } else { "s" },
        );
        for leg in &journey.legs {
            let mode = match leg {
                JourneyLeg::Transit { trip, .. } => {
                    let trip = &network.trips[*trip];
                    format!("{} ({})", network.routes[trip.route].short_name, trip.trip_id)
                }
                JourneyLeg::Walk { duration, .. } => {
                    format!("walk {}", format_duration(*duration))
                }
            };
            let _ = writeln!(
                out,
                "  {} {} -> {} {}  [{mode}]",
                format_time(leg.departure_time()),
                stop_label(network, leg.from_stop()),
                format_time(leg.arrival_time()),
                stop_label(network, leg.to_stop()),
            );
        }
    }
    out.trim_end().to_string()
}

#[derive(Serialize)]
struct JourneyView<'a> {
    departure: String,
    arrival: String,
    duration: Time,
    transfers: usize,
    legs: Vec<LegView<'a>>,
}

#[derive(Serialize)]
struct LegView<'a> {
    mode: &'static str,
    trip_id: Option<&'a str>,
    route: Option<&'a str>,
    from_stop: &'a str,
    from_name: &'a str,
    departure: String,
    to_stop: &'a str,
    to_name: &'a str,
    arrival: String,
}

impl<'a> JourneyView<'a> {
    fn new(network: &'a TransitNetwork, journey: &Journey) -> Self {
        let legs = journey
            .legs
            .iter()
            .map(|leg| {
                let trip = leg.trip().map(|trip| &network.trips[trip]);
                LegView {
                    mode: if leg.is_transit() { "transit" } else { "walk" },
                    trip_id: trip.map(|trip| trip.trip_id.as_str()),
                    route: trip.map(|trip| network.routes[trip.route].route_id.as_str()),
                    from_stop: &network.stops[leg.from_stop()].stop_id,
                    from_name: stop_label(network, leg.from_stop()),
                    departure: format_time(leg.departure_time()),
                    to_stop: &network.stops[leg.to_stop()].stop_id,
                    to_name: stop_label(network, leg.to_stop()),
                    arrival: format_time(leg.arrival_time()),
                }
            })
            .collect();
        Self {
            departure: format_time(journey.departure_time),
            arrival: format_time(journey.arrival_time),
            duration: journey.duration(),
            transfers: journey.transfers(),
            legs,
        }
    }
}

/// All journeys in one collection, each feature tagged with its journey
fn journeys_to_geojson(
    network: &TransitNetwork,
    journeys: &[Journey],
) -> Result<FeatureCollection, AppError> {
    let mut features = Vec::new();
    for (idx, journey) in journeys.iter().enumerate() {
        for mut feature in journey.to_geojson(network)?.features {
            feature.set_property("journey", idx);
            features.push(feature);
        }
    }
    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}
