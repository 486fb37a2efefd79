use chrono::NaiveDate;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::journey::Journey;
use super::reconstruct::reconstruct_journeys;
use super::scanner::raptor;
use super::state::RaptorError;
use crate::{RaptorStopId, Time, TransitNetwork};

/// Default upper bound on the number of trips in a journey
pub const DEFAULT_MAX_ROUNDS: usize = 16;

/// Earliest arrival query between two stops given by their GTFS ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub source: String,
    pub target: String,
    /// Service day of the query, only checked against the network's own
    pub date: Option<NaiveDate>,
    /// Seconds since midnight of the service day
    pub departure_time: Time,
}

/// Tuning knobs of the round scanner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaptorConfig {
    /// Rounds after round 0, each boarding at most one more trip
    pub max_rounds: usize,
    /// Skip departures and improvements that cannot beat the best known
    /// arrival at the target
    pub target_pruning: bool,
}

impl Default for RaptorConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            target_pruning: true,
        }
    }
}

/// Answers a query with every journey on the arrival/round Pareto front,
/// fewest trips first.
///
/// # Errors
///
/// Returns [`RaptorError::InvalidQuery`] when a stop id is unknown, source
/// and target coincide or the departure lies beyond the service day.
pub fn find_journeys(
    data: &TransitNetwork,
    query: &Query,
    config: &RaptorConfig,
) -> Result<Vec<Journey>, RaptorError> {
    let source = resolve_stop(data, &query.source)?;
    let target = resolve_stop(data, &query.target)?;

    if let (Some(requested), Some(indexed)) = (query.date, data.service_date)
        && requested != indexed
    {
        warn!("Query date {requested} differs from network service date {indexed}");
    }

    debug!(
        "Routing from '{}' to '{}' at {}",
        query.source, query.target, query.departure_time
    );
    let state = raptor(data, source, target, query.departure_time, config)?;
    let journeys = reconstruct_journeys(data, &state, source, target)?;

    match journeys.last() {
        Some(best) => info!(
            "Found {} journeys from '{}' to '{}', earliest arrival {}",
            journeys.len(),
            query.source,
            query.target,
            best.arrival_time
        ),
        None => info!(
            "No journey from '{}' to '{}' after {}",
            query.source, query.target, query.departure_time
        ),
    }
    Ok(journeys)
}

/// Answers independent queries in parallel over the shared network
pub fn find_journeys_many(
    data: &TransitNetwork,
    queries: &[Query],
    config: &RaptorConfig,
) -> Vec<Result<Vec<Journey>, RaptorError>> {
    queries
        .par_iter()
        .map(|query| find_journeys(data, query, config))
        .collect()
}

fn resolve_stop(data: &TransitNetwork, stop_id: &str) -> Result<RaptorStopId, RaptorError> {
    data.stop_by_id(stop_id)
        .ok_or_else(|| RaptorError::InvalidQuery(format!("unknown stop '{stop_id}'")))
}
