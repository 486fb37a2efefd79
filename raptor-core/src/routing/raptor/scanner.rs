use std::collections::VecDeque;

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use log::{debug, trace, warn};

use super::query::RaptorConfig;
use super::state::{Predecessor, RaptorError, RaptorState};
use crate::{
    Footpath, MAX_DEPARTURE_TIME, RaptorStopId, RouteId, StopTimeId, Time, TransitNetwork,
};

/// Runs RAPTOR rounds from `source` until no stop improves, returning the
/// complete (round, stop) label table.
///
/// Round 0 holds the source and the stops reachable on foot from it. Round
/// k holds the best arrivals using at most k trips.
pub fn raptor(
    data: &TransitNetwork,
    source: RaptorStopId,
    target: RaptorStopId,
    departure_time: Time,
    config: &RaptorConfig,
) -> Result<RaptorState, RaptorError> {
    validate_raptor_inputs(data, source, target, departure_time)?;

    let num_stops = data.stops.len();
    // Every productive round reaches a new stop, so more rounds than stops
    // are never needed
    let max_rounds = config.max_rounds.min(num_stops);
    let mut state = RaptorState::new(num_stops, max_rounds);

    // Initialize round 0.
    state.update(0, source, departure_time, Predecessor::Source);
    process_foot_paths(data, &mut state, 0, target, config)?;

    for round in 1..=max_rounds {
        let started = state.start_round();
        debug_assert_eq!(started, round);

        let queue = create_route_queue(data, &state.marked_stops)?;
        state.marked_stops.clear();
        trace!("Round {round}: scanning {} routes", queue.len());

        scan_routes(data, &mut state, round, target, queue, config)?;
        process_foot_paths(data, &mut state, round, target, config)?;

        debug!(
            "Round {round}: {} stops marked, target arrival {:?}",
            state.marked_stops.count_ones(..),
            state.arrival(round, target)
        );

        // If no stops were marked in this round, we can stop.
        if state.marked_stops.is_clear() {
            return Ok(state);
        }
    }

    if !state.marked_stops.is_clear() {
        warn!(
            "Round limit of {max_rounds} reached with {} stops still improving",
            state.marked_stops.count_ones(..)
        );
    }
    Ok(state)
}

/// Common validation for RAPTOR inputs
pub(crate) fn validate_raptor_inputs(
    data: &TransitNetwork,
    source: RaptorStopId,
    target: RaptorStopId,
    departure_time: Time,
) -> Result<(), RaptorError> {
    data.validate_stop(source)?;
    data.validate_stop(target)?;
    if source == target {
        return Err(RaptorError::InvalidQuery(
            "source and target are the same stop".to_string(),
        ));
    }
    if departure_time > MAX_DEPARTURE_TIME {
        return Err(RaptorError::InvalidQuery(format!(
            "departure time {departure_time} is beyond the service day"
        )));
    }
    Ok(())
}

/// Best known arrival at the target in this round, used to prune
/// departures and improvements that cannot beat it
fn target_bound(
    state: &RaptorState,
    round: usize,
    target: RaptorStopId,
    config: &RaptorConfig,
) -> Time {
    if config.target_pruning {
        state.arrival_or_max(round, target)
    } else {
        Time::MAX
    }
}

/// Collects every route serving a marked stop, each paired with the
/// position of its earliest marked stop in the canonical pattern.
pub(crate) fn create_route_queue(
    data: &TransitNetwork,
    marked_stops: &FixedBitSet,
) -> Result<VecDeque<(RouteId, usize)>, RaptorError> {
    let mut earliest: HashMap<RouteId, usize> = HashMap::new();

    for stop in marked_stops.ones() {
        for &route_id in data.routes_for_stop(stop) {
            let route_stops = data.get_route_stops(route_id)?;
            // Stops served only by shorter trips are not on the canonical pattern
            let Some(pos) = route_stops.iter().position(|&s| s == stop) else {
                continue;
            };
            earliest
                .entry(route_id)
                .and_modify(|current| *current = (*current).min(pos))
                .or_insert(pos);
        }
    }

    let mut queue: Vec<(RouteId, usize)> = earliest.into_iter().collect();
    queue.sort_unstable();
    Ok(queue.into())
}

/// First stop time at `stop` on `route_id` departing no earlier than
/// `earliest_board` and strictly before `departure_bound`.
pub(crate) fn find_earliest_trip(
    data: &TransitNetwork,
    route_id: RouteId,
    stop: RaptorStopId,
    earliest_board: Time,
    departure_bound: Time,
) -> Option<StopTimeId> {
    let departures = data.stop_departures(stop);
    let first = departures.partition_point(|&id| data.stop_times[id].departure < earliest_board);

    departures[first..]
        .iter()
        .copied()
        .take_while(|&id| data.stop_times[id].departure < departure_bound)
        .find(|&id| data.trips[data.stop_times[id].trip].route == route_id)
}

fn scan_routes(
    data: &TransitNetwork,
    state: &mut RaptorState,
    round: usize,
    target: RaptorStopId,
    mut queue: VecDeque<(RouteId, usize)>,
    config: &RaptorConfig,
) -> Result<(), RaptorError> {
    let prev_round = round - 1;

    while let Some((route_id, start_pos)) = queue.pop_front() {
        let stops = data.get_route_stops(route_id)?;

        'boarding: for &boarding_stop in &stops[start_pos..] {
            let Some(earliest_board) = state.arrival(prev_round, boarding_stop) else {
                continue;
            };
            let Some(boarding) = find_earliest_trip(
                data,
                route_id,
                boarding_stop,
                earliest_board,
                target_bound(state, round, target, config),
            ) else {
                continue;
            };

            let trip_id = data.stop_times[boarding].trip;
            let trip_end = data.trips[trip_id].stop_times_range().end;

            // Walk the trip in its own stop order, which may differ from the
            // canonical pattern
            for stop_time in &data.stop_times[boarding + 1..trip_end] {
                let stop = stop_time.stop;
                let bound = state
                    .arrival_or_max(round, stop)
                    .min(target_bound(state, round, target, config));
                if stop_time.arrival < bound {
                    state.update(
                        round,
                        stop,
                        stop_time.arrival,
                        Predecessor::Transit {
                            trip: trip_id,
                            from_stop: boarding_stop,
                            boarding,
                        },
                    );
                }

                // An earlier round already reached this stop faster by trip
                let previous = state.label(prev_round, stop);
                if previous.reached_by_trip() && previous.arrival_or_max() < stop_time.arrival {
                    break 'boarding;
                }
            }
        }
    }

    Ok(())
}

/// Relaxes footpaths from every stop marked so far in the round. Stops
/// reached on foot here are not relaxed again in the same round.
pub(crate) fn process_foot_paths(
    data: &TransitNetwork,
    state: &mut RaptorState,
    round: usize,
    target: RaptorStopId,
    config: &RaptorConfig,
) -> Result<(), RaptorError> {
    let current_marks: Vec<(RaptorStopId, Time)> = state
        .marked_stops
        .ones()
        .filter_map(|stop| state.arrival(round, stop).map(|arrival| (stop, arrival)))
        .collect();

    for (stop, arrival) in current_marks {
        for &Footpath {
            target_stop,
            duration,
        } in data.get_stop_footpaths(stop)?
        {
            let new_time = arrival.saturating_add(duration);
            let bound = state
                .arrival_or_max(round, target_stop)
                .min(target_bound(state, round, target, config));
            if new_time < bound {
                state.update(
                    round,
                    target_stop,
                    new_time,
                    Predecessor::Footpath {
                        from_stop: stop,
                        duration,
                    },
                );
            }
        }
    }
    Ok(())
}
