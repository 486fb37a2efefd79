use log::{debug, warn};

use super::journey::{Journey, JourneyLeg};
use super::state::{Predecessor, RaptorError, RaptorState};
use crate::{RaptorStopId, Time, TransitNetwork};

/// Reconstructs one journey per round that improved the arrival at
/// `target`, ascending by round.
///
/// Later rounds use more trips, so a round only yields a journey when it
/// arrives strictly earlier than every journey returned before it. A round
/// whose parent chain is broken is skipped.
pub fn reconstruct_journeys(
    data: &TransitNetwork,
    state: &RaptorState,
    source: RaptorStopId,
    target: RaptorStopId,
) -> Result<Vec<Journey>, RaptorError> {
    data.validate_stop(source)?;
    data.validate_stop(target)?;

    let mut journeys = Vec::new();
    let mut best = Time::MAX;
    for round in 0..state.round_count() {
        let Some(arrival) = state.arrival(round, target) else {
            continue;
        };
        if arrival >= best {
            continue;
        }
        match reconstruct_journey(data, state, source, target, round) {
            Ok(journey) => {
                best = arrival;
                journeys.push(journey);
            }
            Err(e) => warn!("Round {round} yields no journey: {e}"),
        }
    }

    debug!("Reconstructed {} journeys", journeys.len());
    Ok(journeys)
}

fn reconstruct_journey(
    data: &TransitNetwork,
    state: &RaptorState,
    source: RaptorStopId,
    target: RaptorStopId,
    round: usize,
) -> Result<Journey, RaptorError> {
    let departure_time = state
        .arrival(0, source)
        .ok_or(RaptorError::InvalidJourney)?;
    let arrival_time = state
        .arrival(round, target)
        .ok_or(RaptorError::InvalidJourney)?;

    // Each stop contributes at most one transit and one walk leg
    let max_legs = 2 * data.stop_count();
    let mut legs = Vec::new();
    let mut current_stop = target;
    let mut current_round = round;

    // Backtrack from target to source
    while current_stop != source {
        if legs.len() >= max_legs {
            return Err(RaptorError::InvalidJourney);
        }
        let label = state.label(current_round, current_stop);
        let arrival = label.arrival.ok_or(RaptorError::InvalidJourney)?;

        match label.predecessor {
            Predecessor::None | Predecessor::Source => {
                return Err(RaptorError::InvalidJourney);
            }
            Predecessor::Transit {
                trip,
                from_stop,
                boarding,
            } => {
                let boarding_time = data
                    .stop_times
                    .get(boarding)
                    .filter(|stop_time| stop_time.trip == trip)
                    .ok_or(RaptorError::InvalidJourney)?;
                legs.push(JourneyLeg::Transit {
                    trip,
                    from_stop,
                    departure_time: boarding_time.departure,
                    to_stop: current_stop,
                    arrival_time: arrival,
                });

                // The boarding stop was reached in the previous round
                current_stop = from_stop;
                current_round = current_round
                    .checked_sub(1)
                    .ok_or(RaptorError::InvalidJourney)?;
            }
            Predecessor::Footpath {
                from_stop,
                duration,
            } => {
                legs.push(JourneyLeg::Walk {
                    from_stop,
                    departure_time: arrival.saturating_sub(duration),
                    to_stop: current_stop,
                    arrival_time: arrival,
                    duration,
                });

                // Footpaths are relaxed within the same round
                current_stop = from_stop;
            }
        }
    }

    // Legs are in reverse order (target to source), so reverse them
    legs.reverse();

    Ok(Journey {
        legs,
        departure_time,
        arrival_time,
        round,
    })
}
