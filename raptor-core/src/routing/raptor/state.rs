use fixedbitset::FixedBitSet;
use thiserror::Error;

use crate::{RaptorStopId, StopTimeId, Time, TripId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RaptorError {
    #[error("Invalid stop ID")]
    InvalidStop,
    #[error("Invalid route ID")]
    InvalidRoute,
    #[error("Invalid trip index")]
    InvalidTrip,
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Invalid journey")]
    InvalidJourney,
}

/// How a stop was reached in a given round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Predecessor {
    /// Not reached
    #[default]
    None,
    /// Query source
    Source,
    /// Alighted from `trip`, boarded at `from_stop` via stop time `boarding`
    Transit {
        trip: TripId,
        from_stop: RaptorStopId,
        boarding: StopTimeId,
    },
    /// Walked from `from_stop`
    Footpath {
        from_stop: RaptorStopId,
        duration: Time,
    },
}

/// Earliest known arrival at a stop in a round, with its parent pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Label {
    pub arrival: Option<Time>,
    pub predecessor: Predecessor,
}

impl Label {
    /// Arrival time, unreached stops compare as `Time::MAX`
    pub fn arrival_or_max(&self) -> Time {
        self.arrival.unwrap_or(Time::MAX)
    }

    pub fn is_reached(&self) -> bool {
        self.arrival.is_some()
    }

    pub fn reached_by_trip(&self) -> bool {
        matches!(self.predecessor, Predecessor::Transit { .. })
    }
}

/// Per query label table indexed by (round, stop) and the marked stops of
/// the round in progress
#[derive(Debug)]
pub struct RaptorState {
    pub(crate) labels: Vec<Vec<Label>>,
    pub(crate) marked_stops: FixedBitSet,
}

impl RaptorState {
    /// Creates round 0 with every stop unreached, with room for
    /// `max_rounds` further rounds.
    pub(crate) fn new(num_stops: usize, max_rounds: usize) -> Self {
        let mut labels = Vec::with_capacity(max_rounds + 1);
        labels.push(vec![Label::default(); num_stops]);
        RaptorState {
            labels,
            marked_stops: FixedBitSet::with_capacity(num_stops),
        }
    }

    /// Opens the next round seeded with the labels of the previous one and
    /// returns its index
    pub(crate) fn start_round(&mut self) -> usize {
        let seeded = self.labels.last().cloned().unwrap_or_default();
        self.labels.push(seeded);
        self.labels.len() - 1
    }

    /// Records `arrival` at `stop` if it beats the current label of the
    /// round, and marks the stop
    pub(crate) fn update(
        &mut self,
        round: usize,
        stop: RaptorStopId,
        arrival: Time,
        predecessor: Predecessor,
    ) -> bool {
        let label = &mut self.labels[round][stop];
        if arrival < label.arrival_or_max() {
            *label = Label {
                arrival: Some(arrival),
                predecessor,
            };
            self.marked_stops.insert(stop);
            true
        } else {
            false
        }
    }

    /// Number of populated rounds, round 0 included
    pub fn round_count(&self) -> usize {
        self.labels.len()
    }

    pub fn last_round(&self) -> usize {
        self.labels.len().saturating_sub(1)
    }

    pub fn label(&self, round: usize, stop: RaptorStopId) -> &Label {
        &self.labels[round][stop]
    }

    pub fn arrival(&self, round: usize, stop: RaptorStopId) -> Option<Time> {
        self.labels[round][stop].arrival
    }

    pub(crate) fn arrival_or_max(&self, round: usize, stop: RaptorStopId) -> Time {
        self.labels[round][stop].arrival_or_max()
    }

    /// Labels of every stop in a round
    pub fn round(&self, round: usize) -> &[Label] {
        &self.labels[round]
    }
}
