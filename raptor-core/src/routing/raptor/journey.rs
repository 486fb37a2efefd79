use serde::Serialize;

use crate::{RaptorStopId, Time, TripId};

/// Represents a single leg of a journey
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JourneyLeg {
    /// A transit trip segment
    Transit {
        trip: TripId,
        from_stop: RaptorStopId,
        departure_time: Time,
        to_stop: RaptorStopId,
        arrival_time: Time,
    },
    /// A walking transfer between stops
    Walk {
        from_stop: RaptorStopId,
        departure_time: Time,
        to_stop: RaptorStopId,
        arrival_time: Time,
        duration: Time,
    },
}

impl JourneyLeg {
    /// Trip ridden on this leg, `None` when walking
    pub fn trip(&self) -> Option<TripId> {
        match self {
            JourneyLeg::Transit { trip, .. } => Some(*trip),
            JourneyLeg::Walk { .. } => None,
        }
    }

    pub fn from_stop(&self) -> RaptorStopId {
        match self {
            JourneyLeg::Transit { from_stop, .. } | JourneyLeg::Walk { from_stop, .. } => {
                *from_stop
            }
        }
    }

    pub fn to_stop(&self) -> RaptorStopId {
        match self {
            JourneyLeg::Transit { to_stop, .. } | JourneyLeg::Walk { to_stop, .. } => *to_stop,
        }
    }

    pub fn departure_time(&self) -> Time {
        match self {
            JourneyLeg::Transit { departure_time, .. }
            | JourneyLeg::Walk { departure_time, .. } => *departure_time,
        }
    }

    pub fn arrival_time(&self) -> Time {
        match self {
            JourneyLeg::Transit { arrival_time, .. } | JourneyLeg::Walk { arrival_time, .. } => {
                *arrival_time
            }
        }
    }

    pub fn is_transit(&self) -> bool {
        matches!(self, JourneyLeg::Transit { .. })
    }
}

/// Complete journey from source to target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Journey {
    pub legs: Vec<JourneyLeg>,
    /// Requested departure time at the source
    pub departure_time: Time,
    pub arrival_time: Time,
    /// RAPTOR round the journey was reconstructed from
    pub round: usize,
}

impl Journey {
    /// Number of trips boarded
    pub fn transit_legs(&self) -> usize {
        self.legs.iter().filter(|leg| leg.is_transit()).count()
    }

    /// Changes between trips
    pub fn transfers(&self) -> usize {
        self.transit_legs().saturating_sub(1)
    }

    pub fn duration(&self) -> Time {
        self.arrival_time.saturating_sub(self.departure_time)
    }
}
