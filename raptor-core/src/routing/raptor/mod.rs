// RAPTOR (Round-bAsed Public Transit Optimized Router)

mod journey;
mod query;
mod reconstruct;
mod scanner;
mod state;
#[cfg(test)]
pub(crate) mod test_network;

pub use journey::{Journey, JourneyLeg};
pub use query::{DEFAULT_MAX_ROUNDS, Query, RaptorConfig, find_journeys, find_journeys_many};
pub use reconstruct::reconstruct_journeys;
pub use scanner::raptor;
pub use state::{Label, Predecessor, RaptorError, RaptorState};
