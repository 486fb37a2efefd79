use geo::{Distance, Haversine};
use log::info;
use rayon::prelude::*;

use crate::{Footpath, RaptorStopId, Stop, Time};

/// Average walking speed in meters per second
pub const DEFAULT_WALKING_SPEED: f64 = 1.4;

/// Walking time between two stops.
///
/// Returning `None` means the pair is not connected by a footpath.
pub trait WalkingModel: Sync {
    fn walking_time(&self, from: &Stop, to: &Stop) -> Option<Time>;
}

/// Straight line walking over the great circle distance
#[derive(Debug, Clone, Copy)]
pub struct HaversineWalking {
    /// Meters per second
    pub speed: f64,
    /// Footpaths longer than this are dropped
    pub max_duration: Option<Time>,
}

impl Default for HaversineWalking {
    fn default() -> Self {
        Self {
            speed: DEFAULT_WALKING_SPEED,
            max_duration: None,
        }
    }
}

impl WalkingModel for HaversineWalking {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn walking_time(&self, from: &Stop, to: &Stop) -> Option<Time> {
        let meters = Haversine.distance(from.geometry, to.geometry);
        let seconds = (meters / self.speed).ceil().min(f64::from(Time::MAX)) as Time;
        match self.max_duration {
            Some(max) if seconds > max => None,
            _ => Some(seconds),
        }
    }
}

/// No footpaths at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWalking;

impl WalkingModel for NoWalking {
    fn walking_time(&self, _from: &Stop, _to: &Stop) -> Option<Time> {
        None
    }
}

/// Calculate footpaths between every ordered pair of distinct stops and
/// store them in the flat footpath vector of the stops.
pub(crate) fn calculate_footpaths<W: WalkingModel + ?Sized>(
    stops: &mut [Stop],
    walking: &W,
) -> Vec<Footpath> {
    info!("Calculating footpaths between {} stops", stops.len());

    let stop_footpaths = calculate_stop_footpaths(stops, walking);

    let mut all_footpaths = Vec::with_capacity(stop_footpaths.iter().map(Vec::len).sum());
    for (stop, footpaths) in stops.iter_mut().zip(stop_footpaths) {
        stop.footpaths_start = all_footpaths.len();
        stop.footpaths_len = footpaths.len();
        all_footpaths.extend(footpaths);
    }

    info!("Calculated {} footpaths between stops", all_footpaths.len());
    all_footpaths
}

/// Footpaths of every stop, computed in parallel
fn calculate_stop_footpaths<W: WalkingModel + ?Sized>(
    stops: &[Stop],
    walking: &W,
) -> Vec<Vec<Footpath>> {
    (0..stops.len())
        .into_par_iter()
        .map(|source_idx| find_footpaths_from_stop(stops, walking, source_idx))
        .collect()
}

fn find_footpaths_from_stop<W: WalkingModel + ?Sized>(
    stops: &[Stop],
    walking: &W,
    source_idx: RaptorStopId,
) -> Vec<Footpath> {
    let source = &stops[source_idx];
    stops
        .iter()
        .enumerate()
        .filter(|&(target_idx, _)| target_idx != source_idx)
        .filter_map(|(target_idx, target)| {
            walking
                .walking_time(source, target)
                .map(|duration| Footpath {
                    target_stop: target_idx,
                    duration,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use geo::Point;

    use super::*;

    fn stop(id: &str, lon: f64, lat: f64) -> Stop {
        Stop::new(id.to_string(), id.to_string(), Point::new(lon, lat))
    }

    #[test]
    fn test_haversine_walking_time() {
        // 0.01 degree of latitude is about 1112 meters
        let a = stop("a", 0.0, 0.0);
        let b = stop("b", 0.0, 0.01);
        let walking = HaversineWalking::default();
        let time = walking.walking_time(&a, &b).unwrap();
        assert!((790..=796).contains(&time), "unexpected walking time {time}");
        assert_eq!(walking.walking_time(&a, &a), Some(0));
    }

    #[test]
    fn test_haversine_walking_cap() {
        let a = stop("a", 0.0, 0.0);
        let b = stop("b", 0.0, 0.01);
        let walking = HaversineWalking {
            max_duration: Some(600),
            ..HaversineWalking::default()
        };
        assert_eq!(walking.walking_time(&a, &b), None);
    }

    #[test]
    fn test_complete_footpath_graph() {
        let mut stops = vec![
            stop("a", 0.0, 0.0),
            stop("b", 0.0, 0.001),
            stop("c", 0.001, 0.0),
        ];
        let footpaths = calculate_footpaths(&mut stops, &HaversineWalking::default());
        assert_eq!(footpaths.len(), 6);
        for (idx, stop) in stops.iter().enumerate() {
            assert_eq!(stop.footpaths_len, 2);
            let targets: Vec<_> = footpaths
                [stop.footpaths_start..stop.footpaths_start + stop.footpaths_len]
                .iter()
                .map(|f| f.target_stop)
                .collect();
            assert!(!targets.contains(&idx));
        }
    }

    #[test]
    fn test_no_walking() {
        let mut stops = vec![stop("a", 0.0, 0.0), stop("b", 0.0, 0.001)];
        let footpaths = calculate_footpaths(&mut stops, &NoWalking);
        assert!(footpaths.is_empty());
        assert!(stops.iter().all(|s| s.footpaths_len == 0));
    }
}
