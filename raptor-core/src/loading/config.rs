use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::footpaths::DEFAULT_WALKING_SPEED;
use crate::Time;

/// Configuration of network loading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// GTFS feed directories, merged in order
    pub gtfs_dirs: Vec<PathBuf>,
    /// Keep only trips whose service runs on this day
    pub date: Option<NaiveDate>,
    /// Walking speed for footpaths in meters per second
    pub walking_speed: f64,
    /// Drop footpaths longer than this many seconds
    pub max_footpath_time: Option<Time>,
    /// Generate footpaths between stops at all
    pub footpaths: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            gtfs_dirs: Vec::new(),
            date: None,
            walking_speed: DEFAULT_WALKING_SPEED,
            max_footpath_time: None,
            footpaths: true,
        }
    }
}
