use log::info;

use super::config::NetworkConfig;
use super::footpaths::{HaversineWalking, NoWalking};
use super::gtfs::load_feed_tables;
use super::indexer::index_network;
use crate::{Error, TransitNetwork};

/// Creates a transit network based on the provided configuration
///
/// # Errors
///
/// Returns an error if there are problems reading or processing data
pub fn create_transit_network(config: &NetworkConfig) -> Result<TransitNetwork, Error> {
    validate_config(config)?;

    info!("Processing public transit data (GTFS)");
    let tables = load_feed_tables(config)?;

    let network = if config.footpaths {
        let walking = HaversineWalking {
            speed: config.walking_speed,
            max_duration: config.max_footpath_time,
        };
        index_network(tables, &walking)
    } else {
        info!("Footpaths disabled");
        index_network(tables, &NoWalking)
    };

    info!("Transit network created successfully");
    Ok(network)
}

fn validate_config(config: &NetworkConfig) -> Result<(), Error> {
    if config.gtfs_dirs.is_empty() {
        return Err(Error::InvalidData(
            "No GTFS directories provided in the configuration".to_string(),
        ));
    }

    for dir in &config.gtfs_dirs {
        if !dir.is_dir() {
            return Err(Error::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("GTFS directory not found: {}", dir.display()),
            )));
        }
    }

    if !(config.walking_speed.is_finite() && config.walking_speed > 0.0) {
        return Err(Error::InvalidData(format!(
            "Walking speed must be a positive number of meters per second, got {}",
            config.walking_speed
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directories_rejected() {
        let config = NetworkConfig::default();
        assert!(matches!(
            create_transit_network(&config),
            Err(Error::InvalidData(_))
        ));

        let config = NetworkConfig {
            gtfs_dirs: vec!["/definitely/not/a/feed".into()],
            ..NetworkConfig::default()
        };
        assert!(matches!(
            create_transit_network(&config),
            Err(Error::IoError(_))
        ));
    }

    #[test]
    fn test_invalid_walking_speed_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = NetworkConfig {
            gtfs_dirs: vec![dir.path().to_path_buf()],
            walking_speed: 0.0,
            ..NetworkConfig::default()
        };
        assert!(matches!(
            create_transit_network(&config),
            Err(Error::InvalidData(_))
        ));
    }
}
