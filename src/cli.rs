use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use raptor_core::prelude::*;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error(transparent)]
    Network(#[from] raptor_core::Error),
    #[error(transparent)]
    Routing(#[from] RaptorError),
    #[error("Failed to render output: {0}")]
    Output(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Geojson,
}

/// Earliest arrival journeys between two stops of a GTFS feed
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// GTFS feed directory, repeat to merge several feeds
    #[arg(long = "gtfs", value_name = "DIR")]
    pub gtfs_dirs: Vec<PathBuf>,

    /// Source stop id
    #[arg(long)]
    pub from: String,

    /// Target stop id
    #[arg(long)]
    pub to: String,

    /// Departure time as HH:MM:SS, hours may exceed 23
    #[arg(long, value_parser = parse_departure)]
    pub at: Time,

    /// Service day (YYYY-MM-DD); only trips running on it are loaded
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// TOML file with [network] and [routing] sections
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum number of trips per journey
    #[arg(long)]
    pub max_rounds: Option<usize>,

    /// Do not generate walking transfers between stops
    #[arg(long)]
    pub no_footpaths: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

fn parse_departure(value: &str) -> Result<Time, String> {
    parse_time(value).map_err(|e| e.to_string())
}

/// Contents of the optional TOML config file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub network: NetworkConfig,
    pub routing: RaptorConfig,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = fs::read_to_string(path).map_err(|source| AppError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: FileConfig =
            toml::from_str(&text).map_err(|source| AppError::ParseConfig {
                path: path.to_path_buf(),
                source,
            })?;

        // Feed directories are relative to the config file
        if let Some(base) = path.parent() {
            for dir in &mut config.network.gtfs_dirs {
                if dir.is_relative() {
                    *dir = base.join(&*dir);
                }
            }
        }
        Ok(config)
    }
}

/// Network and routing settings after command line overrides
#[derive(Debug)]
pub struct Settings {
    pub network: NetworkConfig,
    pub routing: RaptorConfig,
}

impl Settings {
    pub fn from_args(args: &Args) -> Result<Self, AppError> {
        let FileConfig {
            mut network,
            mut routing,
        } = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        if !args.gtfs_dirs.is_empty() {
            network.gtfs_dirs.clone_from(&args.gtfs_dirs);
        }
        if args.date.is_some() {
            network.date = args.date;
        }
        if args.no_footpaths {
            network.footpaths = false;
        }
        if let Some(max_rounds) = args.max_rounds {
            routing.max_rounds = max_rounds;
        }
        Ok(Self { network, routing })
    }

    pub fn query(&self, args: &Args) -> Query {
        Query {
            source: args.from.clone(),
            target: args.to.clone(),
            date: self.network.date,
            departure_time: args.at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["raptor", "--from", "A", "--to", "B", "--at", "08:30:00"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_args() {
        let args = args(&["--gtfs", "feed1", "--gtfs", "feed2", "--format", "json"]);
        assert_eq!(args.at, 8 * 3600 + 30 * 60);
        assert_eq!(args.gtfs_dirs.len(), 2);
        assert_eq!(args.format, OutputFormat::Json);
        assert!(!args.no_footpaths);
    }

    #[test]
    fn test_reject_bad_departure() {
        let result = Args::try_parse_from(["raptor", "--from", "A", "--to", "B", "--at", "8h30"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_command_line_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raptor.toml");
        fs::write(
            &path,
            "[network]\n\
             gtfs_dirs = [\"feed\"]\n\
             walking_speed = 1.2\n\
             date = \"2024-11-11\"\n\
             \n\
             [routing]\n\
             max_rounds = 4\n\
             target_pruning = false\n",
        )
        .unwrap();

        let path_arg = path.to_str().unwrap();
        let settings = Settings::from_args(&args(&["--config", path_arg])).unwrap();
        assert_eq!(settings.network.gtfs_dirs, vec![dir.path().join("feed")]);
        assert!((settings.network.walking_speed - 1.2).abs() < f64::EPSILON);
        assert_eq!(settings.network.date, NaiveDate::from_ymd_opt(2024, 11, 11));
        assert_eq!(settings.routing.max_rounds, 4);
        assert!(!settings.routing.target_pruning);
        assert!(settings.network.footpaths);

        let settings = Settings::from_args(&args(&[
            "--config",
            path_arg,
            "--gtfs",
            "other",
            "--max-rounds",
            "2",
            "--no-footpaths",
            "--date",
            "2024-11-12",
        ]))
        .unwrap();
        assert_eq!(settings.network.gtfs_dirs, vec![PathBuf::from("other")]);
        assert_eq!(settings.routing.max_rounds, 2);
        assert!(!settings.network.footpaths);
        assert_eq!(settings.network.date, NaiveDate::from_ymd_opt(2024, 11, 12));
    }

    #[test]
    fn test_defaults_without_config() {
        let args = args(&[]);
        let settings = Settings::from_args(&args).unwrap();
        assert_eq!(settings.routing, RaptorConfig::default());
        let query = settings.query(&args);
        assert_eq!(query.source, "A");
        assert_eq!(query.departure_time, 8 * 3600 + 30 * 60);
    }

    #[test]
    fn test_invalid_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[routing]\nmax_rounds = \"many\"\n").unwrap();
        assert!(matches!(
            FileConfig::load(&path),
            Err(AppError::ParseConfig { .. })
        ));
        assert!(matches!(
            FileConfig::load(&dir.path().join("missing.toml")),
            Err(AppError::ReadConfig { .. })
        ));
    }
}
