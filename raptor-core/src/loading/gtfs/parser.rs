use std::fs::File;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;

use crate::Error;

/// Locate `<name>.txt`, falling back to `<name>.csv`
pub fn feed_file(dir: &Path, name: &str) -> Option<PathBuf> {
    ["txt", "csv"]
        .iter()
        .map(|extension| dir.join(format!("{name}.{extension}")))
        .find(|path| path.is_file())
}

/// Deserialize every row of a GTFS file, skipping rows that do not parse
pub fn deserialize_gtfs_file<T>(path: &Path) -> Result<Vec<T>, Error>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;

    let mut skipped = 0usize;
    let records = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file)
        .deserialize()
        .filter_map(|record| match record {
            Ok(record) => Some(record),
            Err(e) => {
                skipped += 1;
                debug!("Malformed row in '{}': {e}", path.display());
                None
            }
        })
        .collect::<Vec<T>>();

    if skipped > 0 {
        warn!("Skipped {skipped} malformed rows in '{}'", path.display());
    }
    Ok(records)
}

pub(super) fn deserialize_gtfs_date<'de, D>(
    deserializer: D,
) -> Result<Option<chrono::NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let date_str = String::deserialize(deserializer)?;
    if date_str.is_empty() {
        Ok(None)
    } else {
        chrono::NaiveDate::parse_from_str(&date_str, "%Y%m%d")
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}
