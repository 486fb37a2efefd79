//! Conversion between GTFS `HH:MM:SS` strings and seconds since midnight

use crate::{Error, Time};

/// Parse time string in HH:MM:SS format to seconds since midnight.
///
/// Hours may exceed 23 for trips running past midnight; a single digit hour
/// and surrounding whitespace are accepted as found in real feeds.
pub fn parse_time(time_str: &str) -> Result<Time, Error> {
    let invalid = || Error::InvalidData(format!("Invalid time '{time_str}'"));

    let mut parts = time_str.trim().split(':');
    let mut field = |max: Option<Time>| -> Result<Time, Error> {
        let part = parts.next().ok_or_else(invalid)?;
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let value: Time = part.parse().map_err(|_| invalid())?;
        match max {
            Some(max) if value > max => Err(invalid()),
            _ => Ok(value),
        }
    };

    let hours = field(None)?;
    let minutes = field(Some(59))?;
    let seconds = field(Some(59))?;
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok(hours * 3600 + minutes * 60 + seconds)
}

/// Format seconds since midnight as HH:MM:SS
pub fn format_time(seconds: Time) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}
