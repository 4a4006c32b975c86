// lib/src/util.rs

use chrono::Local;
use models::errors::{HospitalError, HospitalResult};

/// Today's date as the `YYYY-MM-DD` stamp stored on records.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// The current wall-clock time as the `HH:MM:SS` stamp stored on records.
pub fn time_now() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Parses an `HH:MM` wall-clock value into minutes since midnight.
pub fn minutes_since_midnight(value: &str) -> HospitalResult<u32> {
    let mut parts = value.split(':');
    let (hours, minutes) = match (parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(m), None) => (h, m),
        _ => {
            return Err(HospitalError::Validation(format!(
                "Expected HH:MM time, got '{}'",
                value
            )))
        }
    };
    let hours: u32 = hours.parse().map_err(|_| {
        HospitalError::Validation(format!("Expected HH:MM time, got '{}'", value))
    })?;
    let minutes: u32 = minutes.parse().map_err(|_| {
        HospitalError::Validation(format!("Expected HH:MM time, got '{}'", value))
    })?;
    if hours > 23 || minutes > 59 {
        return Err(HospitalError::Validation(format!(
            "Time '{}' is out of range",
            value
        )));
    }
    Ok(hours * 60 + minutes)
}
