use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{InjectorError, Result};

/// A single fabricated position fix
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoFix {
    /// Decimal degrees, negative south
    pub latitude: f64,
    /// Decimal degrees, negative west
    pub longitude: f64,
    /// Horizontal accuracy in meters
    pub accuracy: f64,
    /// Unix epoch seconds at which the fix was fabricated
    pub timestamp: i64,
}

impl GeoFix {
    /// Create a fix stamped with the current wall-clock time.
    pub fn new(latitude: f64, longitude: f64, accuracy: f64) -> Result<Self> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() as i64)
            .unwrap_or(0);
        Self::with_timestamp(latitude, longitude, accuracy, timestamp)
    }

    /// Create a fix with an explicit epoch-seconds timestamp.
    ///
    /// Coordinates are validated here so downstream sinks never see
    /// out-of-range values.
    pub fn with_timestamp(
        latitude: f64,
        longitude: f64,
        accuracy: f64,
        timestamp: i64,
    ) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(InjectorError::InvalidFix(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(InjectorError::InvalidFix(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }
        if !accuracy.is_finite() || accuracy < 0.0 {
            return Err(InjectorError::InvalidFix(format!(
                "accuracy {} must be a non-negative number of meters",
                accuracy
            )));
        }
        Ok(Self {
            latitude,
            longitude,
            accuracy,
            timestamp,
        })
    }
}
