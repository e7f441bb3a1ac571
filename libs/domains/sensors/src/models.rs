use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{SensorError, SensorResult};

/// One measurement taken by a sensor
///
/// Readings for a sensor share a partition and are clustered newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SensorReading {
    #[validate(length(min = 1, max = 128))]
    pub sensor_id: String,
    pub timestamp: DateTime<Utc>,
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity: f64,
    /// CO2 concentration in ppm
    #[validate(range(min = 0.0))]
    pub co2_level: f64,
    #[serde(default)]
    pub location: Option<String>,
}

impl SensorReading {
    pub fn new(
        sensor_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        temperature: f64,
        humidity: f64,
        co2_level: f64,
    ) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            timestamp,
            temperature,
            humidity,
            co2_level,
            location: None,
        }
    }

    pub fn at_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Field rules plus the finiteness check the derive cannot express
    pub fn check(&self) -> SensorResult<()> {
        self.validate()?;

        let measurements = [
            ("temperature", self.temperature),
            ("humidity", self.humidity),
            ("co2_level", self.co2_level),
        ];
        for (field, value) in measurements {
            if !value.is_finite() {
                return Err(SensorError::Validation(format!(
                    "{} must be a finite number, got {}",
                    field, value
                )));
            }
        }

        if self.sensor_id.trim().is_empty() {
            return Err(SensorError::Validation(
                "sensor_id must not be blank".to_string(),
            ));
        }

        Ok(())
    }
}
