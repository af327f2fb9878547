use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StageError;

/// Human-readable city identifier, as handed from stage 1 to stage 2.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct City(String);

impl City {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the trimmed name, or `InvalidInput` if nothing is left.
    pub fn require_non_empty(&self) -> Result<&str, StageError> {
        let name = self.0.trim();
        if name.is_empty() {
            return Err(StageError::InvalidInput("city name must not be empty".to_string()));
        }
        Ok(name)
    }
}

impl From<&str> for City {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for City {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Latitude/longitude pair. Only constructible within the valid ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, StageError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(StageError::InvalidInput(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(StageError::InvalidInput(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Current conditions at a location, ready for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub location_name: String,
    pub country: Option<String>,
    pub coordinates: Coordinates,
    pub temperature_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub description: String,
    /// Provider icon code, e.g. "02d".
    pub icon: Option<String>,
    pub wind_speed_mps: f64,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub observation_time: DateTime<Utc>,
}

impl WeatherReport {
    pub fn icon_url(&self) -> Option<String> {
        self.icon
            .as_deref()
            .map(|icon| format!("https://openweathermap.org/img/wn/{icon}@2x.png"))
    }

    /// "Bangalore, IN", or just the name when the country is unknown.
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.location_name, country),
            None => self.location_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_city_is_rejected() {
        let err = City::from("   ").require_non_empty().unwrap_err();
        assert!(matches!(err, StageError::InvalidInput(_)));

        assert_eq!(City::from(" Bangalore ").require_non_empty().unwrap(), "Bangalore");
    }

    #[test]
    fn coordinates_enforce_ranges() {
        assert!(Coordinates::new(12.97, 77.59).is_ok());
        assert!(Coordinates::new(-90.0, 180.0).is_ok());

        assert!(matches!(Coordinates::new(90.5, 0.0), Err(StageError::InvalidInput(_))));
        assert!(matches!(Coordinates::new(0.0, -180.1), Err(StageError::InvalidInput(_))));
        assert!(matches!(Coordinates::new(f64::NAN, 0.0), Err(StageError::InvalidInput(_))));
    }

    #[test]
    fn icon_url_uses_provider_code() {
        let report = WeatherReport {
            location_name: "Bangalore".to_string(),
            country: Some("IN".to_string()),
            coordinates: Coordinates::new(12.97, 77.59).unwrap(),
            temperature_c: 28.0,
            temp_min_c: 27.0,
            temp_max_c: 29.0,
            description: "sunny".to_string(),
            icon: Some("02d".to_string()),
            wind_speed_mps: 3.1,
            sunrise: None,
            sunset: None,
            observation_time: Utc::now(),
        };

        assert_eq!(
            report.icon_url().as_deref(),
            Some("https://openweathermap.org/img/wn/02d@2x.png")
        );
        assert_eq!(report.display_name(), "Bangalore, IN");
    }
}
