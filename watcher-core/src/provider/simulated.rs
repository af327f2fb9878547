//! Offline resolvers that imitate slow services with a fixed delay.

use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;

use crate::{City, Coordinates, StageError, WeatherReport};

use super::{CityResolver, ConditionsResolver, CoordinateResolver};

pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

pub const SIMULATED_CITY: &str = "Bangalore";
pub const SIMULATED_LATITUDE: f64 = 12.97;
pub const SIMULATED_LONGITUDE: f64 = 77.59;

#[derive(Debug, Clone)]
pub struct SimulatedCity {
    delay: Duration,
}

impl SimulatedCity {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl CityResolver for SimulatedCity {
    async fn resolve_city(&self) -> Result<City, StageError> {
        tokio::time::sleep(self.delay).await;
        Ok(City::from(SIMULATED_CITY))
    }
}

/// Answers every city with the same coordinates.
#[derive(Debug, Clone)]
pub struct SimulatedCoordinates {
    delay: Duration,
}

impl SimulatedCoordinates {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl CoordinateResolver for SimulatedCoordinates {
    async fn resolve_coordinates(&self, city: &City) -> Result<Coordinates, StageError> {
        city.require_non_empty()?;
        tokio::time::sleep(self.delay).await;
        Coordinates::new(SIMULATED_LATITUDE, SIMULATED_LONGITUDE)
    }
}

/// Always reports 28°C and sunny.
#[derive(Debug, Clone)]
pub struct SimulatedConditions {
    delay: Duration,
}

impl SimulatedConditions {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ConditionsResolver for SimulatedConditions {
    async fn resolve_conditions(
        &self,
        coordinates: &Coordinates,
    ) -> Result<WeatherReport, StageError> {
        tokio::time::sleep(self.delay).await;

        Ok(WeatherReport {
            location_name: SIMULATED_CITY.to_string(),
            country: None,
            coordinates: *coordinates,
            temperature_c: 28.0,
            temp_min_c: 28.0,
            temp_max_c: 28.0,
            description: "sunny".to_string(),
            icon: Some("02d".to_string()),
            wind_speed_mps: 0.0,
            sunrise: None,
            sunset: None,
            observation_time: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn conditions_for_bangalore_have_description_and_temperature() {
        let coords = Coordinates::new(12.97, 77.59).unwrap();
        let report = SimulatedConditions::new(Duration::ZERO)
            .resolve_conditions(&coords)
            .await
            .unwrap();

        assert!(!report.description.is_empty());
        assert!(report.temperature_c.is_finite());
        assert_eq!(report.coordinates, coords);
        assert_eq!(report.location_name, SIMULATED_CITY);
    }

    #[tokio::test]
    async fn empty_city_is_rejected_before_waiting() {
        // A delay this long would hang the test if the check came after the sleep.
        let resolver = SimulatedCoordinates::new(Duration::from_secs(3600));
        let err = resolver.resolve_coordinates(&City::from("")).await.unwrap_err();
        assert!(matches!(err, StageError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn city_stage_yields_bangalore() {
        let city = SimulatedCity::new(Duration::ZERO).resolve_city().await.unwrap();
        assert_eq!(city.as_str(), SIMULATED_CITY);
    }
}
