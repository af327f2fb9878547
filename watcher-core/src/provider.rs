use crate::{City, Coordinates, StageError, WeatherReport};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;
pub mod simulated;

/// Stage 1: produce the city to look up.
#[async_trait]
pub trait CityResolver: Send + Sync + Debug {
    async fn resolve_city(&self) -> Result<City, StageError>;
}

/// Stage 2: map a city to its coordinates.
///
/// Implementations must reject an empty city with [`StageError::InvalidInput`]
/// before contacting anything external.
#[async_trait]
pub trait CoordinateResolver: Send + Sync + Debug {
    async fn resolve_coordinates(&self, city: &City) -> Result<Coordinates, StageError>;
}

/// Stage 3: map coordinates to current conditions.
#[async_trait]
pub trait ConditionsResolver: Send + Sync + Debug {
    async fn resolve_conditions(&self, coordinates: &Coordinates)
    -> Result<WeatherReport, StageError>;
}

/// Caller-supplied city. Stands in for stage 1 in the live pipeline.
#[derive(Debug, Clone)]
pub struct GivenCity(City);

impl GivenCity {
    pub fn new(city: impl Into<City>) -> Self {
        Self(city.into())
    }
}

#[async_trait]
impl CityResolver for GivenCity {
    async fn resolve_city(&self) -> Result<City, StageError> {
        Ok(self.0.clone())
    }
}
