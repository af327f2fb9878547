use std::time::Duration;

use tracing::{debug, info};

use crate::{
    City, PipelineFailure, StageError, WeatherReport,
    provider::{
        CityResolver, ConditionsResolver, CoordinateResolver, GivenCity,
        openweather::OpenWeatherClient,
        simulated::{SimulatedCity, SimulatedConditions, SimulatedCoordinates},
    },
};

/// Runs city -> coordinates -> conditions in strict order.
///
/// Each stage starts only after the previous one succeeded; the first error
/// aborts the run and no later stage is invoked. The pipeline holds no
/// mutable state, so one instance can serve concurrent runs.
#[derive(Debug)]
pub struct SequentialFetchPipeline {
    city: Box<dyn CityResolver>,
    coordinates: Box<dyn CoordinateResolver>,
    conditions: Box<dyn ConditionsResolver>,
}

impl SequentialFetchPipeline {
    pub fn new(
        city: Box<dyn CityResolver>,
        coordinates: Box<dyn CoordinateResolver>,
        conditions: Box<dyn ConditionsResolver>,
    ) -> Self {
        Self { city, coordinates, conditions }
    }

    /// Live variant: the caller names the city, OpenWeather does the rest.
    pub fn for_city(city: impl Into<City>, client: OpenWeatherClient) -> Self {
        Self::new(Box::new(GivenCity::new(city)), Box::new(client.clone()), Box::new(client))
    }

    /// Offline variant where every stage sleeps for `delay` and returns canned data.
    pub fn simulated(delay: Duration) -> Self {
        Self::new(
            Box::new(SimulatedCity::new(delay)),
            Box::new(SimulatedCoordinates::new(delay)),
            Box::new(SimulatedConditions::new(delay)),
        )
    }

    /// Run all stages, returning the report or the first stage error.
    pub async fn run(&self) -> Result<WeatherReport, StageError> {
        let city = self.city.resolve_city().await?;
        info!("Fetched city.");

        let coordinates = self.coordinates.resolve_coordinates(&city).await?;
        info!("Got coordinates for {city}.");

        let report = self.conditions.resolve_conditions(&coordinates).await?;
        info!("Weather fetched for {coordinates}.");

        Ok(report)
    }

    /// Like [`run`](Self::run), but every failure is reported as the same
    /// [`PipelineFailure`]. The underlying cause is only logged.
    pub async fn run_collapsed(&self) -> Result<WeatherReport, PipelineFailure> {
        self.run().await.map_err(|err| {
            debug!(error = ?err, "pipeline failed");
            PipelineFailure
        })
    }
}
