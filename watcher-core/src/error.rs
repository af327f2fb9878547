use thiserror::Error;

/// Failure of a single pipeline stage.
#[derive(Debug, Error)]
pub enum StageError {
    /// A stage received input it cannot work with. Raised before any I/O.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to resolve city")]
    CityResolution(#[source] anyhow::Error),

    #[error("Failed to resolve coordinates")]
    CoordinateResolution(#[source] anyhow::Error),

    #[error("Failed to resolve weather conditions")]
    WeatherResolution(#[source] anyhow::Error),
}

/// Uniform failure returned by the collapsed pipeline. Does not say which stage failed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Weather data not found")]
pub struct PipelineFailure;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn resolution_errors_keep_their_cause() {
        let err = StageError::CoordinateResolution(anyhow::anyhow!("status 404"));
        assert_eq!(err.to_string(), "Failed to resolve coordinates");
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("status 404"));
    }

    #[test]
    fn pipeline_failure_message_is_fixed() {
        assert_eq!(PipelineFailure.to_string(), "Weather data not found");
        assert!(PipelineFailure.source().is_none());
    }
}
