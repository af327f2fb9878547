//! Core library for the `weather-watcher` CLI.
//!
//! This crate defines:
//! - The city -> coordinates -> conditions fetch pipeline
//! - Stage resolvers (simulated and OpenWeather-backed)
//! - Shared domain models and the stage error taxonomy
//! - Configuration & credentials handling
//!
//! It is used by `watcher-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod provider;

pub use config::Config;
pub use error::{PipelineFailure, StageError};
pub use model::{City, Coordinates, WeatherReport};
pub use pipeline::SequentialFetchPipeline;
pub use provider::{CityResolver, ConditionsResolver, CoordinateResolver, GivenCity};
