// crates/irradiance-core/src/error.rs

use irradiance_parser::ParserError;
use thiserror::Error;

use crate::sensors::SensorId;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("malformed input table: {0}")]
    Format(#[from] ParserError),

    #[error("raw tag '{tag}' is not mapped to any sensor in the catalog")]
    UnknownSensor { tag: String },

    #[error("tags '{first_tag}' and '{second_tag}' both resolve to sensor {sensor}")]
    DuplicateSensor {
        sensor: SensorId,
        first_tag: String,
        second_tag: String,
    },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("reference sensor {0} has no valid observations in the input")]
    MissingReference(SensorId),

    #[error("series for {sensor} has {found} points but the timeline has {expected}")]
    SeriesLength {
        sensor: SensorId,
        expected: usize,
        found: usize,
    },

    #[error("failed to parse TOML configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
