use crate::shared_data::{Phase, Time};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("phase {phase} has min active time {min}s greater than max active time {max}s")]
    InvalidPhaseTiming { phase: Phase, min: Time, max: Time },
    #[error("time step must be at least one second")]
    ZeroTimeStep,
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scenario has no timeslices")]
    EmptyScenario,
    #[error("timeslice [{start}, {end}) is empty or reversed")]
    InvalidTimeslice { start: Time, end: Time },
    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),
    #[error("invalid random seed '{seed}': {source}")]
    InvalidSeed {
        seed: String,
        source: std::num::ParseIntError,
    },
}

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("trace file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("trace csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Anything that can stop a scenario run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error(transparent)]
    Trace(#[from] TraceError),
}
