use crate::error::ConfigError;
use crate::global_variables::{DEFAULT_MAX_WAIT_TIME, TIME_STEP};
use crate::shared_data::{Phase, Time};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Minimum and maximum green time for one phase, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTiming {
    pub min_active_time: Time,
    pub max_active_time: Time,
}

impl PhaseTiming {
    pub const fn new(min_active_time: Time, max_active_time: Time) -> Self {
        Self {
            min_active_time,
            max_active_time,
        }
    }
}

/// Per-phase timings, one field per phase so config files read naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseTimings {
    pub north_south_turning: PhaseTiming,
    pub north_south_through: PhaseTiming,
    pub east_west_turning: PhaseTiming,
    pub east_west_through: PhaseTiming,
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self {
            north_south_turning: PhaseTiming::new(10, 60),
            north_south_through: PhaseTiming::new(30, 120),
            east_west_turning: PhaseTiming::new(10, 30),
            east_west_through: PhaseTiming::new(30, 60),
        }
    }
}

impl PhaseTimings {
    pub fn get(&self, phase: Phase) -> PhaseTiming {
        match phase {
            Phase::NorthSouthTurning => self.north_south_turning,
            Phase::NorthSouthThrough => self.north_south_through,
            Phase::EastWestTurning => self.east_west_turning,
            Phase::EastWestThrough => self.east_west_through,
        }
    }

    pub fn set(&mut self, phase: Phase, timing: PhaseTiming) {
        match phase {
            Phase::NorthSouthTurning => self.north_south_turning = timing,
            Phase::NorthSouthThrough => self.north_south_through = timing,
            Phase::EastWestTurning => self.east_west_turning = timing,
            Phase::EastWestThrough => self.east_west_through = timing,
        }
    }

    /// Rejects any phase whose minimum exceeds its maximum.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for phase in Phase::ALL {
            let timing = self.get(phase);
            if timing.min_active_time > timing.max_active_time {
                return Err(ConfigError::InvalidPhaseTiming {
                    phase,
                    min: timing.min_active_time,
                    max: timing.max_active_time,
                });
            }
        }
        Ok(())
    }
}

/// Runtime configuration for the controller and the scenario driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Max wait time for a vehicle at a red light. Carried for reporting
    /// only; no controller decision reads it.
    pub max_wait_time: Time,
    /// Seconds the simulated clock advances between ticks.
    pub time_step: Time,
    /// Real-time delay between ticks when driving a scenario. Zero runs
    /// as fast as possible.
    pub tick_delay_ms: u64,
    /// Append every tick's signals to this CSV file when set.
    pub trace_csv: Option<String>,
    pub timings: PhaseTimings,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_wait_time: DEFAULT_MAX_WAIT_TIME,
            time_step: TIME_STEP,
            tick_delay_ms: 0,
            trace_csv: None,
            timings: PhaseTimings::default(),
        }
    }
}

impl ControllerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: ControllerConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_step == 0 {
            return Err(ConfigError::ZeroTimeStep);
        }
        self.timings.validate()
    }
}
