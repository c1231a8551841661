// scenario.rs
//
// A scenario is a list of sensor states replayed by the simulator. Each
// timeslice covers [start, end) and holds the sensor readings for that span.
// Scenarios are replayed blindly (open loop): nothing the controller does
// changes what the sensors report.

use crate::error::ScenarioError;
use crate::global_variables::TIME_STEP;
use crate::shared_data::{all_sensors, sensors_with, Lane, SensorState, Time, VehicleSensors};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Describes the simulator state for the timespan [start, end).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationTimeslice {
    pub start: Time,
    pub end: Time,
    pub sensors: VehicleSensors,
}

impl SimulationTimeslice {
    pub fn new(start: Time, end: Time, sensors: VehicleSensors) -> Self {
        Self { start, end, sensors }
    }

    pub fn contains(&self, time: Time) -> bool {
        time >= self.start && time < self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub timeslices: Vec<SimulationTimeslice>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, timeslices: Vec<SimulationTimeslice>) -> Self {
        Self {
            name: name.into(),
            timeslices,
        }
    }

    /// The timeslice covering `time`, first match wins.
    pub fn timeslice_at(&self, time: Time) -> Option<&SimulationTimeslice> {
        self.timeslices.iter().find(|slice| slice.contains(time))
    }

    pub fn end(&self) -> Time {
        self.timeslices.iter().map(|slice| slice.end).max().unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.timeslices.is_empty() {
            return Err(ScenarioError::EmptyScenario);
        }
        for slice in &self.timeslices {
            if slice.start >= slice.end {
                return Err(ScenarioError::InvalidTimeslice {
                    start: slice.start,
                    end: slice.end,
                });
            }
        }
        Ok(())
    }

    /// Reads a scenario from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let raw = fs::read_to_string(path)?;
        let scenario: Scenario = serde_json::from_str(&raw)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Looks up a built-in scenario by number ("2") or name ("scenario_2").
    pub fn builtin(name: &str) -> Result<Self, ScenarioError> {
        let number = name.trim_start_matches("scenario_");
        match number {
            "1" => Ok(scenario_1()),
            "2" => Ok(scenario_2()),
            "3" => Ok(scenario_3()),
            "4" => Ok(scenario_4()),
            _ => Err(ScenarioError::UnknownScenario(name.to_string())),
        }
    }

    /// Resolves a command-line argument: `random` or `random:<seed>`, a path
    /// to a JSON scenario file, or a built-in name.
    pub fn from_arg(arg: &str, random_duration: Time) -> Result<Self, ScenarioError> {
        if arg == "random" {
            return Ok(Self::random(0, random_duration, TIME_STEP));
        }
        if let Some(seed) = arg.strip_prefix("random:") {
            let seed = seed.parse().map_err(|source| ScenarioError::InvalidSeed {
                seed: seed.to_string(),
                source,
            })?;
            return Ok(Self::random(seed, random_duration, TIME_STEP));
        }
        if Path::new(arg).is_file() {
            return Self::load(arg);
        }
        Self::builtin(arg)
    }

    pub fn builtins() -> Vec<Scenario> {
        vec![scenario_1(), scenario_2(), scenario_3(), scenario_4()]
    }

    /// Random traffic: every `slice_len` seconds each lane independently
    /// has a car with probability one half. The same seed always gives the
    /// same scenario.
    pub fn random(seed: u64, duration: Time, slice_len: Time) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let slice_len = slice_len.max(1);
        let mut timeslices = Vec::new();

        let mut start = 0;
        while start < duration {
            let end = (start + slice_len).min(duration);
            let mut sensors = all_sensors(SensorState::Clear);
            for sensor in sensors.iter_mut() {
                if rng.random_bool(0.5) {
                    *sensor = SensorState::Set;
                }
            }
            timeslices.push(SimulationTimeslice::new(start, end, sensors));
            start = end;
        }

        Self::new(format!("random_{seed}"), timeslices)
    }
}

/// At T+0, non-stop traffic in all directions. Continues for 5 minutes.
pub fn scenario_1() -> Scenario {
    Scenario::new(
        "scenario_1",
        vec![SimulationTimeslice::new(0, 300, all_sensors(SensorState::Set))],
    )
}

/// At T+0 there is N_W and S_E traffic. At T+10 an endless line of vehicles
/// pulls up to the N_N sensor. At T+20 all N_W and S_E traffic stops.
pub fn scenario_2() -> Scenario {
    Scenario::new(
        "scenario_2",
        vec![
            SimulationTimeslice::new(0, 10, sensors_with(&[Lane::N_W, Lane::S_E])),
            SimulationTimeslice::new(10, 20, sensors_with(&[Lane::N_N, Lane::N_W, Lane::S_E])),
            SimulationTimeslice::new(20, 300, sensors_with(&[Lane::N_N])),
        ],
    )
}

/// Full traffic for 5 minutes, then the turning/through handover of
/// scenario 2 with the N_N queue overlapping the turners for 20 seconds.
pub fn scenario_3() -> Scenario {
    let mut timeslices = scenario_1().timeslices;
    timeslices.extend([
        SimulationTimeslice::new(300, 310, sensors_with(&[Lane::N_W, Lane::S_E])),
        SimulationTimeslice::new(310, 330, sensors_with(&[Lane::N_N, Lane::N_W, Lane::S_E])),
        SimulationTimeslice::new(330, 600, sensors_with(&[Lane::N_N])),
    ]);
    Scenario::new("scenario_3", timeslices)
}

/// Scenario 3, then full traffic again from T+600 to T+900.
pub fn scenario_4() -> Scenario {
    let mut timeslices = scenario_3().timeslices;
    timeslices.push(SimulationTimeslice::new(600, 900, all_sensors(SensorState::Set)));
    Scenario::new("scenario_4", timeslices)
}
