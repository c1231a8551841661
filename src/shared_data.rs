// src/shared_data.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// All timestamps are whole seconds.
pub type Time = u64;

pub const LANE_COUNT: usize = 8;
pub const PHASE_COUNT: usize = 4;

/// Each lane is identified by the direction a vehicle enters the
/// intersection from and the direction it leaves towards.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    /// North going straight through
    N_N,
    /// North turning west
    N_W,
    /// South going straight through
    S_S,
    /// South turning east
    S_E,
    /// East going straight through
    E_E,
    /// East turning north
    E_N,
    /// West going straight through
    W_W,
    /// West turning south
    W_S,
}

impl Lane {
    pub const ALL: [Lane; LANE_COUNT] = [
        Lane::N_N,
        Lane::N_W,
        Lane::S_S,
        Lane::S_E,
        Lane::E_E,
        Lane::E_N,
        Lane::W_W,
        Lane::W_S,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Lane::N_N => "N_N",
            Lane::N_W => "N_W",
            Lane::S_S => "S_S",
            Lane::S_E => "S_E",
            Lane::E_E => "E_E",
            Lane::E_N => "E_N",
            Lane::W_W => "W_W",
            Lane::W_S => "W_S",
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four light patterns, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// N_W & S_E turning
    NorthSouthTurning,
    /// N_N & S_S through
    NorthSouthThrough,
    /// E_N & W_S turning
    EastWestTurning,
    /// E_E & W_W through
    EastWestThrough,
}

impl Phase {
    pub const ALL: [Phase; PHASE_COUNT] = [
        Phase::NorthSouthTurning,
        Phase::NorthSouthThrough,
        Phase::EastWestTurning,
        Phase::EastWestThrough,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// The phase that follows this one. EastWestThrough wraps back to
    /// NorthSouthTurning.
    pub const fn next(self) -> Phase {
        match self {
            Phase::NorthSouthTurning => Phase::NorthSouthThrough,
            Phase::NorthSouthThrough => Phase::EastWestTurning,
            Phase::EastWestTurning => Phase::EastWestThrough,
            Phase::EastWestThrough => Phase::NorthSouthTurning,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::NorthSouthTurning => "NorthSouthTurning",
            Phase::NorthSouthThrough => "NorthSouthThrough",
            Phase::EastWestTurning => "EastWestTurning",
            Phase::EastWestThrough => "EastWestThrough",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reading of a single in-road vehicle sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorState {
    /// Car is present
    Set,
    /// No car is present
    Clear,
}

impl SensorState {
    pub fn is_set(self) -> bool {
        self == SensorState::Set
    }
}

/// Colour shown on a lane's signal head. Yellow is never produced by the
/// controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalState {
    Red,
    Yellow,
    Green,
}

impl SignalState {
    pub fn label(self) -> &'static str {
        match self {
            SignalState::Red => "RED",
            SignalState::Yellow => "YLW",
            SignalState::Green => "GRN",
        }
    }
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One sensor per lane, indexed by `Lane::index`.
pub type VehicleSensors = [SensorState; LANE_COUNT];

/// One signal per lane, indexed by `Lane::index`.
pub type TrafficSignals = [SignalState; LANE_COUNT];

pub fn all_sensors(state: SensorState) -> VehicleSensors {
    [state; LANE_COUNT]
}

/// Builds a sensor snapshot with only the given lanes set.
pub fn sensors_with(lanes: &[Lane]) -> VehicleSensors {
    let mut sensors = all_sensors(SensorState::Clear);
    for lane in lanes {
        sensors[lane.index()] = SensorState::Set;
    }
    sensors
}
