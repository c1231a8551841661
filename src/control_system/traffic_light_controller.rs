use crate::clock::Clock;
use crate::control_system::config::{ControllerConfig, PhaseTimings};
use crate::control_system::phase_machine::{PhaseChange, PhaseRecord, PhaseStateMachine};
use crate::control_system::wait_tracker::{VehicleRecord, VehicleWaitTracker};
use crate::error::ConfigError;
use crate::global_variables::DEFAULT_MAX_WAIT_TIME;
use crate::shared_data::{Lane, Phase, SignalState, Time, TrafficSignals, VehicleSensors};
use log::info;

/// Collects the controller settings. [`ControllerBuilder::initialize`] is
/// the only way to get a [`TrafficLightController`], so a controller that
/// exists is always ready to tick.
#[derive(Debug, Clone)]
pub struct ControllerBuilder {
    max_wait_time: Time,
    timings: PhaseTimings,
}

impl Default for ControllerBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WAIT_TIME)
    }
}

impl ControllerBuilder {
    pub fn new(max_wait_time: Time) -> Self {
        Self {
            max_wait_time,
            timings: PhaseTimings::default(),
        }
    }

    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(config.max_wait_time).timings(config.timings)
    }

    pub fn timings(mut self, timings: PhaseTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Validates the phase timings, sets up the phase and vehicle records and
    /// starts the cycle in the NorthSouthTurning pattern.
    pub fn initialize<C: Clock>(self, clock: &C) -> Result<TrafficLightController, ConfigError> {
        self.timings.validate()?;

        let mut phases = PhaseStateMachine::new(&self.timings);
        phases.start(Phase::NorthSouthTurning, clock.now());

        info!("Initialized traffic light controller at {}s.", clock.now());

        Ok(TrafficLightController {
            phases,
            vehicles: VehicleWaitTracker::new(),
            max_wait_time: self.max_wait_time,
            ticks: 0,
        })
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub time: Time,
    pub phase_changes: Vec<PhaseChange>,
    pub active_phase: Phase,
    pub cars_waiting: bool,
}

/// Controls a four-way traffic light intersection.
#[derive(Debug, Clone)]
pub struct TrafficLightController {
    phases: PhaseStateMachine,
    vehicles: VehicleWaitTracker,
    max_wait_time: Time,
    ticks: u64,
}

impl TrafficLightController {
    /// Runs one evaluation cycle against the given time and sensor snapshot.
    ///
    /// The cycle check runs first, using the clearance and queue state left
    /// by the previous tick. The sensor pass then runs against the signals
    /// the cycle check just set, so a lane that turned green this tick has
    /// its queue released on this tick.
    pub fn tick<C: Clock>(&mut self, clock: &C, sensors: &VehicleSensors) -> TickReport {
        let phase_changes = self.phases.evaluate(clock, self.vehicles.cars_waiting());

        let pass = self.vehicles.process(clock, sensors, self.phases.signals());
        for (lane, is_clear) in pass.clearances() {
            self.phases.set_opposing_lanes_clear(lane, is_clear);
        }

        self.ticks += 1;

        TickReport {
            time: clock.now(),
            phase_changes,
            active_phase: self.phases.active_phase(),
            cars_waiting: pass.cars_waiting,
        }
    }

    pub fn current_signals(&self) -> &TrafficSignals {
        self.phases.signals()
    }

    pub fn is_lane_green(&self, lane: Lane) -> bool {
        self.current_signals()[lane.index()] == SignalState::Green
    }

    pub fn active_phase(&self) -> Phase {
        self.phases.active_phase()
    }

    pub fn phase_record(&self, phase: Phase) -> &PhaseRecord {
        self.phases.record(phase)
    }

    pub fn phase_records(&self) -> impl Iterator<Item = &PhaseRecord> {
        self.phases.records().iter()
    }

    pub fn vehicle_record(&self, lane: Lane) -> &VehicleRecord {
        self.vehicles.record(lane)
    }

    pub fn longest_wait(&self) -> Option<(Lane, Time)> {
        self.vehicles.longest_wait()
    }

    pub fn cars_waiting(&self) -> bool {
        self.vehicles.cars_waiting()
    }

    /// Configured max wait at a red light. No decision depends on it.
    pub fn max_wait_time(&self) -> Time {
        self.max_wait_time
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
