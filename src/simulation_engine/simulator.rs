// simulator.rs
//
// Replays a scenario against the controller. The simulator owns the clock
// and the sensors; the controller only ever sees them by reference at tick
// time. Call `advance()` to move time forward; sensors are refreshed from
// the scenario on every advance.

use crate::clock::{Clock, SimClock};
use crate::control_system::config::ControllerConfig;
use crate::control_system::phase_machine::PhaseChange;
use crate::control_system::traffic_light_controller::{
    ControllerBuilder, TickReport, TrafficLightController,
};
use crate::error::RunError;
use crate::monitoring::signal_trace::{SignalTrace, SignalTraceRecord};
use crate::shared_data::{
    all_sensors, Lane, Phase, SensorState, SignalState, Time, TrafficSignals, VehicleSensors,
    LANE_COUNT,
};
use crate::simulation_engine::scenario::Scenario;
use log::info;
use std::fmt;
use tokio::time::{sleep, Duration};

pub const BANNER: &str = "  Time     N-N   N-W   S-S   S-E   E-E   E-N   W-W   W-S\n\
==========================================================";

/// A simulator replays sensor data from a given scenario.
#[derive(Debug, Clone)]
pub struct Simulator {
    scenario: Scenario,
    clock: SimClock,
    done: bool,
    sensors: VehicleSensors,
    signals: TrafficSignals,
}

impl Simulator {
    pub fn new(scenario: Scenario) -> Self {
        let mut simulator = Self {
            scenario,
            clock: SimClock::new(),
            done: false,
            sensors: all_sensors(SensorState::Clear),
            signals: [SignalState::Red; LANE_COUNT],
        };
        // seed the sensors for t=0
        simulator.update_simulation();
        simulator
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn sensors(&self) -> &VehicleSensors {
        &self.sensors
    }

    pub fn signals(&self) -> &TrafficSignals {
        &self.signals
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// True once time has moved past the end of the scenario.
    pub fn done(&self) -> bool {
        self.done
    }

    pub fn update_lane_signals(&mut self, signals: &TrafficSignals) {
        self.signals = *signals;
    }

    /// Moves simulated time forward. Deltas larger than a timeslice will skip
    /// over it.
    pub fn advance(&mut self, delta: Time) {
        self.clock.advance(delta);
        self.update_simulation();
    }

    fn update_simulation(&mut self) {
        match self.scenario.timeslice_at(self.clock.now()) {
            Some(slice) => self.sensors = slice.sensors,
            None => self.done = true,
        }
    }
}

impl fmt::Display for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>4}s] ", self.clock.now())?;
        for lane in Lane::ALL {
            write!(f, " | {}", self.signals[lane.index()])?;
        }
        write!(f, " | ")
    }
}

/// What a finished replay looked like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSummary {
    pub scenario: String,
    /// Simulated seconds covered by the scenario.
    pub duration: Time,
    pub ticks: u64,
    pub phase_changes: Vec<PhaseChange>,
    pub final_phase: Phase,
    pub longest_wait: Option<(Lane, Time)>,
}

impl ScenarioSummary {
    /// Phases in the order they were turned on, starting with the initial
    /// one.
    pub fn phase_sequence(&self) -> Vec<(Time, Phase)> {
        let mut sequence = vec![(0, Phase::NorthSouthTurning)];
        sequence.extend(self.phase_changes.iter().map(|change| (change.at, change.to)));
        sequence
    }
}

/// Drives a controller through one scenario, tick by tick.
pub struct ScenarioRun<'t> {
    simulator: Simulator,
    controller: TrafficLightController,
    time_step: Time,
    trace: Option<&'t mut SignalTrace>,
    echo: bool,
    phase_changes: Vec<PhaseChange>,
}

impl<'t> ScenarioRun<'t> {
    pub fn new(scenario: &Scenario, config: &ControllerConfig) -> Result<Self, RunError> {
        config.validate()?;
        scenario.validate()?;

        let simulator = Simulator::new(scenario.clone());
        let controller = ControllerBuilder::from_config(config).initialize(simulator.clock())?;

        Ok(Self {
            simulator,
            controller,
            time_step: config.time_step,
            trace: None,
            echo: false,
            phase_changes: Vec::new(),
        })
    }

    pub fn with_trace(mut self, trace: &'t mut SignalTrace) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Print one table row per tick.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn is_done(&self) -> bool {
        self.simulator.done()
    }

    pub fn controller(&self) -> &TrafficLightController {
        &self.controller
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    /// One tick: evaluate, publish signals, record, then advance the clock.
    pub fn step(&mut self) -> Result<TickReport, RunError> {
        let report = self
            .controller
            .tick(self.simulator.clock(), self.simulator.sensors());
        self.simulator
            .update_lane_signals(self.controller.current_signals());

        if self.echo {
            println!("{}", self.simulator);
        }

        if let Some(trace) = self.trace.as_deref_mut() {
            trace.record(&SignalTraceRecord::new(
                &self.simulator.scenario().name,
                report.time,
                report.active_phase,
                report.cars_waiting,
                self.simulator.signals(),
            ))?;
        }

        self.phase_changes.extend(report.phase_changes.iter().copied());
        self.simulator.advance(self.time_step);
        Ok(report)
    }

    pub fn run(mut self) -> Result<ScenarioSummary, RunError> {
        self.start();
        while !self.is_done() {
            self.step()?;
        }
        self.finish()
    }

    /// Same as [`ScenarioRun::run`] but waits `delay` of real time between
    /// ticks.
    pub async fn run_paced(mut self, delay: Duration) -> Result<ScenarioSummary, RunError> {
        self.start();
        while !self.is_done() {
            self.step()?;
            sleep(delay).await;
        }
        self.finish()
    }

    fn start(&self) {
        info!("Running {}.", self.simulator.scenario().name);
        if self.echo {
            println!("{}", self.simulator.scenario().name);
            println!("{}", BANNER);
        }
    }

    pub fn finish(mut self) -> Result<ScenarioSummary, RunError> {
        if let Some(trace) = self.trace.as_deref_mut() {
            trace.flush()?;
        }

        Ok(ScenarioSummary {
            scenario: self.simulator.scenario().name.clone(),
            duration: self.simulator.scenario().end(),
            ticks: self.controller.ticks(),
            phase_changes: self.phase_changes,
            final_phase: self.controller.active_phase(),
            longest_wait: self.controller.longest_wait(),
        })
    }
}

/// Replays `scenario` to completion with no pacing.
pub fn run_scenario(
    scenario: &Scenario,
    config: &ControllerConfig,
    trace: Option<&mut SignalTrace>,
) -> Result<ScenarioSummary, RunError> {
    let run = ScenarioRun::new(scenario, config)?;
    match trace {
        Some(trace) => run.with_trace(trace).run(),
        None => run.run(),
    }
}
