use crate::clock::Clock;
use crate::control_system::config::PhaseTimings;
use crate::control_system::topology::{phase_contains, phase_lanes};
use crate::shared_data::{Lane, Phase, SignalState, Time, TrafficSignals, LANE_COUNT, PHASE_COUNT};
use log::{debug, info};

/// Traffic light on/off and time tracking for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseRecord {
    pub phase: Phase,
    pub is_on: bool,
    pub opposing_lanes_clear: bool,
    pub start_time: Time,
    pub active_time: Time,
    pub min_active_time: Time,
    pub max_active_time: Time,
}

impl PhaseRecord {
    fn new(phase: Phase, min_active_time: Time, max_active_time: Time) -> Self {
        Self {
            phase,
            is_on: false,
            opposing_lanes_clear: false,
            start_time: 0,
            active_time: 0,
            min_active_time,
            max_active_time,
        }
    }
}

/// Why a phase handed over to its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceReason {
    /// Minimum met and vehicles are queued at red lights.
    CarsWaiting,
    /// Hard ceiling reached.
    MaxActiveTime,
    /// Minimum met and another phase's opposing lanes are clear.
    OpposingLanesClear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub at: Time,
    pub from: Phase,
    pub to: Phase,
    pub active_for: Time,
    pub reason: AdvanceReason,
}

/// Owns the four phase records and the per-lane signal output.
///
/// Exactly one phase is on once [`PhaseStateMachine::start`] has run. Every
/// transition goes through [`PhaseStateMachine::advance`], which turns the
/// outgoing phase off before turning its successor on.
#[derive(Debug, Clone)]
pub struct PhaseStateMachine {
    records: [PhaseRecord; PHASE_COUNT],
    signals: TrafficSignals,
    active: Phase,
}

impl PhaseStateMachine {
    pub fn new(timings: &PhaseTimings) -> Self {
        let records = Phase::ALL.map(|phase| {
            let timing = timings.get(phase);
            PhaseRecord::new(phase, timing.min_active_time, timing.max_active_time)
        });

        Self {
            records,
            signals: [SignalState::Red; LANE_COUNT],
            active: Phase::NorthSouthTurning,
        }
    }

    /// Turns on the first phase without going through the cycle. Only used
    /// when the controller is brought up.
    pub fn start(&mut self, phase: Phase, now: Time) {
        for record in self.records.iter_mut() {
            record.is_on = false;
            record.start_time = 0;
            record.active_time = 0;
        }
        self.signals = [SignalState::Red; LANE_COUNT];
        self.enable(phase, now);
    }

    /// Runs one pass of the cycle check over the phases in fixed order and
    /// returns every hand-over it made.
    ///
    /// The scan stops at the first phase that is on with clear opposing
    /// lanes, so later phases are not looked at on that tick.
    pub fn evaluate<C: Clock>(&mut self, clock: &C, cars_waiting: bool) -> Vec<PhaseChange> {
        let mut changes = Vec::new();

        for index in 0..PHASE_COUNT {
            let record = self.records[index];

            if record.is_on && record.opposing_lanes_clear {
                break;
            }

            if record.is_on {
                let active_time = clock.elapsed(record.start_time);
                self.records[index].active_time = active_time;

                if active_time >= record.min_active_time && cars_waiting {
                    changes.push(self.advance(record.phase, clock.now(), AdvanceReason::CarsWaiting));
                } else if active_time >= record.max_active_time {
                    changes.push(self.advance(record.phase, clock.now(), AdvanceReason::MaxActiveTime));
                }
            }

            // Re-read: an advance above switches this record off.
            let record = self.records[index];
            if !record.is_on && record.opposing_lanes_clear {
                self.release_satisfied_phases(clock, &mut changes);
            }
        }

        changes
    }

    /// Lets any running phase that has met its minimum hand over early.
    fn release_satisfied_phases<C: Clock>(&mut self, clock: &C, changes: &mut Vec<PhaseChange>) {
        for index in 0..PHASE_COUNT {
            if !self.records[index].is_on {
                continue;
            }

            let active_time = clock.elapsed(self.records[index].start_time);
            self.records[index].active_time = active_time;

            if active_time >= self.records[index].min_active_time {
                let phase = self.records[index].phase;
                changes.push(self.advance(phase, clock.now(), AdvanceReason::OpposingLanesClear));
            }
        }
    }

    /// Hands over from `from` to the next phase in the cycle.
    pub fn advance(&mut self, from: Phase, now: Time, reason: AdvanceReason) -> PhaseChange {
        let to = from.next();
        let active_for = self.records[from.index()].active_time;

        self.disable(from);
        self.enable(to, now);

        PhaseChange {
            at: now,
            from,
            to,
            active_for,
            reason,
        }
    }

    fn enable(&mut self, phase: Phase, now: Time) {
        let record = &mut self.records[phase.index()];
        record.is_on = true;
        record.start_time = now;
        record.active_time = 0;

        for lane in phase_lanes(phase) {
            self.signals[lane.index()] = SignalState::Green;
        }
        self.active = phase;

        info!("{} Enabled.", phase);
    }

    fn disable(&mut self, phase: Phase) {
        let record = &mut self.records[phase.index()];
        record.is_on = false;
        record.start_time = 0;
        record.active_time = 0;

        for lane in phase_lanes(phase) {
            self.signals[lane.index()] = SignalState::Red;
        }

        info!("{} Disabled.", phase);
    }

    /// Records the clearance result for `lane` on every phase that turns it
    /// green.
    pub fn set_opposing_lanes_clear(&mut self, lane: Lane, is_clear: bool) {
        if is_clear {
            debug!("Opposing lanes are clear for lane ({}).", lane);
        }

        for record in self.records.iter_mut() {
            if phase_contains(record.phase, lane) {
                record.opposing_lanes_clear = is_clear;
            }
        }
    }

    pub fn active_phase(&self) -> Phase {
        self.active
    }

    pub fn record(&self, phase: Phase) -> &PhaseRecord {
        &self.records[phase.index()]
    }

    pub fn records(&self) -> &[PhaseRecord; PHASE_COUNT] {
        &self.records
    }

    pub fn signals(&self) -> &TrafficSignals {
        &self.signals
    }
}
