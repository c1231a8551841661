use crate::clock::Clock;
use crate::control_system::topology::opposing_lanes_clear;
use crate::shared_data::{Lane, SensorState, SignalState, Time, TrafficSignals, VehicleSensors, LANE_COUNT};
use log::{debug, trace};

/// Vehicle arrival and waiting time for one lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleRecord {
    pub lane: Lane,
    pub is_waiting: bool,
    pub arrival_time: Time,
    pub wait_time: Time,
}

impl VehicleRecord {
    fn new(lane: Lane) -> Self {
        Self {
            lane,
            is_waiting: false,
            arrival_time: 0,
            wait_time: 0,
        }
    }

    fn reset(&mut self) {
        self.is_waiting = false;
        self.arrival_time = 0;
        self.wait_time = 0;
    }
}

/// Result of one pass over the sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorPass {
    /// Clearance result per lane, `None` for lanes with no vehicle present.
    pub clearances: [Option<bool>; LANE_COUNT],
    /// At least one lane has a vehicle queued at a red light.
    pub cars_waiting: bool,
}

impl SensorPass {
    /// Clearance results in lane order.
    pub fn clearances(&self) -> impl Iterator<Item = (Lane, bool)> + '_ {
        Lane::ALL
            .into_iter()
            .zip(self.clearances.iter())
            .filter_map(|(lane, clear)| clear.map(|clear| (lane, clear)))
    }
}

/// Per-lane queue state at red lights.
#[derive(Debug, Clone)]
pub struct VehicleWaitTracker {
    records: [VehicleRecord; LANE_COUNT],
    cars_waiting: bool,
}

impl Default for VehicleWaitTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl VehicleWaitTracker {
    pub fn new() -> Self {
        Self {
            records: Lane::ALL.map(VehicleRecord::new),
            cars_waiting: false,
        }
    }

    /// Classifies every lane by its sensor and current signal, updates the
    /// queue records, and reports which lanes had clearance checked.
    pub fn process<C: Clock>(
        &mut self,
        clock: &C,
        sensors: &VehicleSensors,
        signals: &TrafficSignals,
    ) -> SensorPass {
        let mut clearances = [None; LANE_COUNT];

        for lane in Lane::ALL {
            let record = &mut self.records[lane.index()];

            match (sensors[lane.index()], signals[lane.index()]) {
                (SensorState::Set, SignalState::Red) => {
                    debug!("Car in lane ({}) waiting at RED light.", lane);
                    clearances[lane.index()] = Some(opposing_lanes_clear(lane, sensors));

                    if record.is_waiting {
                        record.wait_time = clock.elapsed(record.arrival_time);
                    } else {
                        record.is_waiting = true;
                        record.arrival_time = clock.now();
                    }
                }
                (SensorState::Set, SignalState::Green) => {
                    debug!(
                        "Car in lane ({}) proceeding with GRN light after waiting ({}s).",
                        lane, record.wait_time
                    );
                    clearances[lane.index()] = Some(opposing_lanes_clear(lane, sensors));
                    record.reset();
                }
                _ => record.reset(),
            }
        }

        self.cars_waiting = self.records.iter().any(|record| record.is_waiting);
        trace!("cars waiting: {}", self.cars_waiting);

        SensorPass {
            clearances,
            cars_waiting: self.cars_waiting,
        }
    }

    pub fn cars_waiting(&self) -> bool {
        self.cars_waiting
    }

    pub fn record(&self, lane: Lane) -> &VehicleRecord {
        &self.records[lane.index()]
    }

    /// Longest current wait across all lanes.
    pub fn longest_wait(&self) -> Option<(Lane, Time)> {
        self.records
            .iter()
            .filter(|record| record.is_waiting)
            .max_by_key(|record| record.wait_time)
            .map(|record| (record.lane, record.wait_time))
    }
}
