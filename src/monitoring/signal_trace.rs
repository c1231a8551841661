use crate::error::TraceError;
use crate::shared_data::{Lane, Phase, SignalState, Time, TrafficSignals};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::Path;

/// One row of the signal trace: the signals shown after a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalTraceRecord {
    pub scenario: String,
    pub time: Time,
    pub active_phase: Phase,
    pub cars_waiting: bool,
    pub n_n: SignalState,
    pub n_w: SignalState,
    pub s_s: SignalState,
    pub s_e: SignalState,
    pub e_e: SignalState,
    pub e_n: SignalState,
    pub w_w: SignalState,
    pub w_s: SignalState,
}

impl SignalTraceRecord {
    pub fn new(
        scenario: &str,
        time: Time,
        active_phase: Phase,
        cars_waiting: bool,
        signals: &TrafficSignals,
    ) -> Self {
        let at = |lane: Lane| signals[lane.index()];
        Self {
            scenario: scenario.to_string(),
            time,
            active_phase,
            cars_waiting,
            n_n: at(Lane::N_N),
            n_w: at(Lane::N_W),
            s_s: at(Lane::S_S),
            s_e: at(Lane::S_E),
            e_e: at(Lane::E_E),
            e_n: at(Lane::E_N),
            w_w: at(Lane::W_W),
            w_s: at(Lane::W_S),
        }
    }

    pub fn signals(&self) -> TrafficSignals {
        [
            self.n_n, self.n_w, self.s_s, self.s_e, self.e_e, self.e_n, self.w_w, self.w_s,
        ]
    }
}

/// Appends trace records to a CSV file. The header row is only written when
/// the file is new or empty.
pub struct SignalTrace {
    writer: csv::Writer<File>,
}

impl SignalTrace {
    pub fn append<P: AsRef<Path>>(path: P) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let has_rows = path.metadata().map(|meta| meta.len() > 0).unwrap_or(false);
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        let writer = csv::WriterBuilder::new()
            .has_headers(!has_rows)
            .from_writer(file);
        Ok(Self { writer })
    }

    pub fn record(&mut self, record: &SignalTraceRecord) -> Result<(), TraceError> {
        self.writer.serialize(record)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), TraceError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Reads every record back from a trace file.
pub fn read_trace<P: AsRef<Path>>(path: P) -> Result<Vec<SignalTraceRecord>, TraceError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_data::LANE_COUNT;

    fn signals() -> TrafficSignals {
        let mut signals = [SignalState::Red; LANE_COUNT];
        signals[Lane::N_W.index()] = SignalState::Green;
        signals[Lane::S_E.index()] = SignalState::Green;
        signals
    }

    #[test]
    fn append_writes_header_once_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.csv");

        let first = SignalTraceRecord::new("scenario_2", 0, Phase::NorthSouthTurning, false, &signals());
        let second = SignalTraceRecord::new("scenario_2", 10, Phase::NorthSouthTurning, true, &signals());

        {
            let mut trace = SignalTrace::append(&path).unwrap();
            trace.record(&first).unwrap();
            trace.flush().unwrap();
        }
        {
            let mut trace = SignalTrace::append(&path).unwrap();
            trace.record(&second).unwrap();
            trace.flush().unwrap();
        }

        let records = read_trace(&path).unwrap();
        assert_eq!(records, vec![first, second]);
        assert_eq!(records[1].signals(), signals());

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.matches("active_phase").count(), 1);
    }
}
