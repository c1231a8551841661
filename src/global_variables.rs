use crate::shared_data::Time;

// Simulation stepping
pub const TIME_STEP: Time = 10;
pub const DEFAULT_MAX_WAIT_TIME: Time = 40;

// Environment
pub const ENV_CONFIG_PATH: &str = "TLC_CONFIG";

// Output
pub const SIGNAL_TRACE_CSV: &str = "signal_trace.csv";
