pub mod signal_trace;
