// control_system/mod.rs
pub mod config;
pub mod phase_machine;
pub mod topology;
pub mod traffic_light_controller;
pub mod wait_tracker;

pub use config::{ControllerConfig, PhaseTiming, PhaseTimings};
pub use phase_machine::{AdvanceReason, PhaseChange, PhaseRecord};
pub use traffic_light_controller::{ControllerBuilder, TickReport, TrafficLightController};
pub use wait_tracker::VehicleRecord;
