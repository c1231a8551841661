// simulation_engine/mod.rs
pub mod scenario;
pub mod simulator;
