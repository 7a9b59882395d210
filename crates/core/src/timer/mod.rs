//! Timer state machine and its ports

pub mod engine;
pub mod ports;
