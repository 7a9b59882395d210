//! Work-log aggregation and its ports

pub mod aggregator;
pub mod ports;
