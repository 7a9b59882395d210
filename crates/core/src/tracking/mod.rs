//! Tracker facade and its ports

pub mod ports;
pub mod service;
