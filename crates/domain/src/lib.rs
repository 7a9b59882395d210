//! # TimeLoom Domain
//!
//! Business domain types and models for TimeLoom.
//!
//! This crate contains:
//! - Timer and work-log data types (TimerState, WorkLog, TaskManifest, etc.)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other TimeLoom crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::{Config, StorageConfig, TrackingConfig};
pub use errors::{Result, TimeLoomError};
pub use types::{
    HistoryStats, ManifestStatus, RecentTask, RepoEntry, TaskManifest, TicketSnapshot,
    TicketTotal, TimerPersistenceState, TimerState, WorkLog,
};
