//! Domain types and models

pub mod stats;
pub mod timer;
pub mod worklog;

pub use stats::{HistoryStats, RecentTask, TicketTotal};
pub use timer::{TicketSnapshot, TimerPersistenceState, TimerState};
pub use worklog::{ManifestStatus, RepoEntry, TaskManifest, WorkLog};
