//! # TimeLoom Core
//!
//! Business logic for the TimeLoom time-tracking engine:
//! - The timer state machine (`timer`)
//! - Work-log aggregation into per-ticket manifests (`worklog`)
//! - Crash recovery of interrupted sessions (`recovery`)
//! - The tracker facade tying them together (`tracking`)
//!
//! ## Architecture
//! Core depends only on `timeloom-domain` and external crates. All I/O goes
//! through port traits (`Clock`, `TimerStateStore`, `ManifestStore`,
//! `TicketMetadataSource`, `TimerObserver`) implemented by the infra layer
//! and mocked in tests.

pub mod recovery;
pub mod timer;
pub mod tracking;
pub mod worklog;

pub use recovery::{RecoveryDecision, RecoveryPrompt, RecoveryService};
pub use timer::engine::{EngineConfig, TimerEngine};
pub use timer::ports::{Clock, TimerObserver, TimerStateStore};
pub use tracking::ports::{TicketMetadata, TicketMetadataSource};
pub use tracking::service::TrackerService;
pub use worklog::aggregator::WorkLogAggregator;
pub use worklog::ports::ManifestStore;
