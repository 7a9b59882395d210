//! # TimeLoom Infra
//!
//! Infrastructure adapters implementing the `timeloom-core` ports:
//! - JSON file stores for manifests and the crash-recovery timer snapshot
//! - The system clock
//! - The configuration loader
//! - A null ticket metadata source for hosts without a ticket backend

pub mod clock;
pub mod config;
pub mod errors;
pub mod storage;
pub mod tickets;

pub use clock::SystemClock;
pub use errors::StorageError;
pub use storage::manifest_store::JsonManifestStore;
pub use storage::timer_state_store::JsonTimerStateStore;
pub use tickets::NullTicketMetadataSource;
