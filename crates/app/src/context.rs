//! Application context - dependency injection container

use std::sync::Arc;

use timeloom_core::{
    Clock, EngineConfig, ManifestStore, RecoveryService, TicketMetadataSource, TimerEngine,
    TimerStateStore, TrackerService, WorkLogAggregator,
};
use timeloom_domain::Config;
use timeloom_infra::{JsonManifestStore, JsonTimerStateStore, NullTicketMetadataSource, SystemClock};

/// Holds every service the command loop needs, wired once at startup.
pub struct AppContext {
    pub config: Config,
    pub engine: Arc<TimerEngine>,
    pub aggregator: Arc<WorkLogAggregator>,
    pub tracker: Arc<TrackerService>,
    pub recovery: RecoveryService,
}

impl AppContext {
    /// Build the dependency graph from configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let manifests: Arc<dyn ManifestStore> =
            Arc::new(JsonManifestStore::new(&config.storage.data_dir));
        let state_store: Arc<dyn TimerStateStore> =
            Arc::new(JsonTimerStateStore::new(&config.storage.data_dir));

        let engine = Arc::new(TimerEngine::new(
            Arc::clone(&clock),
            Arc::clone(&state_store),
            EngineConfig::from(&config.tracking),
        ));
        let aggregator = Arc::new(WorkLogAggregator::new(manifests, Arc::clone(&clock)));
        let tickets: Arc<dyn TicketMetadataSource> = Arc::new(NullTicketMetadataSource);
        let tracker = Arc::new(TrackerService::new(
            Arc::clone(&engine),
            Arc::clone(&aggregator),
            tickets,
            Arc::clone(&clock),
        ));
        let recovery = RecoveryService::new(state_store, clock);

        Self { config, engine, aggregator, tracker, recovery }
    }
}
