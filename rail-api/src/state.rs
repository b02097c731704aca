use std::sync::Arc;
use rail_core::ReservationResult;
use rail_store::{app_config::PacingConfig, Config, EventProducer, ReservationStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ReservationStore>,
    pub events: Arc<EventProducer>,
    pub pacing: PacingConfig,
}

impl AppState {
    pub fn new(store: ReservationStore, events: EventProducer, pacing: PacingConfig) -> Self {
        Self {
            store: Arc::new(store),
            events: Arc::new(events),
            pacing,
        }
    }

    pub fn from_config(config: &Config) -> ReservationResult<Self> {
        Ok(Self::new(
            ReservationStore::from_config(&config.train)?,
            EventProducer::new(config.events.capacity),
            config.pacing.clone(),
        ))
    }
}
