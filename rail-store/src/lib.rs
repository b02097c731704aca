pub mod app_config;
pub mod events;
pub mod reservation_store;

pub use app_config::Config;
pub use events::EventProducer;
pub use reservation_store::ReservationStore;
