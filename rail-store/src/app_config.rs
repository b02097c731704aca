use rail_core::{LedgerPolicy, ReservationResult, SectionLayout, DEFAULT_TICKET_PRICE};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub train: TrainConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TrainConfig {
    #[serde(default = "default_sections")]
    pub sections: Vec<String>,
    #[serde(default = "default_seats_per_section")]
    pub seats_per_section: u32,
    #[serde(default = "default_price")]
    pub price: f64,
    /// Bound for the fallback scan of ModifySeat; defaults to the section count.
    #[serde(default)]
    pub reassign_scan_limit: Option<u32>,
}

fn default_sections() -> Vec<String> { vec!["A".to_string(), "B".to_string()] }
fn default_seats_per_section() -> u32 { 10 }
fn default_price() -> f64 { DEFAULT_TICKET_PRICE }

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            sections: default_sections(),
            seats_per_section: default_seats_per_section(),
            price: default_price(),
            reassign_scan_limit: None,
        }
    }
}

impl TrainConfig {
    pub fn layout(&self) -> ReservationResult<SectionLayout> {
        SectionLayout::new(self.sections.clone(), self.seats_per_section)
    }

    pub fn policy(&self) -> LedgerPolicy {
        LedgerPolicy {
            price: self.price,
            reassign_scan_limit: self.reassign_scan_limit,
        }
    }
}

/// Optional call-rate shaping. Applied before a request reaches the store.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PacingConfig {
    #[serde(default)]
    pub delay_ms: u64,
}

impl PacingConfig {
    pub fn delay(&self) -> Option<Duration> {
        (self.delay_ms > 0).then(|| Duration::from_millis(self.delay_ms))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventsConfig {
    #[serde(default = "default_event_capacity")]
    pub capacity: usize,
}

fn default_event_capacity() -> usize { 100 }

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: default_event_capacity() }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Untracked local overrides
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `RAILSEAT__SERVER__PORT=9000` or `RAILSEAT__TRAIN__SECTIONS=A,B,C`
            .add_source(
                config::Environment::with_prefix("RAILSEAT")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("train.sections"),
            )
            .build()?;

        s.try_deserialize()
    }

    pub fn from_toml(contents: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
