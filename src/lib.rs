pub mod api;
pub mod auth;
pub mod client;
pub mod collector;
pub mod config;
pub mod error;
pub mod mapping;
pub mod metrics;
pub mod thermostat;

// Re-export commonly used items
pub use collector::Collector;
pub use config::Config;
pub use error::{AppError, Result};
pub use thermostat::{HvacStatus, ThermostatMode, ThermostatReading};
