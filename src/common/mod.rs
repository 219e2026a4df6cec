// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod config;
pub mod error;
pub mod hal_traits;
pub mod types;

// --- Re-export key types/traits for easier access ---

// From config.rs (constants stay under common::config::*)
pub use config::{BusPins, FirmwareInfo, ReportConfig};

// From error.rs
pub use error::{ActuationError, ConfigError, ReportSkipped, SensorError};

// From hal_traits.rs
pub use hal_traits::{
    Ack, ConnectionEvent, Direction, HttpClient, OutboundReport, SystemStatus, TwoWireBus,
};

// From types.rs
pub use types::{HeaterState, Temperature};
