// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)] // no_std except for host tests

pub mod common;
pub mod control;
pub mod device;
pub mod heater;
pub mod report;
pub mod sensor;

// Re-export key types for convenience
pub use common::{HeaterState, ReportConfig, SensorError, Temperature};
pub use device::Device;
pub use heater::HeaterActuator;
pub use report::ReportScheduler;
pub use sensor::Mcp9808;
