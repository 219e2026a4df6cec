// src/common/config.rs

use super::error::ConfigError;
use core::time::Duration;
use heapless::String;
use serde::Deserialize;

// === Board Wiring ===

/// GPIO driving the status indicator LED.
pub const INDICATOR_PIN: u8 = 10;
/// GPIO driving the heater relay.
pub const RELAY_PIN: u8 = 13;
/// Two-wire bus data line.
pub const I2C_SDA_PIN: u8 = 12;
/// Two-wire bus clock line.
pub const I2C_SCL_PIN: u8 = 14;

// === Sensor (MCP9808) ===

/// Bus address of the temperature sensor (A0..A2 strapped high).
pub const SENSOR_ADDRESS: u8 = 0x1F;
/// Register pointer of the ambient temperature register.
pub const AMBIENT_TEMPERATURE_REGISTER: u8 = 0x05;

// === Capacities ===

pub const URL_CAPACITY: usize = 128;
pub const AUTH_CAPACITY: usize = 128;

/// Pin assignment of the two-wire bus, for the transport that bit-bangs it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BusPins {
    pub sda: u8,
    pub scl: u8,
}

impl Default for BusPins {
    fn default() -> Self {
        BusPins {
            sda: I2C_SDA_PIN,
            scl: I2C_SCL_PIN,
        }
    }
}

/// Periodic reporting settings, the `hsw` section of the device config.
///
/// ```json
/// {"sensor_report_interval_ms": 10000,
///  "sensor_data_url": "http://collector.local/api/temperature",
///  "auth": "Bearer 0123abcd"}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReportConfig {
    /// Zero disables reporting.
    #[serde(default)]
    pub sensor_report_interval_ms: u32,

    #[serde(default)]
    pub sensor_data_url: Option<String<URL_CAPACITY>>,

    /// Sent verbatim as the `Authorization` header value.
    #[serde(default)]
    pub auth: Option<String<AUTH_CAPACITY>>,

    /// Drop an in-flight report older than this. `None` or zero waits
    /// forever.
    #[serde(default)]
    pub report_timeout_ms: Option<u32>,
}

impl ReportConfig {
    pub fn new(sensor_report_interval_ms: u32) -> Self {
        ReportConfig {
            sensor_report_interval_ms,
            ..Default::default()
        }
    }

    /// Parses the reporting section of the device config.
    pub fn from_json(json: &[u8]) -> Result<Self, ConfigError> {
        let (config, _) = serde_json_core::from_slice::<ReportConfig>(json)?;
        Ok(config)
    }

    pub fn with_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.sensor_data_url = Some(bounded(url, "sensor_data_url")?);
        Ok(self)
    }

    pub fn with_auth(mut self, auth: &str) -> Result<Self, ConfigError> {
        self.auth = Some(bounded(auth, "auth")?);
        Ok(self)
    }

    /// Zero leaves the timeout off.
    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.report_timeout_ms = Some(timeout_ms);
        self
    }

    /// Collector URL, treating an empty string as unset.
    pub fn url(&self) -> Option<&str> {
        self.sensor_data_url
            .as_ref()
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn auth(&self) -> Option<&str> {
        self.auth.as_ref().map(|s| s.as_str()).filter(|s| !s.is_empty())
    }

    /// Reporting runs only with a non-zero interval and a collector URL.
    pub fn is_enabled(&self) -> bool {
        self.sensor_report_interval_ms > 0 && self.url().is_some()
    }

    /// Timer period to register, if reporting is enabled.
    pub fn interval(&self) -> Option<Duration> {
        if self.is_enabled() {
            Some(Duration::from_millis(self.sensor_report_interval_ms as u64))
        } else {
            None
        }
    }

    /// Age at which an in-flight report is dropped. Zero counts as unset,
    /// like a zero interval.
    pub fn report_timeout(&self) -> Option<Duration> {
        self.report_timeout_ms
            .filter(|ms| *ms > 0)
            .map(|ms| Duration::from_millis(ms as u64))
    }
}

fn bounded<const N: usize>(value: &str, field: &'static str) -> Result<String<N>, ConfigError> {
    let mut s = String::new();
    s.push_str(value)
        .map_err(|_| ConfigError::FieldTooLong(field))?;
    Ok(s)
}

/// Read-only firmware identifiers shown on the status page.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FirmwareInfo {
    pub version: &'static str,
    pub build_id: &'static str,
}

impl Default for FirmwareInfo {
    fn default() -> Self {
        FirmwareInfo {
            version: env!("CARGO_PKG_VERSION"),
            build_id: match option_env!("HEATER_BUILD_ID") {
                Some(id) => id,
                None => "dev",
            },
        }
    }
}
