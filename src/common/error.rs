// src/common/error.rs

use embedded_hal::digital::ErrorKind;

/// The sensor did not acknowledge its address.
///
/// This is the only way a temperature read can fail; the variant records
/// which half of the register-read transaction was refused.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum SensorError {
    /// NAK on the write-mode START that selects the register.
    #[error("sensor did not acknowledge write address")]
    AddressWrite,

    /// NAK on the repeated START in read mode.
    #[error("sensor did not acknowledge read address")]
    AddressRead,
}

/// A heater output could not be driven to the requested level.
///
/// The heater state is left as it was when this is returned.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ActuationError {
    #[error("indicator output write failed: {0:?}")]
    Indicator(ErrorKind),

    #[error("relay output write failed: {0:?}")]
    Relay(ErrorKind),
}

/// Why a scheduler tick did not result in a new outbound report.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ReportSkipped {
    /// Reporting interval is zero or no collector URL is configured.
    #[error("reporting is disabled")]
    Disabled,

    /// A previous report is still in flight.
    #[error("previous report still in flight")]
    InFlight,

    #[error("sensor read failed: {0}")]
    Sensor(#[from] SensorError),

    /// Payload did not fit the report buffer.
    #[error("report payload could not be serialized")]
    Serialize,

    /// The HTTP client refused to start the connection.
    #[error("could not open report connection")]
    Connect,

    /// The in-flight report exceeded the configured timeout and was dropped.
    #[error("in-flight report timed out")]
    TimedOut,
}

/// Device configuration blob could not be loaded.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed config JSON")]
    Json,

    /// A string field is longer than its fixed capacity.
    #[error("config field `{0}` is too long")]
    FieldTooLong(&'static str),
}

impl From<serde_json_core::de::Error> for ConfigError {
    fn from(_: serde_json_core::de::Error) -> Self {
        ConfigError::Json
    }
}
