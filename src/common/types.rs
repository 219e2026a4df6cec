// src/common/types.rs

use core::fmt;

// --- Temperature ---

/// Ambient temperature with 1/16 °C resolution.
///
/// Stored as a signed count of sixteenths of a degree, which is exactly
/// what the sensor register encodes, so no precision is lost before
/// formatting.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Temperature(i16);

impl Temperature {
    /// Creates a temperature from a count of 1/16 °C steps.
    pub const fn from_sixteenths(sixteenths: i16) -> Self {
        Temperature(sixteenths)
    }

    /// Creates a temperature from whole degrees Celsius.
    pub const fn from_degrees(degrees: i16) -> Self {
        Temperature(degrees * 16)
    }

    #[inline]
    pub const fn as_sixteenths(&self) -> i16 {
        self.0
    }

    pub fn as_celsius(&self) -> f32 {
        self.0 as f32 / 16.0
    }
}

/// Renders with two decimals, e.g. `21.56` or `-0.06`.
impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.as_celsius())
    }
}

// --- Heater State ---

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum HeaterState {
    On,
    #[default]
    Off,
}

impl HeaterState {
    pub const fn is_on(&self) -> bool {
        matches!(self, HeaterState::On)
    }

    /// The state a toggle action would switch to.
    pub const fn toggled(&self) -> Self {
        match self {
            HeaterState::On => HeaterState::Off,
            HeaterState::Off => HeaterState::On,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            HeaterState::On => "on",
            HeaterState::Off => "off",
        }
    }
}

impl From<bool> for HeaterState {
    fn from(on: bool) -> Self {
        if on {
            HeaterState::On
        } else {
            HeaterState::Off
        }
    }
}

impl fmt::Display for HeaterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
