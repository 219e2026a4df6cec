// src/heater/mod.rs

use crate::common::{error::ActuationError, types::HeaterState};
use embedded_hal::digital::{Error as _, OutputPin, PinState};
use log::{info, warn};

/// Heater relay plus its status indicator.
///
/// Both outputs always show the state held here: they are written
/// indicator first, relay second, and the state only changes once both
/// writes succeeded.
#[derive(Debug)]
pub struct HeaterActuator<L, R> {
    indicator: L,
    relay: R,
    state: HeaterState,
}

impl<L, R> HeaterActuator<L, R>
where
    L: OutputPin,
    R: OutputPin,
{
    /// Takes ownership of both outputs and drives them low (heater off).
    pub fn new(indicator: L, relay: R) -> Result<Self, ActuationError> {
        let mut heater = HeaterActuator {
            indicator,
            relay,
            state: HeaterState::Off,
        };
        heater.drive(HeaterState::Off)?;
        Ok(heater)
    }

    pub fn state(&self) -> HeaterState {
        self.state
    }

    pub fn is_on(&self) -> bool {
        self.state.is_on()
    }

    /// Switches the heater. Repeating the current state rewrites both
    /// outputs and logs again.
    pub fn set_heater(&mut self, on: bool) -> Result<(), ActuationError> {
        let target = HeaterState::from(on);
        self.drive(target)?;
        self.state = target;
        info!("Heater {}", target);
        Ok(())
    }

    /// Gives both outputs back.
    pub fn release(self) -> (L, R) {
        (self.indicator, self.relay)
    }

    fn drive(&mut self, target: HeaterState) -> Result<(), ActuationError> {
        let level = PinState::from(target.is_on());

        self.indicator
            .set_state(level)
            .map_err(|e| ActuationError::Indicator(e.kind()))?;

        if let Err(e) = self.relay.set_state(level) {
            // Put the indicator back so it keeps matching the relay.
            let previous = PinState::from(self.state.is_on());
            if self.indicator.set_state(previous).is_err() {
                warn!("Indicator rollback failed, outputs disagree");
            }
            return Err(ActuationError::Relay(e.kind()));
        }

        Ok(())
    }
}
