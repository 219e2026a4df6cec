// src/sensor/mod.rs

//! MCP9808 ambient temperature reads over the two-wire bus.

use crate::common::{
    config::{AMBIENT_TEMPERATURE_REGISTER, SENSOR_ADDRESS},
    error::SensorError,
    hal_traits::{Ack, Direction, TwoWireBus},
    types::Temperature,
};

/// Sign flag of the upper register byte, after masking.
const SIGN_BIT: u8 = 0x10;
/// Upper byte bits that carry the reading; the top three are alarm flags.
const VALUE_MASK: u8 = 0x1F;

/// Decodes the two bytes of the ambient temperature register.
///
/// The register is 13-bit sign-magnitude style fixed point with 1/16 °C
/// resolution: `upper[3:0]` holds 16 °C steps and `lower` holds 1/16 °C
/// steps. With the sign bit set the reading is `value - 256 °C`.
pub fn decode_ambient(upper: u8, lower: u8) -> Temperature {
    let upper = upper & VALUE_MASK;
    let magnitude = (((upper & !SIGN_BIT) as i16) << 8) | lower as i16;
    if upper & SIGN_BIT != 0 {
        Temperature::from_sixteenths(magnitude - 256 * 16)
    } else {
        Temperature::from_sixteenths(magnitude)
    }
}

/// Temperature sensor on a dedicated two-wire bus.
#[derive(Debug)]
pub struct Mcp9808<B> {
    bus: B,
    address: u8,
    in_transaction: bool,
}

impl<B: TwoWireBus> Mcp9808<B> {
    pub fn new(bus: B) -> Self {
        Self::with_address(bus, SENSOR_ADDRESS)
    }

    pub fn with_address(bus: B, address: u8) -> Self {
        Mcp9808 {
            bus,
            address,
            in_transaction: false,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// True only while a register read is on the bus.
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Performs one register read transaction and decodes the result.
    ///
    /// A refused address at either stage ends the transaction with STOP and
    /// returns immediately; there is no retry.
    pub fn read_temperature(&mut self) -> Result<Temperature, SensorError> {
        self.begin(Direction::Write, SensorError::AddressWrite)?;
        self.bus.send_byte(AMBIENT_TEMPERATURE_REGISTER);

        self.begin(Direction::Read, SensorError::AddressRead)?;
        let upper = self.bus.read_byte(Ack::Ack);
        let lower = self.bus.read_byte(Ack::Nak);
        self.end();

        Ok(decode_ambient(upper, lower))
    }

    /// Gives the bus back, e.g. to share it with another driver.
    pub fn release(self) -> B {
        self.bus
    }

    #[cfg(test)]
    pub(crate) fn bus(&self) -> &B {
        &self.bus
    }

    /// Addresses the sensor; a NAK ends the transaction and yields `refused`.
    fn begin(&mut self, direction: Direction, refused: SensorError) -> Result<(), SensorError> {
        self.in_transaction = true;
        match self.bus.start(self.address, direction) {
            Ack::Ack => Ok(()),
            Ack::Nak => {
                self.end();
                Err(refused)
            }
        }
    }

    fn end(&mut self) {
        self.bus.stop();
        self.in_transaction = false;
    }
}

// --- Unit Tests ---
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use heapless::Vec;

    /// One observable bus operation.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub(crate) enum BusOp {
        Start(u8, Direction),
        Send(u8),
        Read(Ack),
        Stop,
    }

    /// Scripted sensor: answers address bytes with staged acks and returns
    /// staged register bytes.
    #[derive(Debug, Clone)]
    pub(crate) struct MockBus {
        pub write_ack: Ack,
        pub read_ack: Ack,
        pub register: [u8; 2],
        pub read_pos: usize,
        pub log: Vec<BusOp, 64>,
    }

    impl MockBus {
        pub(crate) fn with_register(upper: u8, lower: u8) -> Self {
            MockBus {
                write_ack: Ack::Ack,
                read_ack: Ack::Ack,
                register: [upper, lower],
                read_pos: 0,
                log: Vec::new(),
            }
        }

        pub(crate) fn nak_on_write() -> Self {
            MockBus {
                write_ack: Ack::Nak,
                ..Self::with_register(0, 0)
            }
        }

        pub(crate) fn nak_on_read() -> Self {
            MockBus {
                read_ack: Ack::Nak,
                ..Self::with_register(0, 0)
            }
        }

        pub(crate) fn transactions(&self) -> usize {
            self.log
                .iter()
                .filter(|op| matches!(op, BusOp::Start(_, Direction::Write)))
                .count()
        }

        fn record(&mut self, op: BusOp) {
            let _ = self.log.push(op);
        }
    }

    impl TwoWireBus for MockBus {
        fn start(&mut self, address: u8, direction: Direction) -> Ack {
            self.record(BusOp::Start(address, direction));
            match direction {
                Direction::Write => self.write_ack,
                Direction::Read => {
                    self.read_pos = 0;
                    self.read_ack
                }
            }
        }

        fn send_byte(&mut self, byte: u8) {
            self.record(BusOp::Send(byte));
        }

        fn read_byte(&mut self, ack: Ack) -> u8 {
            self.record(BusOp::Read(ack));
            let byte = self.register.get(self.read_pos).copied().unwrap_or(0xFF);
            self.read_pos += 1;
            byte
        }

        fn stop(&mut self) {
            self.record(BusOp::Stop);
        }
    }

    #[test]
    fn test_decode_positive() {
        assert_eq!(decode_ambient(0x01, 0x00).as_celsius(), 16.0);
        assert_eq!(decode_ambient(0x01, 0x94).as_celsius(), 25.25);
        assert_eq!(decode_ambient(0x00, 0x01).as_celsius(), 0.0625);
        assert_eq!(decode_ambient(0x0F, 0xFF).as_celsius(), 255.9375);
    }

    #[test]
    fn test_decode_negative() {
        // -(256 - (3 * 16 + 0))
        assert_eq!(decode_ambient(0x13, 0x00).as_celsius(), -208.0);
        // -(256 - (15 * 16 + 15))
        assert_eq!(decode_ambient(0x1F, 0xF0).as_celsius(), -1.0);
        assert_eq!(decode_ambient(0x1F, 0xFF).as_celsius(), -0.0625);
        assert_eq!(decode_ambient(0x10, 0x00).as_celsius(), -256.0);
    }

    #[test]
    fn test_decode_ignores_alarm_flags() {
        assert_eq!(decode_ambient(0xE1, 0x94), decode_ambient(0x01, 0x94));
        assert_eq!(decode_ambient(0xF3, 0x00), decode_ambient(0x13, 0x00));
    }

    #[test]
    fn test_read_temperature_transaction_sequence() {
        let mut sensor = Mcp9808::new(MockBus::with_register(0x01, 0x94));
        let temp = sensor.read_temperature().unwrap();
        assert_eq!(temp.as_celsius(), 25.25);
        assert!(!sensor.in_transaction());

        let bus = sensor.release();
        assert_eq!(
            bus.log.as_slice(),
            &[
                BusOp::Start(0x1F, Direction::Write),
                BusOp::Send(0x05),
                BusOp::Start(0x1F, Direction::Read),
                BusOp::Read(Ack::Ack),
                BusOp::Read(Ack::Nak),
                BusOp::Stop,
            ]
        );
    }

    #[test]
    fn test_read_temperature_nak_on_write_address() {
        let mut sensor = Mcp9808::new(MockBus::nak_on_write());
        assert_eq!(sensor.read_temperature(), Err(SensorError::AddressWrite));
        assert!(!sensor.in_transaction());

        let bus = sensor.release();
        assert_eq!(bus.log.as_slice(), &[BusOp::Start(0x1F, Direction::Write), BusOp::Stop]);
    }

    #[test]
    fn test_read_temperature_nak_on_read_address() {
        let mut sensor = Mcp9808::new(MockBus::nak_on_read());
        assert_eq!(sensor.read_temperature(), Err(SensorError::AddressRead));
        assert!(!sensor.in_transaction());

        let bus = sensor.release();
        assert!(!bus.log.iter().any(|op| matches!(op, BusOp::Read(_))));
        assert_eq!(bus.log.last(), Some(&BusOp::Stop));
        assert_eq!(bus.transactions(), 1);
    }

    #[test]
    fn test_custom_address() {
        let mut sensor = Mcp9808::with_address(MockBus::with_register(0x01, 0x00), 0x18);
        assert_eq!(sensor.address(), 0x18);
        sensor.read_temperature().unwrap();
        assert_eq!(sensor.release().log[0], BusOp::Start(0x18, Direction::Write));
    }
}
