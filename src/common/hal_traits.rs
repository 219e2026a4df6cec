// src/common/hal_traits.rs

use core::fmt::Debug;
use core::time::Duration;

/// Direction bit sent with the address byte of a START condition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Direction {
    Write,
    Read,
}

/// Acknowledge signal on the two-wire bus.
///
/// Returned by the target after an address byte, and chosen by the
/// controller after each byte it reads (`Nak` marks the last byte).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Ack {
    Ack,
    Nak,
}

/// Byte-level primitives of a two-wire (I2C-style) bus controller.
///
/// Implementations are usually bit-banged over two GPIOs. Every call blocks
/// until the bus operation has completed; there is no timeout at this level.
pub trait TwoWireBus {
    /// Issues a START (or repeated START) and clocks out the 7-bit address
    /// with the direction bit. Returns the target's acknowledge.
    fn start(&mut self, address: u8, direction: Direction) -> Ack;

    /// Clocks out one data byte.
    fn send_byte(&mut self, byte: u8);

    /// Clocks in one data byte and answers with `ack`.
    fn read_byte(&mut self, ack: Ack) -> u8;

    /// Issues a STOP, releasing the bus.
    fn stop(&mut self);
}

/// Lifecycle events the event loop reports for an outbound connection.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ConnectionEvent {
    /// A complete HTTP reply has arrived.
    Reply,
    /// The connection is gone, for whatever reason (reply, error, timeout).
    Close,
}

/// One report POST as handed to the HTTP client.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct OutboundReport<'a> {
    pub url: &'a str,
    /// Value of the `Authorization` header, sent only when present.
    pub authorization: Option<&'a str>,
    /// JSON body.
    pub body: &'a [u8],
}

/// Non-blocking outbound HTTP client driven by the event loop.
///
/// `post` only initiates the request. Progress is reported later through
/// [`ConnectionEvent`]s tagged with the returned connection handle.
pub trait HttpClient {
    /// Handle identifying one in-flight connection.
    type Connection: Copy + Eq + Debug;

    /// Error returned when a connection cannot be initiated.
    type Error: Debug;

    /// Starts a POST of `report`. On success the client guarantees a
    /// `ConnectionEvent::Close` for the returned handle at some later point.
    fn post(&mut self, report: &OutboundReport<'_>) -> Result<Self::Connection, Self::Error>;

    /// Asks the client to drop `connection` without waiting for more data.
    fn close_immediately(&mut self, connection: Self::Connection);
}

/// Read-only platform diagnostics.
pub trait SystemStatus {
    /// Monotonic time since boot.
    fn uptime(&self) -> Duration;

    /// Free heap memory in bytes.
    fn free_memory(&self) -> u32;
}
