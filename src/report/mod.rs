// src/report/mod.rs

//! Periodic single-flight push of temperature readings to a collector.

use crate::common::{
    config::ReportConfig,
    error::ReportSkipped,
    hal_traits::{ConnectionEvent, HttpClient, OutboundReport, TwoWireBus},
    types::Temperature,
};
use crate::sensor::Mcp9808;
use core::fmt::{self, Write};
use core::time::Duration;
use heapless::String;
use log::{debug, warn};

const PAYLOAD_CAPACITY: usize = 64;

/// JSON body of one report. The reading goes out with two decimals, the
/// same digits the status page shows.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct ReportPayload {
    office_temperature: Temperature,
}

impl fmt::Display for ReportPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"office_temperature\":{}}}", self.office_temperature)
    }
}

/// Serializes `temperature` as `{"office_temperature":<celsius>}`.
pub fn encode_payload(temperature: Temperature, buf: &mut [u8]) -> Result<usize, ReportSkipped> {
    let payload = ReportPayload {
        office_temperature: temperature,
    };
    let mut json: String<PAYLOAD_CAPACITY> = String::new();
    write!(json, "{}", payload).map_err(|_| ReportSkipped::Serialize)?;

    let out = buf
        .get_mut(..json.len())
        .ok_or(ReportSkipped::Serialize)?;
    out.copy_from_slice(json.as_bytes());
    Ok(json.len())
}

/// The report currently on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Outstanding<C> {
    connection: C,
    started_at: Duration,
}

/// Observable scheduler state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Sending,
}

/// Sends at most one report at a time.
///
/// A tick that finds a report still in flight does nothing at all, so a
/// slow collector can never cause connections to pile up. The slot is freed
/// by the `Close` event of that connection, or by the optional timeout.
#[derive(Debug)]
pub struct ReportScheduler<C> {
    config: ReportConfig,
    outstanding: Option<Outstanding<C>>,
}

impl<C> ReportScheduler<C>
where
    C: Copy + Eq + core::fmt::Debug,
{
    pub fn new(config: ReportConfig) -> Self {
        ReportScheduler {
            config,
            outstanding: None,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn state(&self) -> SchedulerState {
        match self.outstanding {
            Some(_) => SchedulerState::Sending,
            None => SchedulerState::Idle,
        }
    }

    /// Handle of the in-flight report, if any.
    pub fn outstanding(&self) -> Option<C> {
        self.outstanding.map(|o| o.connection)
    }

    /// Timer callback. `now` is monotonic time since boot.
    ///
    /// Returns the connection that was started, or why none was.
    pub fn on_tick<B, H>(
        &mut self,
        now: Duration,
        sensor: &mut Mcp9808<B>,
        client: &mut H,
    ) -> Result<C, ReportSkipped>
    where
        B: TwoWireBus,
        H: HttpClient<Connection = C>,
    {
        let url = match self.config.url() {
            Some(url) if self.config.sensor_report_interval_ms > 0 => url,
            _ => return Err(ReportSkipped::Disabled),
        };

        if let Some(outstanding) = self.outstanding {
            let expired = self
                .config
                .report_timeout()
                .is_some_and(|timeout| now.saturating_sub(outstanding.started_at) >= timeout);
            if !expired {
                return Err(ReportSkipped::InFlight);
            }
            warn!("Report {:?} timed out, dropping it", outstanding.connection);
            self.outstanding = None;
            client.close_immediately(outstanding.connection);
            return Err(ReportSkipped::TimedOut);
        }

        let temperature = sensor.read_temperature()?;

        let mut body = [0u8; PAYLOAD_CAPACITY];
        let len = encode_payload(temperature, &mut body)?;

        let report = OutboundReport {
            url,
            authorization: self.config.auth(),
            body: &body[..len],
        };
        let connection = client.post(&report).map_err(|e| {
            warn!("Could not start report to {}: {:?}", url, e);
            ReportSkipped::Connect
        })?;

        debug!("Reporting {} C on {:?}", temperature, connection);
        self.outstanding = Some(Outstanding {
            connection,
            started_at: now,
        });
        Ok(connection)
    }

    /// Lifecycle callback for report connections.
    ///
    /// A reply is not read; the connection is simply closed. `Close` frees
    /// the slot, but only for the connection that holds it.
    pub fn on_connection_event<H>(&mut self, connection: C, event: ConnectionEvent, client: &mut H)
    where
        H: HttpClient<Connection = C>,
    {
        match event {
            ConnectionEvent::Reply => client.close_immediately(connection),
            ConnectionEvent::Close => {
                if self.outstanding() == Some(connection) {
                    self.outstanding = None;
                } else {
                    debug!("Ignoring close of stale connection {:?}", connection);
                }
            }
        }
    }
}
