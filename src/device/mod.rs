// src/device/mod.rs

use crate::common::{
    config::{FirmwareInfo, ReportConfig},
    error::{ActuationError, ReportSkipped},
    hal_traits::{ConnectionEvent, HttpClient, SystemStatus, TwoWireBus},
    types::HeaterState,
};
use crate::control::{ControlSurface, Request, Response, Route};
use crate::heater::HeaterActuator;
use crate::report::{ReportScheduler, SchedulerState};
use crate::sensor::Mcp9808;
use core::time::Duration;
use embedded_hal::digital::OutputPin;
use log::{debug, info};

/// Everything the heater firmware owns at runtime.
///
/// The entry point builds one `Device` and hands `&mut` to each timer,
/// connection and request callback of its event loop. Nothing here is
/// shared across threads.
///
/// Board wiring comes from [`crate::common::config`], as below.
///
/// ```ignore
/// use office_heater::common::config::{BusPins, FirmwareInfo, INDICATOR_PIN, RELAY_PIN};
///
/// let pins = BusPins::default();
/// let bus = BitBangBus::new(gpio.open_drain(pins.sda), gpio.open_drain(pins.scl));
/// let led = gpio.output(INDICATOR_PIN);
/// let relay = gpio.output(RELAY_PIN);
/// let mut device = Device::new(bus, led, relay, http, sys, report_config, FirmwareInfo::default())?;
/// if let Some(period) = device.report_interval() {
///     timers.every(period, |dev: &mut Device<_, _, _, _, _>| { let _ = dev.on_tick(); });
/// }
/// ```
#[derive(Debug)]
pub struct Device<B, L, R, H, S>
where
    H: HttpClient,
{
    sensor: Mcp9808<B>,
    heater: HeaterActuator<L, R>,
    reporter: ReportScheduler<H::Connection>,
    control: ControlSurface,
    http: H,
    system: S,
}

impl<B, L, R, H, S> Device<B, L, R, H, S>
where
    B: TwoWireBus,
    L: OutputPin,
    R: OutputPin,
    H: HttpClient,
    S: SystemStatus,
{
    /// Takes ownership of all collaborators. `indicator` and `relay` are the
    /// outputs on `INDICATOR_PIN` and `RELAY_PIN`. Fails only if they
    /// cannot be driven to their initial off level.
    pub fn new(
        bus: B,
        indicator: L,
        relay: R,
        http: H,
        system: S,
        report: ReportConfig,
        firmware: FirmwareInfo,
    ) -> Result<Self, ActuationError> {
        let heater = HeaterActuator::new(indicator, relay)?;
        match report.interval() {
            Some(period) => info!("Reporting every {} ms", period.as_millis()),
            None => info!("Reporting disabled"),
        }
        Ok(Device {
            sensor: Mcp9808::new(bus),
            heater,
            reporter: ReportScheduler::new(report),
            control: ControlSurface::new(firmware),
            http,
            system,
        })
    }

    /// Period for the repeating report timer; `None` means do not register it.
    pub fn report_interval(&self) -> Option<Duration> {
        self.reporter.config().interval()
    }

    /// Report timer callback.
    pub fn on_tick(&mut self) -> Result<H::Connection, ReportSkipped> {
        let now = self.system.uptime();
        let result = self.reporter.on_tick(now, &mut self.sensor, &mut self.http);
        if let Err(reason) = &result {
            debug!("No report this tick: {}", reason);
        }
        result
    }

    /// Lifecycle callback for report connections.
    pub fn on_connection_event(&mut self, connection: H::Connection, event: ConnectionEvent) {
        self.reporter
            .on_connection_event(connection, event, &mut self.http);
    }

    /// Dispatches one inbound request.
    pub fn handle_request(&mut self, request: &Request<'_>) -> Response {
        debug!("{} {}", request.method, request.path);
        match Route::resolve(request.path) {
            Route::Status => self.control.get_status(&mut self.sensor, &self.heater),
            Route::Action => self
                .control
                .set_heater_via_path(request.path, &mut self.heater),
            Route::Debug => self.control.get_debug(&self.system),
            Route::NotFound => Response::not_found(),
        }
    }

    pub fn heater_state(&self) -> HeaterState {
        self.heater.state()
    }

    pub fn report_state(&self) -> SchedulerState {
        self.reporter.state()
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    pub fn http_mut(&mut self) -> &mut H {
        &mut self.http
    }

    pub fn system_mut(&mut self) -> &mut S {
        &mut self.system
    }
}
