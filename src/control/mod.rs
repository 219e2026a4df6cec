// src/control/mod.rs

//! HTTP status page, manual heater control and diagnostics.

mod response;

pub use response::{Response, Status, BODY_CAPACITY};

use crate::common::{
    config::FirmwareInfo,
    error::SensorError,
    hal_traits::{SystemStatus, TwoWireBus},
    types::{HeaterState, Temperature},
};
use crate::heater::HeaterActuator;
use crate::sensor::Mcp9808;
use core::fmt;
use embedded_hal::digital::OutputPin;
use log::{debug, warn};

pub const STATUS_PATH: &str = "/heater";
pub const ACTION_PREFIX: &str = "/heater/";
pub const DEBUG_PATH: &str = "/debug";

/// Inbound request as seen by the handlers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Request<'a> {
    pub method: &'a str,
    /// Path without query string.
    pub path: &'a str,
}

impl<'a> Request<'a> {
    /// Builds a request from the method and the raw request target; any
    /// query string is dropped.
    pub fn new(method: &'a str, target: &'a str) -> Self {
        let path = match target.split_once('?') {
            Some((path, _query)) => path,
            None => target,
        };
        Request { method, path }
    }
}

/// Endpoint a request path is dispatched to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Route {
    Status,
    Action,
    Debug,
    NotFound,
}

impl Route {
    /// `/heater` and `/debug` match exactly, `/heater/` by prefix.
    pub fn resolve(path: &str) -> Self {
        if path == STATUS_PATH {
            Route::Status
        } else if path.starts_with(ACTION_PREFIX) {
            Route::Action
        } else if path == DEBUG_PATH {
            Route::Debug
        } else {
            Route::NotFound
        }
    }
}

/// Inline rendering of a sensor read for the status page.
struct Reading(Result<Temperature, SensorError>);

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Ok(t) => write!(f, "{}&deg;C", t),
            Err(_) => f.write_str("unavailable"),
        }
    }
}

/// Request handlers. Each one produces a complete response; connections
/// are always closed after it is sent.
#[derive(Debug, Copy, Clone, Default)]
pub struct ControlSurface {
    firmware: FirmwareInfo,
}

impl ControlSurface {
    pub fn new(firmware: FirmwareInfo) -> Self {
        ControlSurface { firmware }
    }

    pub fn firmware(&self) -> &FirmwareInfo {
        &self.firmware
    }

    /// Status page with a fresh temperature read and a toggle button.
    pub fn get_status<B, L, R>(
        &self,
        sensor: &mut Mcp9808<B>,
        heater: &HeaterActuator<L, R>,
    ) -> Response
    where
        B: TwoWireBus,
        L: OutputPin,
        R: OutputPin,
    {
        let reading = Reading(sensor.read_temperature());
        let state = heater.state();
        render_status(reading, state, &self.firmware)
    }

    /// `/heater/on` and `/heater/off` switch the heater; anything else
    /// under `/heater/` is ignored. Always redirects to the status page.
    pub fn set_heater_via_path<L, R>(&self, path: &str, heater: &mut HeaterActuator<L, R>) -> Response
    where
        L: OutputPin,
        R: OutputPin,
    {
        let requested = match path.strip_prefix(ACTION_PREFIX) {
            Some("on") => Some(true),
            Some("off") => Some(false),
            _ => None,
        };

        match requested {
            Some(on) => {
                if let Err(e) = heater.set_heater(on) {
                    warn!("Heater switch failed: {}", e);
                }
            }
            None => debug!("Ignoring heater action {}", path),
        }

        Response::redirect(STATUS_PATH)
    }

    /// Plain-text uptime and free memory.
    pub fn get_debug<S: SystemStatus>(&self, system: &S) -> Response {
        Response::text(
            Status::Ok,
            format_args!(
                "Time is {:.2}. Free RAM {}.\r\n",
                system.uptime().as_secs_f64(),
                system.free_memory()
            ),
        )
    }
}

fn render_status(reading: Reading, state: HeaterState, firmware: &FirmwareInfo) -> Response {
    let toggle = state.toggled();
    Response::html(
        Status::Ok,
        format_args!(
            "<h1>Office heater</h1>\r\n\
             <p>Temperature is {}.</p>\r\n\
             <p>Heater is {}.</p>\r\n\
             <form action={}{}><input type=submit value='Turn heater {}'></form>\r\n\
             <hr>\r\n\
             Heater FW {} ({})",
            reading,
            state,
            ACTION_PREFIX,
            toggle,
            toggle,
            firmware.version,
            firmware.build_id,
        ),
    )
}

// --- Unit Tests ---
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::heater::tests::{capture_logs, failing_relay_heater, pins, take_logs};
    use crate::sensor::tests::MockBus;
    use core::time::Duration;

    pub(crate) struct MockSystem {
        pub uptime: Duration,
        pub free: u32,
    }

    impl SystemStatus for MockSystem {
        fn uptime(&self) -> Duration {
            self.uptime
        }

        fn free_memory(&self) -> u32 {
            self.free
        }
    }

    fn firmware() -> FirmwareInfo {
        FirmwareInfo {
            version: "1.2.3",
            build_id: "20261017-abc",
        }
    }

    #[test]
    fn test_request_strips_query() {
        assert_eq!(Request::new("GET", "/heater/on?").path, "/heater/on");
        assert_eq!(Request::new("GET", "/heater?x=1").path, "/heater");
        assert_eq!(Request::new("POST", "/debug").path, "/debug");
    }

    #[test]
    fn test_route_resolve() {
        assert_eq!(Route::resolve("/heater"), Route::Status);
        assert_eq!(Route::resolve("/heater/on"), Route::Action);
        assert_eq!(Route::resolve("/heater/off"), Route::Action);
        assert_eq!(Route::resolve("/heater/"), Route::Action);
        assert_eq!(Route::resolve("/heater/bogus"), Route::Action);
        assert_eq!(Route::resolve("/debug"), Route::Debug);
        assert_eq!(Route::resolve("/heaters"), Route::NotFound);
        assert_eq!(Route::resolve("/"), Route::NotFound);
        assert_eq!(Route::resolve("/debug/x"), Route::NotFound);
    }

    #[test]
    fn test_status_page_heater_off() {
        let surface = ControlSurface::new(firmware());
        let mut sensor = Mcp9808::new(MockBus::with_register(0x01, 0x94));
        let (led, relay, _) = pins();
        let heater = HeaterActuator::new(led, relay).unwrap();

        let response = surface.get_status(&mut sensor, &heater);
        assert_eq!(response.status, Status::Ok);
        assert_eq!(response.content_type, Some("text/html"));
        let body = response.body.as_str();
        assert!(body.contains("<p>Temperature is 25.25&deg;C.</p>"));
        assert!(body.contains("<p>Heater is off.</p>"));
        assert!(body.contains("<form action=/heater/on>"));
        assert!(body.contains("value='Turn heater on'"));
        assert!(body.ends_with("Heater FW 1.2.3 (20261017-abc)"));
    }

    #[test]
    fn test_status_page_reads_sensor_every_time() {
        let surface = ControlSurface::new(firmware());
        let mut sensor = Mcp9808::new(MockBus::with_register(0x01, 0x00));
        let (led, relay, _) = pins();
        let heater = HeaterActuator::new(led, relay).unwrap();

        surface.get_status(&mut sensor, &heater);
        surface.get_status(&mut sensor, &heater);
        assert_eq!(sensor.release().transactions(), 2);
    }

    #[test]
    fn test_status_page_sensor_failure_inline() {
        let surface = ControlSurface::new(firmware());
        let mut sensor = Mcp9808::new(MockBus::nak_on_read());
        let (led, relay, _) = pins();
        let heater = HeaterActuator::new(led, relay).unwrap();

        let response = surface.get_status(&mut sensor, &heater);
        assert_eq!(response.status, Status::Ok);
        assert!(response.body.contains("<p>Temperature is unavailable.</p>"));
        assert!(response.body.contains("<p>Heater is off.</p>"));
    }

    #[test]
    fn test_action_on_and_off() {
        let surface = ControlSurface::default();
        let (led, relay, _) = pins();
        let mut heater = HeaterActuator::new(led, relay).unwrap();

        let response = surface.set_heater_via_path("/heater/on", &mut heater);
        assert!(heater.is_on());
        assert_eq!(response.status, Status::Found);
        assert_eq!(response.location, Some("/heater"));

        surface.set_heater_via_path("/heater/off", &mut heater);
        assert!(!heater.is_on());
    }

    #[test]
    fn test_action_unknown_suffix_is_noop_but_redirects() {
        let surface = ControlSurface::default();
        let (led, relay, log) = pins();
        let mut heater = HeaterActuator::new(led, relay).unwrap();
        let writes = log.borrow().len();

        for path in ["/heater/", "/heater/ON", "/heater/onn", "/heater/on/x"] {
            let response = surface.set_heater_via_path(path, &mut heater);
            assert_eq!(response.status, Status::Found);
            assert_eq!(response.location, Some("/heater"));
        }
        assert_eq!(heater.state(), HeaterState::Off);
        assert_eq!(log.borrow().len(), writes);
    }

    #[test]
    fn test_action_failure_still_redirects() {
        let surface = ControlSurface::default();
        let mut heater = failing_relay_heater();
        capture_logs();

        let response = surface.set_heater_via_path("/heater/on", &mut heater);
        assert_eq!(response.status, Status::Found);
        assert_eq!(response.location, Some("/heater"));
        assert!(!heater.is_on());

        let logs = take_logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].0, log::Level::Warn);
        assert!(logs[0].1.starts_with("Heater switch failed"));
    }

    #[test]
    fn test_debug_output() {
        let surface = ControlSurface::default();
        let system = MockSystem {
            uptime: Duration::from_millis(12_500),
            free: 40_960,
        };
        let response = surface.get_debug(&system);
        assert_eq!(response.status, Status::Ok);
        assert_eq!(response.content_type, Some("text/plain"));
        assert_eq!(response.body.as_str(), "Time is 12.50. Free RAM 40960.\r\n");
    }
}
