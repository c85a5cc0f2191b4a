//! HTTP admin server for the ESP32 board.
//!
//! Serves the same JSON API as the desktop axum router, using the
//! callback-based esp-idf-svc server. Handlers only touch the
//! [`SharedGateState`] mailbox; the control loop drains it through a
//! [`WebAdmin`](crate::services::WebAdmin).
//!
//! # Endpoints
//!
//! - `GET /api/state` - Last published status (JSON)
//! - `POST /api/pulse` - Request a gate pulse
//! - `POST /api/silence` - Silence a sabotage alarm
//! - `POST /api/maintenance` - `{"enabled": true|false}`
//! - `POST /api/emergency` - `{"enabled": true|false}`
//!
//! # Example
//!
//! ```ignore
//! use rs_gatekeeper::hal::esp32::Esp32HttpServer;
//! use rs_gatekeeper::services::{SharedGateState, WebAdmin};
//! use std::sync::Arc;
//!
//! let shared = Arc::new(SharedGateState::new());
//! let _server = Esp32HttpServer::new(&config.web, Arc::clone(&shared))?;
//! let admin = WebAdmin::new(shared);
//! ```

use std::sync::Arc;

use esp_idf_svc::http::server::{Configuration, EspHttpConnection, EspHttpServer, Request};
use esp_idf_svc::http::Method;
use esp_idf_svc::io::{EspIOError, Read, Write};

use crate::config::WebConfig;
use crate::messages::SetFlagRequest;
use crate::services::api::{ApiResponse, CommandResponse, StateResponse};
use crate::services::SharedGateState;
use crate::traits::AdminCommand;

const JSON: &[(&str, &str)] = &[("Content-Type", "application/json")];

/// HTTP server for the gate admin API.
///
/// The server stops when this value is dropped.
pub struct Esp32HttpServer {
    _server: EspHttpServer<'static>,
}

fn respond<T: serde::Serialize>(
    req: Request<&mut EspHttpConnection>,
    status: u16,
    body: &ApiResponse<T>,
) -> Result<(), EspIOError> {
    let json = serde_json::to_vec(body).unwrap_or_else(|_| br#"{"success":false}"#.to_vec());
    let mut resp = req.into_response(status, None, JSON)?;
    resp.write_all(&json)?;
    Ok(())
}

fn queue(
    req: Request<&mut EspHttpConnection>,
    state: &SharedGateState,
    command: AdminCommand,
    result: &str,
) -> Result<(), EspIOError> {
    let response = if state.submit(command) {
        CommandResponse::accepted(result)
    } else {
        CommandResponse::rejected("mailbox_full")
    };
    respond(req, 200, &ApiResponse::ok(response))
}

fn read_flag(req: &mut Request<&mut EspHttpConnection>) -> Option<SetFlagRequest> {
    let mut buf = [0u8; 64];
    let len = req.read(&mut buf).ok()?;
    serde_json::from_slice(&buf[..len]).ok()
}

impl Esp32HttpServer {
    /// Start the server on `config.port`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP server fails to start.
    pub fn new(config: &WebConfig, shared: Arc<SharedGateState>) -> anyhow::Result<Self> {
        let server_config = Configuration {
            http_port: config.port,
            ..Default::default()
        };

        let mut server = EspHttpServer::new(&server_config)?;

        let for_state = Arc::clone(&shared);
        server.fn_handler("/api/state", Method::Get, move |req| {
            let status = for_state.status();
            respond(req, 200, &ApiResponse::ok(StateResponse::from(&status)))
        })?;

        let for_pulse = Arc::clone(&shared);
        server.fn_handler("/api/pulse", Method::Post, move |req| {
            queue(req, &for_pulse, AdminCommand::RequestPulse, "pulse_queued")
        })?;

        let for_silence = Arc::clone(&shared);
        server.fn_handler("/api/silence", Method::Post, move |req| {
            queue(req, &for_silence, AdminCommand::SilenceAlarm, "silence_queued")
        })?;

        let for_maintenance = Arc::clone(&shared);
        server.fn_handler("/api/maintenance", Method::Post, move |mut req| {
            match read_flag(&mut req) {
                Some(flag) => queue(req, &for_maintenance, flag.maintenance(), "maintenance_queued"),
                None => respond(req, 400, &ApiResponse::<()>::err("Invalid maintenance request")),
            }
        })?;

        let for_emergency = shared;
        server.fn_handler("/api/emergency", Method::Post, move |mut req| {
            match read_flag(&mut req) {
                Some(flag) => queue(req, &for_emergency, flag.emergency(), "emergency_queued"),
                None => respond(req, 400, &ApiResponse::<()>::err("Invalid emergency request")),
            }
        })?;

        log::info!("http: admin server on port {}", config.port);

        Ok(Self { _server: server })
    }
}
