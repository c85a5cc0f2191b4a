//! Axum-based HTTP server for the gate admin API.
//!
//! Provides REST endpoints for:
//! - GET `/api/state` - Last published controller status
//! - POST `/api/pulse` - Request a gate pulse
//! - POST `/api/silence` - Silence a sabotage alarm
//! - POST `/api/maintenance` - Enter or leave maintenance mode
//! - POST `/api/emergency` - Raise or clear the emergency condition
//!
//! Commands are only queued here. They take effect on the runner's next
//! cycle, so a POST is answered before the gate has reacted.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::WebConfig;
use crate::messages::SetFlagRequest;
use crate::traits::AdminCommand;

use super::api::{ApiResponse, CommandResponse, StateResponse};
use super::shared::SharedGateState;

// ============================================================================
// Route Handlers
// ============================================================================

fn queue(state: &SharedGateState, command: AdminCommand, result: &str) -> Json<ApiResponse<CommandResponse>> {
    if state.submit(command) {
        Json(ApiResponse::ok(CommandResponse::accepted(result)))
    } else {
        Json(ApiResponse::ok(CommandResponse::rejected("mailbox_full")))
    }
}

fn parse_flag(body: &Bytes) -> Option<SetFlagRequest> {
    serde_json::from_slice(body).ok()
}

/// GET /api/state - Returns the last published status
async fn get_state(State(state): State<Arc<SharedGateState>>) -> Json<ApiResponse<StateResponse>> {
    let status = state.status();
    Json(ApiResponse::ok(StateResponse::from(&status)))
}

/// POST /api/pulse - Request a gate pulse
async fn request_pulse(
    State(state): State<Arc<SharedGateState>>,
) -> Json<ApiResponse<CommandResponse>> {
    queue(&state, AdminCommand::RequestPulse, "pulse_queued")
}

/// POST /api/silence - Silence the sabotage alarm
async fn silence_alarm(
    State(state): State<Arc<SharedGateState>>,
) -> Json<ApiResponse<CommandResponse>> {
    queue(&state, AdminCommand::SilenceAlarm, "silence_queued")
}

/// POST /api/maintenance - Set maintenance mode
///
/// Accepts JSON: `{"enabled": true}`
async fn set_maintenance(
    State(state): State<Arc<SharedGateState>>,
    body: Bytes,
) -> Json<ApiResponse<CommandResponse>> {
    let Some(request) = parse_flag(&body) else {
        return Json(ApiResponse::err("Invalid maintenance request"));
    };
    queue(&state, request.maintenance(), "maintenance_queued")
}

/// POST /api/emergency - Set the emergency condition
///
/// Accepts JSON: `{"enabled": true}`
async fn set_emergency(
    State(state): State<Arc<SharedGateState>>,
    body: Bytes,
) -> Json<ApiResponse<CommandResponse>> {
    let Some(request) = parse_flag(&body) else {
        return Json(ApiResponse::err("Invalid emergency request"));
    };
    queue(&state, request.emergency(), "emergency_queued")
}

/// Fallback handler for 404
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::err("Not found")),
    )
}

// ============================================================================
// Server Builder
// ============================================================================

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// Address to bind to
    pub addr: SocketAddr,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self::from_config(&WebConfig::default())
    }
}

impl WebServerConfig {
    /// Create a new config with the given address
    pub fn new(addr: impl Into<SocketAddr>) -> Self {
        Self {
            addr: addr.into(),
            ..Default::default()
        }
    }

    /// Set whether CORS should be permissive
    pub fn cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Create from shared WebConfig
    pub fn from_config(config: &WebConfig) -> Self {
        Self {
            addr: ([0, 0, 0, 0], config.port).into(),
            cors_permissive: config.cors_permissive,
        }
    }
}

/// Build the Axum router with all routes
pub fn build_router(state: Arc<SharedGateState>, config: &WebServerConfig) -> Router {
    let mut router = Router::new()
        .route("/api/state", get(get_state))
        .route("/api/pulse", post(request_pulse))
        .route("/api/silence", post(silence_alarm))
        .route("/api/maintenance", post(set_maintenance))
        .route("/api/emergency", post(set_emergency))
        .fallback(not_found)
        .with_state(state);

    if config.cors_permissive {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}

/// Serve the admin API on `config.addr` until the server shuts down.
///
/// The runner must hold a [`WebAdmin`](super::WebAdmin) over the same state
/// for queued commands to reach the controller.
///
/// # Example
///
/// ```ignore
/// let state = Arc::new(SharedGateState::new());
/// let admin = WebAdmin::new(Arc::clone(&state));
/// std::thread::spawn(move || runner_with(admin).run_forever());
///
/// run_server(state, WebServerConfig::default()).await?;
/// ```
pub async fn run_server(
    state: Arc<SharedGateState>,
    config: WebServerConfig,
) -> Result<(), std::io::Error> {
    let router = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    log::info!("web: listening on http://{}", config.addr);

    axum::serve(listener, router).await
}
