//! API request and response types for the HTTP admin interface.

use serde::{Deserialize, Serialize};

use crate::controller::GateStatus;
use crate::effects::Actor;
use crate::feedback::ConfigLedMode;
use crate::gate::GateState;
use crate::security::SecurityState;
use crate::siren::SirenState;
use crate::traffic::TrafficLight;
use crate::traits::FaultKind;

pub use crate::messages::SetFlagRequest;

// ============================================================================
// Response Types
// ============================================================================

/// API response wrapper for consistent JSON structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (present when success=true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present when success=false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Current controller status as served by `GET /api/state`.
///
/// Carries both the named states and the numeric codes the dashboard uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateResponse {
    /// Gate state
    pub gate: GateState,
    /// Numeric gate code
    pub gate_code: u8,
    /// Gate state before the last change
    pub previous_gate: GateState,
    /// Security state
    pub security: SecurityState,
    /// Numeric security code
    pub security_code: u8,
    /// Siren state
    pub siren: SirenState,
    /// Traffic lamp currently lit
    pub light: TrafficLight,
    /// Configuration LED pattern
    pub config_led: ConfigLedMode,
    /// Active fault condition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<FaultKind>,
    /// Panic latch
    pub panic_latched: bool,
    /// Maintenance mode
    pub maintenance: bool,
    /// Emergency condition
    pub emergency: bool,
    /// Drive relay energized
    pub relay_active: bool,
    /// Remote learn window open
    pub learn_mode: bool,
    /// Gate stably closed
    pub stably_closed: bool,
    /// Obstacle seen recently
    pub obstacle_recent: bool,
    /// Actor credited with the last command
    pub actor: Actor,
    /// Controller initialized
    pub initialized: bool,
}

impl From<&GateStatus> for StateResponse {
    fn from(status: &GateStatus) -> Self {
        Self {
            gate: status.gate,
            gate_code: status.gate.ui_code(),
            previous_gate: status.previous_gate,
            security: status.security,
            security_code: status.security.ui_code(),
            siren: status.siren,
            light: TrafficLight::for_gate(status.initialized, status.gate),
            config_led: status.config_led,
            fault: status.fault(),
            panic_latched: status.panic_latched,
            maintenance: status.maintenance,
            emergency: status.emergency,
            relay_active: status.relay_active,
            learn_mode: status.learn_mode,
            stably_closed: status.stably_closed,
            obstacle_recent: status.obstacle_recent,
            actor: status.actor,
            initialized: status.initialized,
        }
    }
}

/// Command result response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// Whether the command was queued
    pub accepted: bool,
    /// Result details
    pub result: String,
}

impl CommandResponse {
    /// Create an accepted response
    pub fn accepted(result: impl Into<String>) -> Self {
        Self {
            accepted: true,
            result: result.into(),
        }
    }

    /// Create a rejected response
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            result: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_ok() {
        let response = ApiResponse::ok(42);
        assert!(response.success);
        assert_eq!(response.data, Some(42));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_api_response_err_skips_data() {
        let response = ApiResponse::<()>::err("Not found");
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"success":false,"error":"Not found"}"#);
    }

    #[test]
    fn test_state_response_codes() {
        let status = GateStatus {
            gate: GateState::Opening,
            security: SecurityState::Latent,
            initialized: true,
            ..GateStatus::default()
        };
        let response = StateResponse::from(&status);
        assert_eq!(response.gate_code, 3);
        assert_eq!(response.security_code, 2);
        assert_eq!(response.light, TrafficLight::Yellow);
        assert_eq!(response.fault, Some(FaultKind::SecurityTamper));
    }

    #[test]
    fn test_state_response_json_names() {
        let status = GateStatus {
            gate: GateState::MechanicalFailure,
            initialized: true,
            ..GateStatus::default()
        };
        let json = serde_json::to_value(StateResponse::from(&status)).unwrap();
        assert_eq!(json["gate"], "mechanical_failure");
        assert_eq!(json["light"], "red");
        assert_eq!(json["security"], "normal");
        assert_eq!(json["actor"], "system");
    }

    #[test]
    fn test_command_response() {
        let ok = CommandResponse::accepted("pulse_queued");
        assert!(ok.accepted);
        let no = CommandResponse::rejected("mailbox full");
        assert!(!no.accepted);
        assert_eq!(no.result, "mailbox full");
    }
}
