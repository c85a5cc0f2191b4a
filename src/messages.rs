//! Shared request types for the HTTP admin API.
//!
//! # Example
//!
//! ```
//! use rs_gatekeeper::messages::SetFlagRequest;
//! use rs_gatekeeper::AdminCommand;
//!
//! #[cfg(feature = "web")]
//! {
//!     let req: SetFlagRequest = serde_json::from_str(r#"{"enabled": true}"#).unwrap();
//!     assert_eq!(req.maintenance(), AdminCommand::SetMaintenance(true));
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::traits::AdminCommand;

// ============================================================================
// Request Types
// ============================================================================

/// Request to switch a control flag on or off.
///
/// Used by both the maintenance and emergency endpoints.
///
/// # JSON Example
///
/// ```json
/// {"enabled": true}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetFlagRequest {
    /// Desired flag value
    pub enabled: bool,
}

impl SetFlagRequest {
    /// Create a new flag request.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// As a maintenance-mode command.
    pub fn maintenance(&self) -> AdminCommand {
        AdminCommand::SetMaintenance(self.enabled)
    }

    /// As an emergency command.
    pub fn emergency(&self) -> AdminCommand {
        AdminCommand::SetEmergency(self.enabled)
    }
}
