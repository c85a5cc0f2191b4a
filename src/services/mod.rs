//! Network services for the administration interface.
//!
//! The control loop never shares the [`GateController`](crate::GateController)
//! itself. Instead the web handlers and the runner meet at a
//! [`SharedGateState`]: handlers queue [`AdminCommand`](crate::AdminCommand)s
//! into its mailbox and read the last published status, while the runner
//! drains the mailbox through [`WebAdmin`] once per cycle.
//!
//! ```ignore
//! use std::sync::Arc;
//! use rs_gatekeeper::services::{build_router, SharedGateState, WebAdmin, WebServerConfig};
//!
//! let state = Arc::new(SharedGateState::new());
//!
//! // Runner side
//! let admin = WebAdmin::new(Arc::clone(&state));
//!
//! // HTTP side
//! let router = build_router(Arc::clone(&state), &WebServerConfig::default());
//! ```

// Mailbox shared by every admin front end (axum here, esp-idf on the board)
pub mod shared;

#[cfg(any(feature = "web", feature = "esp32-http"))]
pub mod api;

#[cfg(feature = "web")]
pub mod web;

pub use shared::*;

#[cfg(any(feature = "web", feature = "esp32-http"))]
pub use api::*;

#[cfg(feature = "web")]
pub use web::*;
