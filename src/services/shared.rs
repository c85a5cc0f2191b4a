//! Shared state between the web handlers and the control loop.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rs_gatekeeper::services::{SharedGateState, WebAdmin};
//! use rs_gatekeeper::traits::{AdminCommand, AdminInterface};
//!
//! let state = Arc::new(SharedGateState::new());
//! let mut admin = WebAdmin::new(Arc::clone(&state));
//!
//! // A handler queues a command...
//! assert!(state.submit(AdminCommand::RequestPulse));
//!
//! // ...and the runner picks it up on its next cycle.
//! assert_eq!(admin.poll(), Some(AdminCommand::RequestPulse));
//! assert_eq!(admin.poll(), None);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::controller::GateStatus;
use crate::traits::{AdminCommand, AdminInterface};

/// Commands waiting beyond this are refused.
pub const MAILBOX_CAPACITY: usize = 16;

// ============================================================================
// Shared Gate State
// ============================================================================

/// Mailbox and status board shared by the web handlers and the runner.
///
/// # Thread Safety
///
/// - The mailbox and the status each have their own `Mutex`, so a handler
///   reading the status never waits on a command being queued.
/// - Locks are held only for a push, a pop or a copy. A poisoned lock is
///   recovered, since both protected values stay valid after any panic.
pub struct SharedGateState {
    mailbox: Mutex<VecDeque<AdminCommand>>,
    status: Mutex<GateStatus>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SharedGateState {
    /// Create an empty mailbox with a default status.
    pub fn new() -> Self {
        Self {
            mailbox: Mutex::new(VecDeque::with_capacity(MAILBOX_CAPACITY)),
            status: Mutex::new(GateStatus::default()),
        }
    }

    /// Queue a command for the runner.
    ///
    /// Returns `false` if the mailbox is full.
    pub fn submit(&self, command: AdminCommand) -> bool {
        let mut mailbox = lock(&self.mailbox);
        if mailbox.len() >= MAILBOX_CAPACITY {
            log::warn!("admin: mailbox full, refusing {:?}", command);
            return false;
        }
        mailbox.push_back(command);
        true
    }

    /// Take the oldest queued command.
    pub fn take_command(&self) -> Option<AdminCommand> {
        lock(&self.mailbox).pop_front()
    }

    /// Number of commands not yet taken.
    pub fn pending(&self) -> usize {
        lock(&self.mailbox).len()
    }

    /// Last status published by the runner.
    pub fn status(&self) -> GateStatus {
        *lock(&self.status)
    }

    /// Replace the published status.
    pub fn publish(&self, status: GateStatus) {
        *lock(&self.status) = status;
    }
}

impl Default for SharedGateState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Admin Interface
// ============================================================================

/// Runner-side end of a [`SharedGateState`].
pub struct WebAdmin {
    state: Arc<SharedGateState>,
}

impl WebAdmin {
    /// Wrap a shared state.
    pub fn new(state: Arc<SharedGateState>) -> Self {
        Self { state }
    }

    /// The shared state this admin drains.
    pub fn state(&self) -> &Arc<SharedGateState> {
        &self.state
    }
}

impl AdminInterface for WebAdmin {
    fn begin(&mut self) {
        log::info!("admin: web mailbox ready");
    }

    fn poll(&mut self) -> Option<AdminCommand> {
        self.state.take_command()
    }

    fn report(&mut self, status: &GateStatus) {
        self.state.publish(*status);
    }
}
