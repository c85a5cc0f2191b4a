//! Collaborator traits for event logging, connectivity and remote administration.
//!
//! These services sit outside the control logic. The runner calls them at
//! fixed points of each cycle and never waits on them: a slow or absent
//! collaborator must not change gate, security or siren behavior.
//!
//! # Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`EventLog`] | Fire-and-forget event records |
//! | [`Connectivity`] | Network bring-up, polling, credential reset |
//! | [`AdminInterface`] | Remote commands in, status reports out |
//!
//! [`Offline`] implements both collaborator traits as no-ops.

use crate::controller::GateStatus;

/// Persistent event log.
///
/// `record` is fire-and-forget: implementations should buffer and return
/// immediately.
pub trait EventLog {
    /// Record an event attributed to `actor`.
    fn record(&mut self, message: &str, actor: &str);

    /// Erase all stored events.
    ///
    /// Used by the storage-reset and factory-reset programming commands.
    fn clear(&mut self) {}
}

/// Network connectivity manager.
pub trait Connectivity {
    /// Bring the link up. Called once from [`GateRunner::begin`].
    ///
    /// [`GateRunner::begin`]: crate::GateRunner::begin
    fn begin(&mut self);

    /// Service the link. Called once per cycle; must not block.
    fn poll(&mut self);

    /// Forget stored credentials.
    fn reset_credentials(&mut self);
}

/// A command received from the administration interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AdminCommand {
    /// Request a gate pulse.
    RequestPulse,
    /// Silence a sabotage alarm, moving security into the latent hold.
    SilenceAlarm,
    /// Enter or leave maintenance mode.
    SetMaintenance(bool),
    /// Raise or clear the emergency condition.
    SetEmergency(bool),
}

/// Administration interface (web UI or similar).
///
/// This is the only external writer of control flags. The runner drains
/// at most one command per cycle and reports the status snapshot back.
pub trait AdminInterface {
    /// Start serving. Called once from [`GateRunner::begin`].
    ///
    /// [`GateRunner::begin`]: crate::GateRunner::begin
    fn begin(&mut self);

    /// Take the next pending command, if any. Must not block.
    fn poll(&mut self) -> Option<AdminCommand>;

    /// Publish the latest controller status for display.
    fn report(&mut self, status: &GateStatus);
}

/// Stand-in for a board with no network and no admin front end.
///
/// Connectivity calls do nothing and no admin command ever arrives.
#[derive(Clone, Copy, Debug, Default)]
pub struct Offline;

impl Connectivity for Offline {
    fn begin(&mut self) {}

    fn poll(&mut self) {}

    fn reset_credentials(&mut self) {}
}

impl AdminInterface for Offline {
    fn begin(&mut self) {}

    fn poll(&mut self) -> Option<AdminCommand> {
        None
    }

    fn report(&mut self, _status: &GateStatus) {}
}
