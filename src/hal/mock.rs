//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for all hardware and collaborator
//! traits, enabling development and testing on desktop without a gate.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockInputs`] | [`GateInputs`] | Settable input snapshot, injectable read failure |
//! | [`MockOutputs`] | [`GateOutputs`] | Records every written frame |
//! | [`MockClock`] | [`Clock`] | Controllable wrapping time source |
//! | [`MockEventLog`] | [`EventLog`] | Captures event records |
//! | [`MockConnectivity`] | [`Connectivity`] | Counts lifecycle calls |
//! | [`MockAdmin`] | [`AdminInterface`] | Queued commands, captured reports |
//!
//! # Example
//!
//! ```rust
//! use rs_gatekeeper::{GateRunner, Config, InputSnapshot};
//! use rs_gatekeeper::hal::{
//!     MockAdmin, MockClock, MockConnectivity, MockEventLog, MockInputs, MockOutputs,
//! };
//! use rs_gatekeeper::AdminCommand;
//!
//! let mut admin = MockAdmin::new();
//! admin.queue(AdminCommand::SetMaintenance(true));
//!
//! let mut runner = GateRunner::new(
//!     &Config::default(),
//!     MockClock::new(),
//!     MockInputs::with_snapshot(InputSnapshot::closed()),
//!     MockOutputs::new(),
//!     MockEventLog::new(),
//!     MockConnectivity::new(),
//!     admin,
//! );
//! runner.begin();
//! runner.run_cycle().unwrap();
//!
//! assert!(runner.status().maintenance);
//! assert!(runner.event_log().contains("Maintenance mode enabled"));
//! ```
//!
//! [`GateInputs`]: crate::traits::GateInputs
//! [`GateOutputs`]: crate::traits::GateOutputs
//! [`Clock`]: crate::traits::Clock
//! [`EventLog`]: crate::traits::EventLog
//! [`Connectivity`]: crate::traits::Connectivity
//! [`AdminInterface`]: crate::traits::AdminInterface

extern crate alloc;
use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use crate::controller::GateStatus;
use crate::traits::{
    AdminCommand, AdminInterface, Clock, Connectivity, EventLog, GateInputs, GateOutputs,
    InputSnapshot, OutputFrame,
};

// ============================================================================
// Hardware Mocks
// ============================================================================

/// Mock input source for testing.
///
/// Returns whatever [`snapshot`](Self::snapshot) holds. Set `fail` to make
/// the next reads return an error.
///
/// # Example
///
/// ```rust
/// use rs_gatekeeper::hal::MockInputs;
/// use rs_gatekeeper::traits::GateInputs;
///
/// let mut inputs = MockInputs::new();
/// inputs.snapshot.open_limit = true;
/// assert!(inputs.read().unwrap().open_limit);
///
/// inputs.fail = true;
/// assert!(inputs.read().is_err());
/// assert_eq!(inputs.reads, 2);
/// ```
#[derive(Debug, Default)]
pub struct MockInputs {
    /// Snapshot returned by `read`.
    pub snapshot: InputSnapshot,
    /// Whether reads should fail.
    pub fail: bool,
    /// Number of times `read` was called.
    pub reads: usize,
}

impl MockInputs {
    /// Creates a mock with every input inactive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock returning `snapshot`.
    pub fn with_snapshot(snapshot: InputSnapshot) -> Self {
        Self {
            snapshot,
            ..Self::default()
        }
    }
}

impl GateInputs for MockInputs {
    type Error = ();

    fn read(&mut self) -> Result<InputSnapshot, ()> {
        self.reads += 1;
        if self.fail {
            Err(())
        } else {
            Ok(self.snapshot)
        }
    }
}

/// Mock output sink for testing.
///
/// Records every frame written for verification.
///
/// # Example
///
/// ```rust
/// use rs_gatekeeper::hal::MockOutputs;
/// use rs_gatekeeper::traits::{GateOutputs, OutputFrame};
///
/// let mut outputs = MockOutputs::new();
/// outputs.write_fail_safe().unwrap();
/// assert_eq!(outputs.last(), Some(&OutputFrame::fail_safe()));
/// ```
#[derive(Debug, Default)]
pub struct MockOutputs {
    /// Every frame written, oldest first.
    pub frames: Vec<OutputFrame>,
    /// Whether writes should fail.
    pub fail: bool,
}

impl MockOutputs {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent frame, if any.
    pub fn last(&self) -> Option<&OutputFrame> {
        self.frames.last()
    }
}

impl GateOutputs for MockOutputs {
    type Error = ();

    fn write(&mut self, frame: &OutputFrame) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.frames.push(*frame);
        Ok(())
    }
}

/// Mock clock for testing.
///
/// Provides a controllable time source for testing time-dependent behavior.
/// Advancing past `u32::MAX` wraps, like the hardware counter.
///
/// # Example
///
/// ```rust
/// use rs_gatekeeper::hal::MockClock;
/// use rs_gatekeeper::traits::Clock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.set(u32::MAX);
/// clock.advance(10);
/// assert_eq!(clock.now_ms(), 9);
/// ```
#[derive(Debug, Default)]
pub struct MockClock {
    current_ms: u32,
}

impl MockClock {
    /// Creates a new mock clock starting at 0ms.
    pub fn new() -> Self {
        Self { current_ms: 0 }
    }

    /// Creates a mock clock starting at `ms`.
    pub fn starting_at(ms: u32) -> Self {
        Self { current_ms: ms }
    }

    /// Sets the current time in milliseconds.
    pub fn set(&mut self, ms: u32) {
        self.current_ms = ms;
    }

    /// Advances the clock by the given duration, wrapping.
    pub fn advance(&mut self, ms: u32) {
        self.current_ms = self.current_ms.wrapping_add(ms);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u32 {
        self.current_ms
    }
}

// ============================================================================
// Service Mocks
// ============================================================================

/// Mock event log for testing.
///
/// # Example
///
/// ```rust
/// use rs_gatekeeper::hal::MockEventLog;
/// use rs_gatekeeper::traits::EventLog;
///
/// let mut log = MockEventLog::new();
/// log.record("Barrier activated", "Sensors");
/// assert!(log.contains("Barrier activated"));
///
/// log.clear();
/// assert!(log.records.is_empty());
/// assert_eq!(log.clears, 1);
/// ```
#[derive(Debug, Default)]
pub struct MockEventLog {
    /// Recorded (message, actor) pairs, oldest first.
    pub records: Vec<(String, String)>,
    /// Number of times `clear` was called.
    pub clears: usize,
}

impl MockEventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any record carries `message`.
    pub fn contains(&self, message: &str) -> bool {
        self.records.iter().any(|(m, _)| m == message)
    }

    /// Actors credited with `message`, in order.
    pub fn actors_for(&self, message: &str) -> Vec<&str> {
        self.records
            .iter()
            .filter(|(m, _)| m == message)
            .map(|(_, a)| a.as_str())
            .collect()
    }
}

impl EventLog for MockEventLog {
    fn record(&mut self, message: &str, actor: &str) {
        self.records.push((message.into(), actor.into()));
    }

    fn clear(&mut self) {
        self.records.clear();
        self.clears += 1;
    }
}

/// Mock network manager for testing.
#[derive(Debug, Default)]
pub struct MockConnectivity {
    /// Whether `begin` was called.
    pub started: bool,
    /// Number of `poll` calls.
    pub polls: usize,
    /// Number of credential resets.
    pub credential_resets: usize,
}

impl MockConnectivity {
    /// Creates an idle mock.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Connectivity for MockConnectivity {
    fn begin(&mut self) {
        self.started = true;
    }

    fn poll(&mut self) {
        self.polls += 1;
    }

    fn reset_credentials(&mut self) {
        self.credential_resets += 1;
    }
}

/// Mock administration interface for testing.
///
/// Commands queued with [`queue`](Self::queue) come out one per `poll`.
#[derive(Debug, Default)]
pub struct MockAdmin {
    /// Commands waiting to be polled.
    pub pending: VecDeque<AdminCommand>,
    /// Most recent status report.
    pub last_status: Option<GateStatus>,
    /// Number of reports received.
    pub reports: usize,
    /// Whether `begin` was called.
    pub started: bool,
}

impl MockAdmin {
    /// Creates a mock with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a command.
    pub fn queue(&mut self, command: AdminCommand) {
        self.pending.push_back(command);
    }
}

impl AdminInterface for MockAdmin {
    fn begin(&mut self) {
        self.started = true;
    }

    fn poll(&mut self) -> Option<AdminCommand> {
        self.pending.pop_front()
    }

    fn report(&mut self, status: &GateStatus) {
        self.last_status = Some(*status);
        self.reports += 1;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // MockInputs / MockOutputs Tests
    // =========================================================================

    #[test]
    fn mock_inputs_default() {
        let mut inputs = MockInputs::new();
        assert_eq!(inputs.read(), Ok(InputSnapshot::default()));
        assert_eq!(inputs.reads, 1);
    }

    #[test]
    fn mock_inputs_failure() {
        let mut inputs = MockInputs::with_snapshot(InputSnapshot::closed());
        inputs.fail = true;
        assert_eq!(inputs.read(), Err(()));
        inputs.fail = false;
        assert_eq!(inputs.read(), Ok(InputSnapshot::closed()));
    }

    #[test]
    fn mock_outputs_records_frames() {
        let mut outputs = MockOutputs::new();
        let frame = OutputFrame {
            relay: true,
            ..OutputFrame::default()
        };
        outputs.write(&frame).unwrap();
        outputs.write(&OutputFrame::default()).unwrap();
        assert_eq!(outputs.frames.len(), 2);
        assert!(outputs.frames[0].relay);
        assert!(!outputs.last().unwrap().relay);
    }

    #[test]
    fn mock_outputs_failure() {
        let mut outputs = MockOutputs::new();
        outputs.fail = true;
        assert_eq!(outputs.write(&OutputFrame::default()), Err(()));
        assert!(outputs.frames.is_empty());
    }

    // =========================================================================
    // MockClock Tests
    // =========================================================================

    #[test]
    fn mock_clock_advance() {
        let mut clock = MockClock::new();
        clock.advance(100);
        clock.advance(50);
        assert_eq!(clock.now_ms(), 150);
    }

    #[test]
    fn mock_clock_wraps() {
        let mut clock = MockClock::starting_at(u32::MAX - 1);
        clock.advance(3);
        assert_eq!(clock.now_ms(), 1);
    }

    // =========================================================================
    // Service Mock Tests
    // =========================================================================

    #[test]
    fn mock_event_log_actors() {
        let mut log = MockEventLog::new();
        log.record("Remote command", "Web Admin");
        log.record("Barrier activated", "Sensors");
        log.record("Remote command", "System");
        assert_eq!(log.actors_for("Remote command"), vec!["Web Admin", "System"]);
    }

    #[test]
    fn mock_connectivity_counts() {
        let mut net = MockConnectivity::new();
        net.begin();
        net.poll();
        net.poll();
        net.reset_credentials();
        assert!(net.started);
        assert_eq!(net.polls, 2);
        assert_eq!(net.credential_resets, 1);
    }

    #[test]
    fn mock_admin_fifo() {
        let mut admin = MockAdmin::new();
        admin.queue(AdminCommand::RequestPulse);
        admin.queue(AdminCommand::SilenceAlarm);
        assert_eq!(admin.poll(), Some(AdminCommand::RequestPulse));
        assert_eq!(admin.poll(), Some(AdminCommand::SilenceAlarm));
        assert_eq!(admin.poll(), None);

        admin.report(&GateStatus::default());
        assert_eq!(admin.reports, 1);
        assert!(admin.last_status.is_some());
    }
}
