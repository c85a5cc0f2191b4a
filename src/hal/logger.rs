//! Event log backed by the `log` facade.

use crate::traits::EventLog;

/// Forwards event records to the `log` crate at `info` level.
///
/// Useful on its own for desktop runs, and as the default on targets without
/// persistent storage. `clear` only emits a marker line.
///
/// # Example
///
/// ```rust
/// use rs_gatekeeper::hal::LogEventLog;
/// use rs_gatekeeper::traits::EventLog;
///
/// let mut log = LogEventLog::new("gate");
/// log.record("Barrier activated", "Sensors");
/// assert_eq!(log.recorded(), 1);
/// ```
#[derive(Debug)]
pub struct LogEventLog {
    target: &'static str,
    recorded: u32,
}

impl LogEventLog {
    /// Creates a log writing under `target`.
    pub const fn new(target: &'static str) -> Self {
        Self {
            target,
            recorded: 0,
        }
    }

    /// Records written since the last clear.
    pub fn recorded(&self) -> u32 {
        self.recorded
    }
}

impl Default for LogEventLog {
    fn default() -> Self {
        Self::new("events")
    }
}

impl EventLog for LogEventLog {
    fn record(&mut self, message: &str, actor: &str) {
        self.recorded = self.recorded.wrapping_add(1);
        log::info!(target: self.target, "{} [{}]", message, actor);
    }

    fn clear(&mut self) {
        log::warn!(target: self.target, "event log cleared ({} records)", self.recorded);
        self.recorded = 0;
    }
}
