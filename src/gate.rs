//! Gate position tracking from limit switches and motion timers.
//!
//! [`GateTracker`] is the only writer of [`GateState`]. Once per cycle it
//! looks at the two limit switches and derives where the gate is:
//!
//! | Closed switch | Open switch | Result |
//! |---------------|-------------|--------|
//! | on | on | [`SensorError`](GateState::SensorError) after the confirmation window |
//! | on | off | [`Closed`](GateState::Closed) |
//! | off | on | [`Open`](GateState::Open) |
//! | off | off | In transit, inferred from the previous state |
//!
//! Motion is only inferred out of `Closed` when a pulse was authorized
//! moments earlier; a closed switch that drops on its own leaves the state at
//! `Closed` so the security monitor can treat it as possible tampering.
//!
//! # Example
//!
//! ```rust
//! use rs_gatekeeper::{Effects, GateState, GateTracker, Timer, TimingConfig};
//!
//! let mut gate = GateTracker::new(&TimingConfig::default());
//! let mut effects = Effects::new();
//! let no_command = Timer::unset();
//!
//! gate.update(true, false, &no_command, 0, &mut effects);
//! assert_eq!(gate.state(), GateState::Closed);
//!
//! // Switch released right after a pulse: the gate is opening
//! let pulse = Timer::started_at(100);
//! gate.update(false, false, &pulse, 150, &mut effects);
//! assert_eq!(gate.state(), GateState::Opening);
//! ```

use crate::config::TimingConfig;
use crate::effects::{Actor, Effects, GateEvent};
use crate::timer::Timer;
use crate::traits::FaultKind;

/// Logical gate position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GateState {
    /// Position not yet known (boot, or after a sensor error cleared).
    #[default]
    Unknown,
    /// Resting on the closed limit switch.
    Closed,
    /// Resting on the open limit switch.
    Open,
    /// Travelling from closed towards open.
    Opening,
    /// Travelling from open towards closed.
    Closing,
    /// Both limit switches report active.
    SensorError,
    /// Travel took longer than the configured maximum.
    MechanicalFailure,
}

impl GateState {
    /// Numeric code used by the status display.
    pub const fn ui_code(&self) -> u8 {
        match self {
            GateState::Unknown => 0,
            GateState::Closed => 1,
            GateState::Open => 2,
            GateState::Opening => 3,
            GateState::SensorError => 4,
            GateState::MechanicalFailure => 5,
            GateState::Closing => 6,
        }
    }

    /// Returns the state as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            GateState::Unknown => "unknown",
            GateState::Closed => "closed",
            GateState::Open => "open",
            GateState::Opening => "opening",
            GateState::Closing => "closing",
            GateState::SensorError => "sensor_error",
            GateState::MechanicalFailure => "mechanical_failure",
        }
    }

    /// The fault this state reports, if any.
    pub const fn fault(&self) -> Option<FaultKind> {
        match self {
            GateState::SensorError => Some(FaultKind::SensorConflict),
            GateState::MechanicalFailure => Some(FaultKind::MotionTimeout),
            _ => None,
        }
    }

    /// Returns true for `SensorError` and `MechanicalFailure`.
    pub const fn is_fault(&self) -> bool {
        self.fault().is_some()
    }

    /// Returns true while the gate is travelling.
    pub const fn is_moving(&self) -> bool {
        matches!(self, GateState::Opening | GateState::Closing)
    }
}

/// Derives [`GateState`] from limit switches and motion timers.
#[derive(Debug)]
pub struct GateTracker {
    state: GateState,
    previous: GateState,
    changed: Timer,
    motion: Timer,
    conflict: Timer,
    stably_closed: bool,
    was_stably_closed: bool,
    sensor_conflict_ms: u32,
    command_window_ms: u32,
    max_motion_ms: u32,
    stable_closed_ms: u32,
}

impl GateTracker {
    /// Create a tracker in the `Unknown` state.
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            state: GateState::Unknown,
            previous: GateState::Unknown,
            changed: Timer::unset(),
            motion: Timer::unset(),
            conflict: Timer::unset(),
            stably_closed: false,
            was_stably_closed: false,
            sensor_conflict_ms: timing.sensor_conflict_ms,
            command_window_ms: timing.command_window_ms,
            max_motion_ms: timing.max_motion_ms,
            stable_closed_ms: timing.stable_closed_ms,
        }
    }

    /// Run one cycle.
    ///
    /// `last_authorized` is the pulse controller's stamp of the most recent
    /// accepted pulse.
    pub fn update(
        &mut self,
        closed: bool,
        open: bool,
        last_authorized: &Timer,
        now: u32,
        effects: &mut Effects,
    ) {
        let mut next = self.state;

        if closed && open {
            if !self.conflict.is_running() {
                self.conflict.start(now);
            } else if self.conflict.has_elapsed(now, self.sensor_conflict_ms) {
                next = GateState::SensorError;
            }
        } else {
            self.conflict.clear();

            if closed {
                next = GateState::Closed;
                self.motion.clear();
            } else if open {
                next = GateState::Open;
                self.motion.clear();
            } else {
                match self.state {
                    GateState::Closed if last_authorized.within(now, self.command_window_ms) => {
                        next = GateState::Opening;
                        self.motion.start(now);
                        self.was_stably_closed = false;
                    }
                    GateState::Open => {
                        next = GateState::Closing;
                        self.motion.start(now);
                        self.was_stably_closed = false;
                    }
                    GateState::SensorError => {
                        next = GateState::Unknown;
                        self.motion.start(now);
                    }
                    _ => {}
                }

                if self.motion.exceeded(now, self.max_motion_ms)
                    && next != GateState::MechanicalFailure
                {
                    next = GateState::MechanicalFailure;
                    effects.log(GateEvent::MotionTimeout, Some(Actor::System));
                }
            }
        }

        if next != self.state {
            match next {
                GateState::SensorError | GateState::MechanicalFailure => {
                    log::warn!("gate: {} -> {}", self.state.as_str(), next.as_str())
                }
                _ => log::info!("gate: {} -> {}", self.state.as_str(), next.as_str()),
            }
            self.previous = self.state;
            self.state = next;
            self.changed.start(now);
        }

        if self.state == GateState::Closed && self.changed.has_elapsed(now, self.stable_closed_ms) {
            if !self.was_stably_closed {
                log::debug!("gate: stably closed, sabotage detection armed");
            }
            self.stably_closed = true;
            self.was_stably_closed = true;
        } else {
            self.stably_closed = false;
        }
    }

    /// Current gate state.
    pub fn state(&self) -> GateState {
        self.state
    }

    /// State before the most recent change.
    pub fn previous(&self) -> GateState {
        self.previous
    }

    /// Snapshot of the most recent state change.
    pub fn changed_at(&self) -> Timer {
        self.changed
    }

    /// Returns true while a motion timer is running.
    pub fn is_timing_motion(&self) -> bool {
        self.motion.is_running()
    }

    /// Closed for at least the dwell time, right now.
    pub fn is_stably_closed(&self) -> bool {
        self.stably_closed
    }

    /// Has been stably closed since the last time the gate started moving.
    pub fn was_stably_closed(&self) -> bool {
        self.was_stably_closed
    }
}
