//! Security and alarm state machine.
//!
//! Watches for sabotage of a stably closed gate and manages the alarm
//! lifecycle:
//!
//! ```text
//!            closed switch lost > tamper_ms          silence()
//!   Normal ──────────────────────────────────▶ Triggered ──────▶ Latent
//!     ▲                                           ▲               │
//!     │            switch back after hold         │ still missing │
//!     └───────────────────────────────────────────┴───────────────┘
//! ```
//!
//! The panic latch lives here too: it forces `Triggered` and suspends
//! sabotage evaluation until released.

use crate::config::TimingConfig;
use crate::effects::{Actor, Effect, Effects, GateEvent};
use crate::gate::GateState;
use crate::timer::Timer;
use crate::traits::FaultKind;

/// Alarm state.
///
/// `SensorFault` and `ObstacleFlagged` are never stored; they only come out
/// of [`SecurityMonitor::display_state`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SecurityState {
    /// No alarm.
    #[default]
    Normal,
    /// Alarm active, siren cycling.
    Triggered,
    /// Alarm silenced, waiting to re-evaluate.
    Latent,
    /// Display only: the limit switches disagree.
    SensorFault,
    /// Display only: an obstacle was seen recently.
    ObstacleFlagged,
}

impl SecurityState {
    /// Numeric code used by the status display.
    pub const fn ui_code(&self) -> u8 {
        match self {
            SecurityState::Normal => 0,
            SecurityState::Triggered => 1,
            SecurityState::Latent => 2,
            SecurityState::SensorFault => 3,
            SecurityState::ObstacleFlagged => 4,
        }
    }

    /// Returns the state as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SecurityState::Normal => "normal",
            SecurityState::Triggered => "triggered",
            SecurityState::Latent => "latent",
            SecurityState::SensorFault => "sensor_fault",
            SecurityState::ObstacleFlagged => "obstacle_flagged",
        }
    }
}

/// Everything the monitor reads from the rest of the controller.
#[derive(Clone, Copy, Debug)]
pub struct SecurityInputs {
    /// `begin` has run.
    pub initialized: bool,
    /// Current gate state.
    pub gate: GateState,
    /// Sticky stably-closed flag from the gate tracker.
    pub armed: bool,
    /// Closed limit switch level.
    pub closed_limit: bool,
    /// Maintenance mode.
    pub maintenance: bool,
    /// Emergency condition.
    pub emergency: bool,
}

/// Sabotage detector and alarm lifecycle.
#[derive(Debug)]
pub struct SecurityMonitor {
    state: SecurityState,
    panic_latched: bool,
    tamper: Timer,
    latent: Timer,
    tamper_ms: u32,
    latent_ms: u32,
}

impl SecurityMonitor {
    /// Creates a monitor in `Normal`.
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            state: SecurityState::Normal,
            panic_latched: false,
            tamper: Timer::unset(),
            latent: Timer::unset(),
            tamper_ms: timing.tamper_ms,
            latent_ms: timing.siren_off_ms,
        }
    }

    /// Stored state.
    pub fn state(&self) -> SecurityState {
        self.state
    }

    /// Returns true while the panic latch is set.
    pub fn is_panic_latched(&self) -> bool {
        self.panic_latched
    }

    /// Set the panic latch and trigger the alarm.
    pub fn latch_panic(&mut self) {
        self.panic_latched = true;
        self.state = SecurityState::Triggered;
    }

    /// Clear the panic latch and return to `Normal`.
    pub fn release_panic(&mut self) {
        self.panic_latched = false;
        self.state = SecurityState::Normal;
    }

    /// Silence a triggered alarm, starting the latent hold.
    ///
    /// A panic alarm cannot be silenced this way. Returns true if the state
    /// changed.
    pub fn silence(&mut self, effects: &mut Effects) -> bool {
        if self.state != SecurityState::Triggered || self.panic_latched {
            return false;
        }
        log::info!("security: alarm silenced");
        self.state = SecurityState::Latent;
        self.latent.clear();
        effects.log(GateEvent::AlarmSilenced, None);
        true
    }

    /// Run one cycle.
    pub fn update(&mut self, inputs: &SecurityInputs, now: u32, effects: &mut Effects) {
        if !inputs.initialized
            || inputs.gate == GateState::Unknown
            || inputs.maintenance
            || self.panic_latched
        {
            return;
        }

        if inputs.emergency {
            self.state = SecurityState::Normal;
            return;
        }

        if inputs.armed && self.state == SecurityState::Normal {
            if inputs.closed_limit {
                self.tamper.clear();
            } else {
                self.tamper.start_if_unset(now);
                if self.tamper.exceeded(now, self.tamper_ms) {
                    log::warn!("security: {}", FaultKind::SecurityTamper.as_str());
                    self.state = SecurityState::Triggered;
                    self.latent.clear();
                    effects.log(GateEvent::SabotageAlarm, Some(Actor::System));
                }
            }
        } else {
            self.tamper.clear();
        }

        if self.state == SecurityState::Latent {
            self.latent.start_if_unset(now);
            if self.latent.exceeded(now, self.latent_ms) {
                if inputs.closed_limit {
                    log::info!("security: alarm normalized");
                    self.state = SecurityState::Normal;
                    effects.log(GateEvent::AlarmNormalized, Some(Actor::System));
                } else {
                    log::warn!("security: fault persists, alarm re-triggered");
                    self.state = SecurityState::Triggered;
                    effects.push(Effect::RestartSiren);
                    effects.log(GateEvent::AlarmRetriggered, Some(Actor::System));
                }
                self.latent.clear();
            }
        } else {
            self.latent.clear();
        }
    }

    /// State shown to the operator.
    ///
    /// `obstacle_recent` reports whether the obstacle sensor tripped within
    /// the indicator window.
    pub fn display_state(&self, gate: GateState, obstacle_recent: bool) -> SecurityState {
        match self.state {
            SecurityState::Triggered => SecurityState::Triggered,
            SecurityState::Latent => SecurityState::Latent,
            _ if gate == GateState::SensorError => SecurityState::SensorFault,
            _ if obstacle_recent => SecurityState::ObstacleFlagged,
            _ => SecurityState::Normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor() -> SecurityMonitor {
        SecurityMonitor::new(&TimingConfig::default())
    }

    fn armed(closed_limit: bool) -> SecurityInputs {
        SecurityInputs {
            initialized: true,
            gate: GateState::Closed,
            armed: true,
            closed_limit,
            maintenance: false,
            emergency: false,
        }
    }

    fn step(sec: &mut SecurityMonitor, inputs: SecurityInputs, now: u32) -> Effects {
        let mut effects = Effects::new();
        sec.update(&inputs, now, &mut effects);
        effects
    }

    fn sabotage(sec: &mut SecurityMonitor) {
        step(sec, armed(false), 0);
        let effects = step(sec, armed(false), 4_001);
        assert!(effects.logged(GateEvent::SabotageAlarm));
        assert_eq!(sec.state(), SecurityState::Triggered);
    }

    #[test]
    fn sabotage_after_tamper_window() {
        let mut sec = monitor();
        step(&mut sec, armed(false), 1_000);
        step(&mut sec, armed(false), 5_000);
        assert_eq!(sec.state(), SecurityState::Normal);
        let effects = step(&mut sec, armed(false), 5_001);
        assert_eq!(sec.state(), SecurityState::Triggered);
        assert!(effects.logged(GateEvent::SabotageAlarm));
    }

    #[test]
    fn switch_return_resets_tamper_timer() {
        let mut sec = monitor();
        step(&mut sec, armed(false), 0);
        step(&mut sec, armed(false), 3_000);
        step(&mut sec, armed(true), 3_100);
        step(&mut sec, armed(false), 3_200);
        step(&mut sec, armed(false), 7_000);
        assert_eq!(sec.state(), SecurityState::Normal);
    }

    #[test]
    fn not_armed_never_triggers() {
        let mut sec = monitor();
        let inputs = SecurityInputs {
            armed: false,
            ..armed(false)
        };
        for t in (0..20_000).step_by(500) {
            step(&mut sec, inputs, t);
        }
        assert_eq!(sec.state(), SecurityState::Normal);
    }

    #[test]
    fn disabled_conditions() {
        for inputs in [
            SecurityInputs {
                initialized: false,
                ..armed(false)
            },
            SecurityInputs {
                gate: GateState::Unknown,
                ..armed(false)
            },
            SecurityInputs {
                maintenance: true,
                ..armed(false)
            },
        ] {
            let mut sec = monitor();
            step(&mut sec, inputs, 0);
            step(&mut sec, inputs, 10_000);
            assert_eq!(sec.state(), SecurityState::Normal);
        }
    }

    #[test]
    fn emergency_forces_normal() {
        let mut sec = monitor();
        sabotage(&mut sec);
        let inputs = SecurityInputs {
            emergency: true,
            ..armed(false)
        };
        step(&mut sec, inputs, 5_000);
        assert_eq!(sec.state(), SecurityState::Normal);
    }

    #[test]
    fn panic_latch_and_release() {
        let mut sec = monitor();
        sec.latch_panic();
        assert!(sec.is_panic_latched());
        assert_eq!(sec.state(), SecurityState::Triggered);

        // Frozen while latched, even under emergency
        let inputs = SecurityInputs {
            emergency: true,
            ..armed(true)
        };
        step(&mut sec, inputs, 100);
        assert_eq!(sec.state(), SecurityState::Triggered);

        sec.release_panic();
        assert!(!sec.is_panic_latched());
        assert_eq!(sec.state(), SecurityState::Normal);
    }

    #[test]
    fn silence_only_from_triggered_without_panic() {
        let mut sec = monitor();
        let mut effects = Effects::new();
        assert!(!sec.silence(&mut effects));

        sec.latch_panic();
        assert!(!sec.silence(&mut effects));
        sec.release_panic();

        sabotage(&mut sec);
        assert!(sec.silence(&mut effects));
        assert_eq!(sec.state(), SecurityState::Latent);
        assert!(effects.logged(GateEvent::AlarmSilenced));
    }

    #[test]
    fn latent_normalizes_when_switch_returns() {
        let mut sec = monitor();
        sabotage(&mut sec);
        sec.silence(&mut Effects::new());

        step(&mut sec, armed(true), 10_000);
        step(&mut sec, armed(true), 15_000);
        assert_eq!(sec.state(), SecurityState::Latent);

        let effects = step(&mut sec, armed(true), 15_001);
        assert_eq!(sec.state(), SecurityState::Normal);
        assert!(effects.logged(GateEvent::AlarmNormalized));
    }

    #[test]
    fn latent_retriggers_when_fault_persists() {
        let mut sec = monitor();
        sabotage(&mut sec);
        sec.silence(&mut Effects::new());

        step(&mut sec, armed(false), 10_000);
        let effects = step(&mut sec, armed(false), 15_001);
        assert_eq!(sec.state(), SecurityState::Triggered);
        assert!(effects.contains(&Effect::RestartSiren));
        assert!(effects.logged(GateEvent::AlarmRetriggered));
    }

    #[test]
    fn display_derivation() {
        let mut sec = monitor();
        let closed = GateState::Closed;
        assert_eq!(sec.display_state(closed, false), SecurityState::Normal);
        assert_eq!(sec.display_state(closed, true), SecurityState::ObstacleFlagged);
        assert_eq!(
            sec.display_state(GateState::SensorError, true),
            SecurityState::SensorFault
        );

        sabotage(&mut sec);
        assert_eq!(sec.display_state(GateState::SensorError, true), SecurityState::Triggered);

        sec.silence(&mut Effects::new());
        assert_eq!(sec.display_state(GateState::SensorError, true), SecurityState::Latent);
    }

    #[test]
    fn ui_codes() {
        assert_eq!(SecurityState::Normal.ui_code(), 0);
        assert_eq!(SecurityState::Triggered.ui_code(), 1);
        assert_eq!(SecurityState::Latent.ui_code(), 2);
        assert_eq!(SecurityState::SensorFault.ui_code(), 3);
        assert_eq!(SecurityState::ObstacleFlagged.ui_code(), 4);
    }
}
