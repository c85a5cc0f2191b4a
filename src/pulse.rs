//! Relay pulse arbitration.
//!
//! Every command that moves the gate ends up here as a pending
//! [`PulseRequest`]. The [`PulseController`] decides whether to honor it and,
//! if so, holds the drive relay for `pulse_ms`.
//!
//! Requests are checked in this order:
//!
//! 1. A pulse in progress defers everything else; the request stays pending.
//! 2. An obstructed barrier with the gate fully open drops the request.
//! 3. A request arriving within `min_pulse_spacing_ms` of the previous pulse
//!    is dropped, unless it is [`Forced`](PulseRequest::Forced).
//! 4. Otherwise the relay is energized. If the gate is faulted the pulse is a
//!    fault override: the siren chirps and the override is logged, but the
//!    fault itself is left alone.

use crate::config::TimingConfig;
use crate::effects::{Actor, Effect, Effects, GateEvent};
use crate::gate::GateState;
use crate::timer::Timer;
use crate::traits::FaultKind;

/// How a pulse request treats pulse spacing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PulseRequest {
    /// Honors the minimum spacing since the last pulse.
    Normal,
    /// Bypasses spacing. Used by the obstacle interlock to reopen at once.
    Forced,
}

/// Drive relay state machine.
#[derive(Debug)]
pub struct PulseController {
    driving: bool,
    pulse: Timer,
    last_pulse: Timer,
    last_authorized: Timer,
    pending: Option<PulseRequest>,
    pulse_ms: u32,
    spacing_ms: u32,
}

impl PulseController {
    /// Creates an idle controller with no pulse history.
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            driving: false,
            pulse: Timer::unset(),
            last_pulse: Timer::unset(),
            last_authorized: Timer::unset(),
            pending: None,
            pulse_ms: timing.pulse_ms,
            spacing_ms: timing.min_pulse_spacing_ms,
        }
    }

    /// Queue a pulse request.
    ///
    /// A forced request upgrades a pending normal one and forgets the
    /// last-pulse stamp.
    pub fn request(&mut self, kind: PulseRequest) {
        if kind == PulseRequest::Forced {
            self.last_pulse.clear();
        }
        self.pending = match (self.pending, kind) {
            (Some(PulseRequest::Forced), _) => Some(PulseRequest::Forced),
            (_, kind) => Some(kind),
        };
    }

    /// Run one cycle. Returns the relay level.
    pub fn update(
        &mut self,
        gate: GateState,
        obstructed: bool,
        actor: Actor,
        now: u32,
        effects: &mut Effects,
    ) -> bool {
        if self.driving {
            if self.pulse.has_elapsed(now, self.pulse_ms) {
                self.driving = false;
                self.pulse.clear();
                self.last_pulse.start(now);
                log::debug!("pulse: relay released");
            }
            return self.driving;
        }

        let Some(kind) = self.pending else {
            return false;
        };

        if actor == Actor::System {
            effects.push(Effect::SetActor(Actor::WebAdmin));
            effects.log(GateEvent::RemoteCommand, Some(Actor::WebAdmin));
        }

        if obstructed && gate == GateState::Open {
            log::info!("pulse: dropped, barrier obstructed with gate open");
            self.pending = None;
            return false;
        }

        if kind == PulseRequest::Normal && self.last_pulse.within(now, self.spacing_ms) {
            log::debug!("pulse: dropped, spacing not met");
            self.pending = None;
            return false;
        }

        if let Some(fault) = gate.fault() {
            log::warn!(
                "pulse: {} while {}",
                FaultKind::CommandOverride.as_str(),
                fault.as_str()
            );
            effects.push(Effect::ErrorBeep);
            effects.log(GateEvent::FaultOverride(fault), None);
        }

        self.driving = true;
        self.pulse.start(now);
        self.last_authorized.start(now);
        self.pending = None;
        log::info!("pulse: relay energized");
        true
    }

    /// Stamp of the most recently authorized pulse.
    pub fn last_authorized(&self) -> Timer {
        self.last_authorized
    }

    /// Returns true while the relay is held.
    pub fn is_driving(&self) -> bool {
        self.driving
    }

    /// The request waiting to be evaluated, if any.
    pub fn pending(&self) -> Option<PulseRequest> {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> PulseController {
        PulseController::new(&TimingConfig::default())
    }

    fn run(
        pulse: &mut PulseController,
        gate: GateState,
        obstructed: bool,
        now: u32,
    ) -> (bool, Effects) {
        let mut effects = Effects::new();
        let relay = pulse.update(gate, obstructed, Actor::PhysicalButton, now, &mut effects);
        (relay, effects)
    }

    #[test]
    fn idle_without_request() {
        let mut pulse = controller();
        let (relay, effects) = run(&mut pulse, GateState::Closed, false, 0);
        assert!(!relay);
        assert!(effects.is_empty());
    }

    #[test]
    fn first_request_fires_even_at_boot() {
        let mut pulse = controller();
        pulse.request(PulseRequest::Normal);
        let (relay, _) = run(&mut pulse, GateState::Closed, false, 0);
        assert!(relay);
        assert_eq!(pulse.last_authorized().started(), Some(0));
        assert_eq!(pulse.pending(), None);
    }

    #[test]
    fn relay_held_for_pulse_length() {
        let mut pulse = controller();
        pulse.request(PulseRequest::Normal);
        assert!(run(&mut pulse, GateState::Closed, false, 1_000).0);
        assert!(run(&mut pulse, GateState::Closed, false, 1_499).0);
        assert!(!run(&mut pulse, GateState::Closed, false, 1_500).0);
        assert!(!pulse.is_driving());
    }

    #[test]
    fn request_deferred_while_driving() {
        let mut pulse = controller();
        pulse.request(PulseRequest::Normal);
        run(&mut pulse, GateState::Closed, false, 0);

        pulse.request(PulseRequest::Normal);
        run(&mut pulse, GateState::Closed, false, 100);
        assert_eq!(pulse.pending(), Some(PulseRequest::Normal));
    }

    #[test]
    fn spacing_drops_normal_request() {
        let mut pulse = controller();
        pulse.request(PulseRequest::Normal);
        run(&mut pulse, GateState::Closed, false, 0);
        run(&mut pulse, GateState::Closed, false, 500);

        pulse.request(PulseRequest::Normal);
        let (relay, _) = run(&mut pulse, GateState::Opening, false, 1_999);
        assert!(!relay);
        assert_eq!(pulse.pending(), None);

        pulse.request(PulseRequest::Normal);
        let (relay, _) = run(&mut pulse, GateState::Opening, false, 2_000);
        assert!(relay);
    }

    #[test]
    fn forced_request_bypasses_spacing() {
        let mut pulse = controller();
        pulse.request(PulseRequest::Normal);
        run(&mut pulse, GateState::Open, false, 0);
        run(&mut pulse, GateState::Open, false, 500);

        pulse.request(PulseRequest::Forced);
        let (relay, _) = run(&mut pulse, GateState::Closing, true, 600);
        assert!(relay);
    }

    #[test]
    fn forced_request_survives_pulse_completion() {
        let mut pulse = controller();
        pulse.request(PulseRequest::Normal);
        run(&mut pulse, GateState::Open, false, 0);

        pulse.request(PulseRequest::Forced);
        pulse.request(PulseRequest::Normal);
        // Completion restamps the last pulse
        run(&mut pulse, GateState::Closing, true, 500);
        let (relay, _) = run(&mut pulse, GateState::Closing, true, 510);
        assert!(relay);
    }

    #[test]
    fn obstructed_open_gate_drops_request() {
        let mut pulse = controller();
        pulse.request(PulseRequest::Normal);
        let (relay, _) = run(&mut pulse, GateState::Open, true, 0);
        assert!(!relay);
        assert_eq!(pulse.pending(), None);
        assert!(!pulse.last_authorized().is_running());
    }

    #[test]
    fn fault_override_beeps_and_logs() {
        let mut pulse = controller();
        pulse.request(PulseRequest::Normal);
        let (relay, effects) = run(&mut pulse, GateState::SensorError, false, 0);
        assert!(relay);
        assert!(effects.contains(&Effect::ErrorBeep));
        assert!(effects.logged(GateEvent::FaultOverride(FaultKind::SensorConflict)));

        run(&mut pulse, GateState::MechanicalFailure, false, 500);
        pulse.request(PulseRequest::Normal);
        let (relay, effects) = run(&mut pulse, GateState::MechanicalFailure, false, 2_000);
        assert!(relay);
        assert!(effects.logged(GateEvent::FaultOverride(FaultKind::MotionTimeout)));
    }

    #[test]
    fn dropped_fault_override_does_not_beep() {
        let mut pulse = controller();
        pulse.request(PulseRequest::Normal);
        run(&mut pulse, GateState::Closed, false, 0);
        run(&mut pulse, GateState::Closed, false, 500);

        pulse.request(PulseRequest::Normal);
        let (relay, effects) = run(&mut pulse, GateState::SensorError, false, 600);
        assert!(!relay);
        assert!(!effects.contains(&Effect::ErrorBeep));
    }

    #[test]
    fn system_actor_relabelled_as_web_admin() {
        let mut pulse = controller();
        pulse.request(PulseRequest::Normal);
        let mut effects = Effects::new();
        pulse.update(GateState::Closed, false, Actor::System, 0, &mut effects);

        assert_eq!(
            effects.as_slice()[..2],
            [
                Effect::SetActor(Actor::WebAdmin),
                Effect::Log {
                    event: GateEvent::RemoteCommand,
                    actor: Some(Actor::WebAdmin)
                },
            ]
        );
    }

    #[test]
    fn spacing_is_wrap_safe() {
        let mut pulse = controller();
        pulse.request(PulseRequest::Normal);
        run(&mut pulse, GateState::Closed, false, u32::MAX - 600);
        run(&mut pulse, GateState::Closed, false, u32::MAX - 100);

        pulse.request(PulseRequest::Normal);
        assert!(!run(&mut pulse, GateState::Opening, false, 1_000).0);

        pulse.request(PulseRequest::Normal);
        assert!(run(&mut pulse, GateState::Opening, false, 1_400).0);
    }
}
