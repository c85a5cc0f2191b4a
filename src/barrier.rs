//! Obstacle interlock.
//!
//! Reopens the gate when the obstacle sensor is interrupted while the gate is
//! closing. Only the rising edge counts, and the previous reading is tracked
//! in every gate state, so an obstruction that was already present when the
//! gate started closing does not trigger a reopen.

use crate::effects::{Actor, Effect, Effects, GateEvent};
use crate::gate::GateState;
use crate::pulse::PulseRequest;
use crate::timer::Timer;

/// Edge detector for the obstacle sensor.
#[derive(Debug, Default)]
pub struct BarrierMonitor {
    previous: bool,
    last_seen: Timer,
}

impl BarrierMonitor {
    /// Creates a monitor with no obstruction on record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one cycle.
    pub fn update(&mut self, obstructed: bool, gate: GateState, now: u32, effects: &mut Effects) {
        if obstructed {
            self.last_seen.start(now);
        }

        if gate == GateState::Closing && obstructed && !self.previous {
            log::warn!("barrier: obstruction while closing, reopening");
            effects.push(Effect::RequestPulse(PulseRequest::Forced));
            effects.push(Effect::SetActor(Actor::Sensors));
            effects.log(GateEvent::ObstacleDetected, Some(Actor::Sensors));
        }

        self.previous = obstructed;
    }

    /// Returns true if an obstruction was seen less than `window_ms` ago.
    pub fn seen_within(&self, now: u32, window_ms: u32) -> bool {
        self.last_seen.within(now, window_ms)
    }

    /// Reading from the previous cycle.
    pub fn is_obstructed(&self) -> bool {
        self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rising_edge_while_closing_requests_reopen() {
        let mut barrier = BarrierMonitor::new();
        let mut effects = Effects::new();

        barrier.update(false, GateState::Closing, 0, &mut effects);
        assert!(effects.is_empty());

        barrier.update(true, GateState::Closing, 10, &mut effects);
        assert!(effects.contains(&Effect::RequestPulse(PulseRequest::Forced)));
        assert!(effects.contains(&Effect::SetActor(Actor::Sensors)));
        assert!(effects.logged(GateEvent::ObstacleDetected));
    }

    #[test]
    fn held_obstruction_fires_once() {
        let mut barrier = BarrierMonitor::new();
        let mut effects = Effects::new();
        barrier.update(true, GateState::Closing, 0, &mut effects);
        effects.take();

        barrier.update(true, GateState::Closing, 10, &mut effects);
        barrier.update(true, GateState::Closing, 20, &mut effects);
        assert!(effects.is_empty());
    }

    #[test]
    fn obstruction_before_closing_has_no_edge() {
        let mut barrier = BarrierMonitor::new();
        let mut effects = Effects::new();
        barrier.update(true, GateState::Open, 0, &mut effects);
        barrier.update(true, GateState::Closing, 10, &mut effects);
        assert!(effects.is_empty());

        // Cleared and cut again: a fresh edge
        barrier.update(false, GateState::Closing, 20, &mut effects);
        barrier.update(true, GateState::Closing, 30, &mut effects);
        assert!(effects.logged(GateEvent::ObstacleDetected));
    }

    #[test]
    fn other_states_only_stamp() {
        let mut barrier = BarrierMonitor::new();
        let mut effects = Effects::new();
        for gate in [GateState::Open, GateState::Closed, GateState::Opening] {
            barrier.update(false, gate, 0, &mut effects);
            barrier.update(true, gate, 100, &mut effects);
        }
        assert!(effects.is_empty());
        assert!(barrier.seen_within(5_099, 5_000));
        assert!(!barrier.seen_within(5_100, 5_000));
    }

    #[test]
    fn never_seen() {
        let barrier = BarrierMonitor::new();
        assert!(!barrier.seen_within(0, 5_000));
        assert!(!barrier.is_obstructed());
    }
}
