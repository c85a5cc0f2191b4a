//! Three-lamp traffic indicator.
//!
//! Green only while the gate is closed or closing, yellow while it opens, and
//! red for everything else, including any state the controller cannot vouch
//! for.

use crate::gate::GateState;

/// Lamp shown by the traffic indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TrafficLight {
    /// Stop.
    Red,
    /// Gate opening.
    Yellow,
    /// Safe to pass.
    Green,
}

impl TrafficLight {
    /// Lamp for the given controller state.
    pub const fn for_gate(initialized: bool, gate: GateState) -> Self {
        if !initialized {
            return TrafficLight::Red;
        }
        match gate {
            GateState::Opening => TrafficLight::Yellow,
            GateState::Closed | GateState::Closing => TrafficLight::Green,
            _ => TrafficLight::Red,
        }
    }

    /// Red, yellow and green lamp levels, exactly one of them on.
    pub const fn lamps(&self) -> (bool, bool, bool) {
        match self {
            TrafficLight::Red => (true, false, false),
            TrafficLight::Yellow => (false, true, false),
            TrafficLight::Green => (false, false, true),
        }
    }
}
