//! Side-effect intents produced by the state machines.
//!
//! Components never perform I/O or reach into each other. A transition
//! pushes [`Effect`]s into an [`Effects`] buffer and the
//! [`GateController`](crate::GateController) applies them, in order, right
//! after the component that produced them. Effects that leave the controller
//! (event records, credential and storage resets) become [`Notice`]s for the
//! runner to hand to the collaborators.
//!
//! ```rust
//! use rs_gatekeeper::{Actor, Effect, Effects, GateEvent};
//!
//! let mut effects = Effects::new();
//! effects.log(GateEvent::ObstacleDetected, Some(Actor::Sensors));
//! effects.push(Effect::SetActor(Actor::Sensors));
//!
//! assert_eq!(effects.len(), 2);
//! assert!(effects.contains(&Effect::SetActor(Actor::Sensors)));
//! ```

use heapless::Vec as HVec;

use crate::feedback::ConfigLedMode;
use crate::pulse::PulseRequest;
use crate::traits::FaultKind;

/// Maximum number of effects a single component may emit in one cycle.
pub const MAX_EFFECTS: usize = 16;

/// Who authorized the most recent command.
///
/// Only used to attribute event records; it never affects control decisions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Actor {
    /// The controller itself.
    #[default]
    System,
    /// The physical push button.
    PhysicalButton,
    /// The remote-control receiver.
    RemoteControl,
    /// The obstacle sensor interlock.
    Sensors,
    /// The administration interface.
    WebAdmin,
}

impl Actor {
    /// Human-readable label used in event records.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Actor::System => "System",
            Actor::PhysicalButton => "Physical Button",
            Actor::RemoteControl => "RF Remote",
            Actor::Sensors => "Sensors",
            Actor::WebAdmin => "Web Admin",
        }
    }
}

/// Events worth a line in the persistent log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GateEvent {
    /// Motion exceeded the maximum duration.
    MotionTimeout,
    /// A pulse was authorized while the gate was faulted.
    FaultOverride(FaultKind),
    /// A pulse request arrived with no local actor attached.
    RemoteCommand,
    /// Panic latched by a long button hold.
    PanicAlarm,
    /// Panic released by a subsequent press.
    PanicCleared,
    /// Remote learn mode started.
    LearnStarted,
    /// Remote learn mode window elapsed.
    LearnEnded,
    /// Network credentials erased.
    CredentialsReset,
    /// Stored data erased.
    StorageReset,
    /// Full factory reset.
    FactoryReset,
    /// Obstacle while closing; reopening.
    ObstacleDetected,
    /// Closed switch lost while stably closed.
    SabotageAlarm,
    /// Alarm silenced, latent hold started.
    AlarmSilenced,
    /// Condition resolved during the latent hold.
    AlarmNormalized,
    /// Condition persisted through the latent hold.
    AlarmRetriggered,
    /// Maintenance mode entered.
    MaintenanceEntered,
    /// Maintenance mode left.
    MaintenanceExited,
    /// Emergency condition raised.
    EmergencyRaised,
    /// Emergency condition cleared.
    EmergencyCleared,
}

impl GateEvent {
    /// Message text written to the event log.
    pub const fn message(&self) -> &'static str {
        match self {
            GateEvent::MotionTimeout => "FAULT: motion time exceeded",
            GateEvent::FaultOverride(FaultKind::SensorConflict) => "Moved with SENSOR ERROR",
            GateEvent::FaultOverride(_) => "Moved with MECHANICAL FAILURE",
            GateEvent::RemoteCommand => "Remote command",
            GateEvent::PanicAlarm => "PANIC alarm",
            GateEvent::PanicCleared => "Panic alarm cleared",
            GateEvent::LearnStarted => "LEARN mode started",
            GateEvent::LearnEnded => "LEARN mode ended",
            GateEvent::CredentialsReset => "WiFi reset executed",
            GateEvent::StorageReset => "Database reset executed",
            GateEvent::FactoryReset => "Factory reset executed",
            GateEvent::ObstacleDetected => "Barrier activated",
            GateEvent::SabotageAlarm => "Alarm: closed switch sabotage",
            GateEvent::AlarmSilenced => "Alarm silenced",
            GateEvent::AlarmNormalized => "Alarm normalized",
            GateEvent::AlarmRetriggered => "Alarm re-triggered by persistent fault",
            GateEvent::MaintenanceEntered => "Maintenance mode enabled",
            GateEvent::MaintenanceExited => "Maintenance mode disabled",
            GateEvent::EmergencyRaised => "Emergency active",
            GateEvent::EmergencyCleared => "Emergency cleared",
        }
    }
}

/// An intent emitted by a component transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Record an event. `None` attributes it to the tracked actor.
    Log {
        /// What happened.
        event: GateEvent,
        /// Explicit attribution, if any.
        actor: Option<Actor>,
    },
    /// Replace the tracked actor.
    SetActor(Actor),
    /// Ask the pulse controller for a relay pulse.
    RequestPulse(PulseRequest),
    /// Latch panic: security triggered, siren sounding.
    LatchPanic,
    /// Release a latched panic.
    ReleasePanic,
    /// Short siren chirp for a fault override.
    ErrorBeep,
    /// Restart the siren duty cycle from its on phase.
    RestartSiren,
    /// Sound the feedback buzzer this many times.
    Beep(u8),
    /// Switch the configuration LED pattern.
    ConfigLed(ConfigLedMode),
    /// Erase network credentials.
    ResetCredentials,
    /// Erase stored data.
    ResetStorage,
    /// Erase credentials and stored data.
    FactoryReset,
}

/// Effects that leave the controller for the collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    /// Record an event with a resolved actor.
    Event {
        /// What happened.
        event: GateEvent,
        /// Who it is attributed to.
        actor: Actor,
    },
    /// Erase network credentials.
    ResetCredentials,
    /// Erase stored data.
    ResetStorage,
    /// Erase credentials and stored data.
    FactoryReset,
}

/// Fixed-capacity effect buffer for one component pass.
#[derive(Debug, Default)]
pub struct Effects {
    items: HVec<Effect, MAX_EFFECTS>,
}

impl Effects {
    /// Creates an empty buffer.
    pub const fn new() -> Self {
        Self { items: HVec::new() }
    }

    /// Queue an effect. Overflow is logged and the effect dropped.
    pub fn push(&mut self, effect: Effect) {
        if self.items.push(effect).is_err() {
            log::warn!("effect buffer full, dropping {:?}", effect);
        }
    }

    /// Queue a log record.
    pub fn log(&mut self, event: GateEvent, actor: Option<Actor>) {
        self.push(Effect::Log { event, actor });
    }

    /// Take every queued effect, leaving the buffer empty.
    pub fn take(&mut self) -> HVec<Effect, MAX_EFFECTS> {
        core::mem::take(&mut self.items)
    }

    /// Queued effects in emission order.
    pub fn as_slice(&self) -> &[Effect] {
        &self.items
    }

    /// Returns true if `effect` is queued.
    pub fn contains(&self, effect: &Effect) -> bool {
        self.items.contains(effect)
    }

    /// Returns true if a log record for `event` is queued.
    pub fn logged(&self, event: GateEvent) -> bool {
        self.items
            .iter()
            .any(|e| matches!(e, Effect::Log { event: logged, .. } if *logged == event))
    }

    /// Number of queued effects.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_default_is_system() {
        assert_eq!(Actor::default(), Actor::System);
    }

    #[test]
    fn actor_labels() {
        assert_eq!(Actor::System.as_str(), "System");
        assert_eq!(Actor::PhysicalButton.as_str(), "Physical Button");
        assert_eq!(Actor::RemoteControl.as_str(), "RF Remote");
        assert_eq!(Actor::Sensors.as_str(), "Sensors");
        assert_eq!(Actor::WebAdmin.as_str(), "Web Admin");
    }

    #[test]
    fn fault_override_messages_name_the_fault() {
        assert_eq!(
            GateEvent::FaultOverride(FaultKind::SensorConflict).message(),
            "Moved with SENSOR ERROR"
        );
        assert_eq!(
            GateEvent::FaultOverride(FaultKind::MotionTimeout).message(),
            "Moved with MECHANICAL FAILURE"
        );
    }

    #[test]
    fn take_empties_buffer_in_order() {
        let mut effects = Effects::new();
        effects.push(Effect::Beep(1));
        effects.push(Effect::ErrorBeep);

        let taken = effects.take();
        assert_eq!(taken.as_slice(), &[Effect::Beep(1), Effect::ErrorBeep]);
        assert!(effects.is_empty());
    }

    #[test]
    fn overflow_drops_without_panicking() {
        let mut effects = Effects::new();
        for _ in 0..MAX_EFFECTS + 4 {
            effects.push(Effect::Beep(1));
        }
        assert_eq!(effects.len(), MAX_EFFECTS);
    }

    #[test]
    fn logged_matches_event() {
        let mut effects = Effects::new();
        effects.log(GateEvent::SabotageAlarm, None);
        assert!(effects.logged(GateEvent::SabotageAlarm));
        assert!(!effects.logged(GateEvent::AlarmNormalized));
    }
}
