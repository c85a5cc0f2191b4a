//! Gate controller that ties every state machine together.
//!
//! This module provides [`GateController`], which owns one instance of each
//! component and runs them once per cycle in a fixed order:
//!
//! 1. Command inputs ([`InputDecoder`])
//! 2. Obstacle interlock ([`BarrierMonitor`])
//! 3. Gate position ([`GateTracker`])
//! 4. Security ([`SecurityMonitor`])
//! 5. Relay pulse ([`PulseController`])
//! 6. Siren ([`SirenController`])
//! 7. Traffic indicator ([`TrafficLight`])
//! 8. Heartbeat, configuration LED and buzzer
//!
//! Components report what they want done as [`Effect`]s. The controller
//! applies them right after the component that emitted them, so a later
//! component in the same cycle already sees the result. Effects that concern
//! the outside world are queued as [`Notice`]s; the runner drains them with
//! [`GateController::take_notices`].
//!
//! # Example
//!
//! ```rust
//! use rs_gatekeeper::{GateController, GateState, InputSnapshot, TimingConfig};
//!
//! let mut controller = GateController::new(TimingConfig::default());
//! controller.begin();
//!
//! let frame = controller.tick(&InputSnapshot::closed(), 0);
//! assert_eq!(controller.status(0).gate, GateState::Closed);
//! assert!(frame.green);
//!
//! // Press and release the button
//! let pressed = InputSnapshot { manual_button: true, ..InputSnapshot::closed() };
//! controller.tick(&pressed, 100);
//! let frame = controller.tick(&InputSnapshot::closed(), 200);
//! assert!(frame.relay);
//! ```

use heapless::Vec as HVec;

use crate::barrier::BarrierMonitor;
use crate::config::TimingConfig;
use crate::effects::{Actor, Effect, Effects, GateEvent, Notice};
use crate::feedback::{BeepSequencer, ConfigLed, ConfigLedMode, Heartbeat};
use crate::gate::{GateState, GateTracker};
use crate::input::InputDecoder;
use crate::pulse::{PulseController, PulseRequest};
use crate::security::{SecurityInputs, SecurityMonitor, SecurityState};
use crate::siren::{SirenController, SirenState};
use crate::traffic::TrafficLight;
use crate::traits::{AdminCommand, FaultKind, InputSnapshot, OutputFrame};

/// Maximum number of notices held between two drains.
pub const MAX_NOTICES: usize = 32;

/// The complete gate controller.
///
/// Owns every state machine and the control flags. It performs no I/O; see
/// [`GateRunner`](crate::GateRunner) for the loop that binds it to hardware.
pub struct GateController {
    timing: TimingConfig,
    initialized: bool,
    maintenance: bool,
    emergency: bool,
    actor: Actor,
    input: InputDecoder,
    barrier: BarrierMonitor,
    gate: GateTracker,
    security: SecurityMonitor,
    pulse: PulseController,
    siren: SirenController,
    heartbeat: Heartbeat,
    config_led: ConfigLed,
    beeper: BeepSequencer,
    relay: bool,
    effects: Effects,
    notices: HVec<Notice, MAX_NOTICES>,
}

impl GateController {
    /// Create a controller with safe defaults: gate `Unknown`, security
    /// `Normal`, siren off, no pulse requested.
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            initialized: false,
            maintenance: false,
            emergency: false,
            actor: Actor::System,
            input: InputDecoder::new(&timing),
            barrier: BarrierMonitor::new(),
            gate: GateTracker::new(&timing),
            security: SecurityMonitor::new(&timing),
            pulse: PulseController::new(&timing),
            siren: SirenController::new(&timing),
            heartbeat: Heartbeat::new(timing.heartbeat_ms),
            config_led: ConfigLed::new(timing.learn_window_ms),
            beeper: BeepSequencer::new(timing.buzzer_half_period_ms),
            relay: false,
            effects: Effects::new(),
            notices: HVec::new(),
            timing,
        }
    }

    /// Mark the system initialized. Security evaluation and the traffic
    /// indicator stay in their safe state until this is called.
    pub fn begin(&mut self) {
        log::info!("controller: initialized");
        self.initialized = true;
    }

    /// Run one control cycle and return the output frame.
    pub fn tick(&mut self, inputs: &InputSnapshot, now: u32) -> OutputFrame {
        self.input.update(
            inputs,
            self.emergency,
            self.security.is_panic_latched(),
            now,
            &mut self.effects,
        );
        self.apply_effects(now);

        self.barrier
            .update(inputs.obstacle, self.gate.state(), now, &mut self.effects);
        self.apply_effects(now);

        self.gate.update(
            inputs.closed_limit,
            inputs.open_limit,
            &self.pulse.last_authorized(),
            now,
            &mut self.effects,
        );
        self.apply_effects(now);

        let security_inputs = SecurityInputs {
            initialized: self.initialized,
            gate: self.gate.state(),
            armed: self.gate.was_stably_closed(),
            closed_limit: inputs.closed_limit,
            maintenance: self.maintenance,
            emergency: self.emergency,
        };
        self.security
            .update(&security_inputs, now, &mut self.effects);
        self.apply_effects(now);

        self.relay = self.pulse.update(
            self.gate.state(),
            inputs.obstacle,
            self.actor,
            now,
            &mut self.effects,
        );
        self.apply_effects(now);

        let siren = self.siren.update(
            self.security.state(),
            self.security.is_panic_latched(),
            self.maintenance,
            now,
        );

        let (red, yellow, green) =
            TrafficLight::for_gate(self.initialized, self.gate.state()).lamps();

        let heartbeat_led = self.heartbeat.update(now);

        let config_led = self.config_led.update(now, &mut self.effects);
        self.apply_effects(now);

        let buzzer = self.beeper.update(now);

        OutputFrame {
            relay: self.relay,
            siren,
            buzzer,
            red,
            yellow,
            green,
            heartbeat_led,
            config_led,
        }
    }

    /// Apply a command from the administration interface.
    pub fn apply_admin(&mut self, command: AdminCommand, now: u32) {
        log::info!("controller: admin command {:?}", command);
        match command {
            AdminCommand::RequestPulse => self.pulse.request(PulseRequest::Normal),
            AdminCommand::SilenceAlarm => {
                self.security.silence(&mut self.effects);
            }
            AdminCommand::SetMaintenance(enabled) => {
                if enabled != self.maintenance {
                    self.maintenance = enabled;
                    let event = if enabled {
                        GateEvent::MaintenanceEntered
                    } else {
                        GateEvent::MaintenanceExited
                    };
                    self.effects.log(event, Some(Actor::WebAdmin));
                }
            }
            AdminCommand::SetEmergency(active) => {
                if active != self.emergency {
                    self.emergency = active;
                    let event = if active {
                        GateEvent::EmergencyRaised
                    } else {
                        GateEvent::EmergencyCleared
                    };
                    self.effects.log(event, Some(Actor::WebAdmin));
                }
            }
        }
        self.apply_effects(now);
    }

    /// Take every queued notice, oldest first.
    pub fn take_notices(&mut self) -> HVec<Notice, MAX_NOTICES> {
        core::mem::take(&mut self.notices)
    }

    /// Snapshot for display.
    pub fn status(&self, now: u32) -> GateStatus {
        let obstacle_recent = self
            .barrier
            .seen_within(now, self.timing.obstacle_indicator_ms);
        GateStatus {
            gate: self.gate.state(),
            previous_gate: self.gate.previous(),
            security: self.security.display_state(self.gate.state(), obstacle_recent),
            siren: self.siren.state(),
            config_led: self.config_led.mode(),
            panic_latched: self.security.is_panic_latched(),
            maintenance: self.maintenance,
            emergency: self.emergency,
            relay_active: self.relay,
            learn_mode: self.config_led.mode() == ConfigLedMode::Learn,
            stably_closed: self.gate.is_stably_closed(),
            actor: self.actor,
            obstacle_recent,
            initialized: self.initialized,
        }
    }

    /// Current gate state.
    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    /// Stored security state.
    pub fn security_state(&self) -> SecurityState {
        self.security.state()
    }

    /// Actor credited with the most recent command.
    pub fn actor(&self) -> Actor {
        self.actor
    }

    /// Returns true once [`begin`](Self::begin) has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Thresholds this controller was built with.
    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    fn apply_effects(&mut self, now: u32) {
        for effect in self.effects.take() {
            match effect {
                Effect::Log { event, actor } => {
                    let actor = actor.unwrap_or(self.actor);
                    log::info!("event: {} [{}]", event.message(), actor.as_str());
                    self.notify(Notice::Event { event, actor });
                }
                Effect::SetActor(actor) => self.actor = actor,
                Effect::RequestPulse(kind) => self.pulse.request(kind),
                Effect::LatchPanic => {
                    self.security.latch_panic();
                    self.siren.start_sounding(now);
                }
                Effect::ReleasePanic => {
                    self.security.release_panic();
                    self.siren.stop();
                }
                Effect::ErrorBeep => self.siren.request_error_beep(),
                Effect::RestartSiren => self.siren.start_sounding(now),
                Effect::Beep(count) => self.beeper.start(count, now),
                Effect::ConfigLed(mode) => self.config_led.set_mode(mode, now),
                Effect::ResetCredentials => self.notify(Notice::ResetCredentials),
                Effect::ResetStorage => self.notify(Notice::ResetStorage),
                Effect::FactoryReset => self.notify(Notice::FactoryReset),
            }
        }
    }

    fn notify(&mut self, notice: Notice) {
        if self.notices.push(notice).is_err() {
            log::warn!("notice queue full, dropping {:?}", notice);
        }
    }
}

/// Full state snapshot for UI/API.
///
/// Implements `serde::Serialize` when the `serde` feature is enabled.
///
/// # Example
///
/// ```rust
/// use rs_gatekeeper::{GateController, GateState, SecurityState, TimingConfig};
///
/// let controller = GateController::new(TimingConfig::default());
/// let status = controller.status(0);
/// assert_eq!(status.gate, GateState::Unknown);
/// assert_eq!(status.security, SecurityState::Normal);
/// assert!(status.fault().is_none());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GateStatus {
    /// Current gate state.
    pub gate: GateState,
    /// Gate state before the last change.
    pub previous_gate: GateState,
    /// Security state as shown to the operator.
    pub security: SecurityState,
    /// Siren state.
    pub siren: SirenState,
    /// Configuration LED pattern.
    pub config_led: ConfigLedMode,
    /// Panic latch.
    pub panic_latched: bool,
    /// Maintenance mode.
    pub maintenance: bool,
    /// Emergency condition.
    pub emergency: bool,
    /// Drive relay energized.
    pub relay_active: bool,
    /// Remote learn window open.
    pub learn_mode: bool,
    /// Gate currently stably closed.
    pub stably_closed: bool,
    /// Actor credited with the most recent command.
    pub actor: Actor,
    /// Obstacle seen within the indicator window.
    pub obstacle_recent: bool,
    /// Controller initialized.
    pub initialized: bool,
}

impl GateStatus {
    /// Fault currently reported by the gate or the alarm, if any.
    pub fn fault(&self) -> Option<FaultKind> {
        self.gate.fault().or(match self.security {
            SecurityState::Triggered | SecurityState::Latent if !self.panic_latched => {
                Some(FaultKind::SecurityTamper)
            }
            _ => None,
        })
    }
}
