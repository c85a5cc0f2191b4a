//! Hardware abstraction traits for the sensor/actuator boundary and the clock.
//!
//! This module defines the interfaces that allow rs-gatekeeper to run on
//! different platforms (ESP32, desktop mocks, simulators).
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`GateInputs`] | Reads every binary input once per cycle |
//! | [`GateOutputs`] | Writes every actuator once per cycle |
//! | [`Clock`] | Wrapping millisecond time source |
//!
//! The controller never touches a pin directly. Each cycle the runner takes
//! one [`InputSnapshot`], the state machines compute one [`OutputFrame`], and
//! the runner writes it back. Every signal is therefore read and written at
//! most once per cycle.
//!
//! # Example
//!
//! ```rust
//! use rs_gatekeeper::traits::{GateInputs, InputSnapshot};
//! use rs_gatekeeper::hal::MockInputs;
//!
//! let mut inputs = MockInputs::new();
//! inputs.snapshot.closed_limit = true;
//!
//! let snapshot = inputs.read().unwrap();
//! assert!(snapshot.closed_limit);
//! assert!(!snapshot.open_limit);
//! ```

/// Levels of every binary input, sampled once at the start of a cycle.
///
/// All fields are logical: `true` means *active* (switch made, button held,
/// beam interrupted), regardless of the electrical polarity of the pin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputSnapshot {
    /// Closed-position limit switch.
    pub closed_limit: bool,
    /// Open-position limit switch.
    pub open_limit: bool,
    /// Obstacle sensor (normally-closed loop, active = obstructed).
    pub obstacle: bool,
    /// Physical push button.
    pub manual_button: bool,
    /// Remote-control receiver output.
    pub remote: bool,
    /// Programming (configuration) button.
    pub program_button: bool,
}

impl InputSnapshot {
    /// Snapshot with the closed limit switch active and nothing else.
    pub const fn closed() -> Self {
        Self {
            closed_limit: true,
            open_limit: false,
            obstacle: false,
            manual_button: false,
            remote: false,
            program_button: false,
        }
    }

    /// Snapshot with the open limit switch active and nothing else.
    pub const fn open() -> Self {
        Self {
            closed_limit: false,
            open_limit: true,
            obstacle: false,
            manual_button: false,
            remote: false,
            program_button: false,
        }
    }
}

/// Levels of every actuator, computed once per cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputFrame {
    /// Gate drive relay.
    pub relay: bool,
    /// Alarm siren.
    pub siren: bool,
    /// Feedback buzzer.
    pub buzzer: bool,
    /// Red traffic lamp.
    pub red: bool,
    /// Yellow traffic lamp.
    pub yellow: bool,
    /// Green traffic lamp.
    pub green: bool,
    /// Status heartbeat LED.
    pub heartbeat_led: bool,
    /// Configuration-menu LED.
    pub config_led: bool,
}

impl OutputFrame {
    /// Frame written when the cycle cannot run normally.
    ///
    /// Relay released, siren and buzzer silent, traffic indicator red.
    pub const fn fail_safe() -> Self {
        Self {
            relay: false,
            siren: false,
            buzzer: false,
            red: true,
            yellow: false,
            green: false,
            heartbeat_led: false,
            config_led: false,
        }
    }
}

/// Reads the full set of binary inputs.
///
/// Implementations translate pin polarity into logical levels: limit
/// switches and buttons are usually active-low with pull-ups, while the
/// obstacle loop reads high when the beam is cut.
pub trait GateInputs {
    /// Error type for input reads.
    type Error;

    /// Sample every input once.
    fn read(&mut self) -> Result<InputSnapshot, Self::Error>;
}

/// Drives the full set of actuators.
pub trait GateOutputs {
    /// Error type for output writes.
    type Error;

    /// Apply a complete output frame.
    fn write(&mut self, frame: &OutputFrame) -> Result<(), Self::Error>;

    /// Convenience method to put every actuator into its safe state.
    fn write_fail_safe(&mut self) -> Result<(), Self::Error> {
        self.write(&OutputFrame::fail_safe())
    }
}

/// Fault classes the controller can report.
///
/// None of them stop the control loop; they are surfaced through the gate
/// and security states and through the event log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FaultKind {
    /// Both limit switches active beyond the confirmation window.
    ///
    /// Clears itself once the switches disagree correctly.
    SensorConflict,

    /// The gate moved for longer than the configured maximum.
    ///
    /// Latched until a limit switch resolves the position.
    MotionTimeout,

    /// The closed switch was lost while the gate was stably closed.
    SecurityTamper,

    /// A pulse was authorized while the gate was in a fault state.
    CommandOverride,
}

impl FaultKind {
    /// Returns the fault as a lowercase string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            FaultKind::SensorConflict => "sensor_conflict",
            FaultKind::MotionTimeout => "motion_timeout",
            FaultKind::SecurityTamper => "security_tamper",
            FaultKind::CommandOverride => "command_override",
        }
    }
}

/// Time source trait for `no_std` compatibility.
///
/// Provides a free-running millisecond counter. The counter is allowed to
/// wrap at `u32::MAX`; all consumers use wrapping subtraction.
///
/// # Example
///
/// ```rust
/// use rs_gatekeeper::traits::Clock;
/// use rs_gatekeeper::hal::MockClock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance(100);
/// assert_eq!(clock.now_ms(), 100);
/// ```
pub trait Clock {
    /// Returns current time in milliseconds since an arbitrary epoch.
    fn now_ms(&self) -> u32;
}
