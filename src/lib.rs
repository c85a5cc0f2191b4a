//! # rs-gatekeeper
//!
//! Control logic for an automated gate and barrier controller: limit-switch
//! tracking, relay pulse arbitration, button decoding, an obstacle interlock,
//! sabotage detection with a siren duty cycle, and traffic/status indicators.
//!
//! ## Features
//!
//! - **Hardware abstraction**: Once-per-cycle input snapshots and output frames
//! - **Wrap-safe timing**: Every timer runs on a wrapping `u32` millisecond clock
//! - **Safety policies**: Sensor-conflict and motion-timeout faults, panic latch,
//!   obstacle reopen, sabotage alarm
//! - **Programming button**: Four-level hold ladder for learn mode and resets
//! - **Web admin** (`web` feature): JSON status and commands over HTTP
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware and collaborator abstractions
//! - `timer`, `effects` - Timing and component intents
//! - `gate`, `pulse`, `barrier`, `input`, `security`, `siren`, `traffic`,
//!   `feedback` - The individual state machines
//! - `controller` - Runs every state machine once per cycle
//! - `runner` - Binds the controller to a clock, hardware and services
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_gatekeeper::{GateController, GateState, InputSnapshot, TimingConfig};
//!
//! let mut controller = GateController::new(TimingConfig::default());
//! controller.begin();
//!
//! // Gate resting on its open switch
//! controller.tick(&InputSnapshot::open(), 0);
//!
//! // Open switch released: the gate is closing
//! let frame = controller.tick(&InputSnapshot::default(), 10);
//! assert_eq!(controller.gate_state(), GateState::Closing);
//! assert!(frame.green);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Obstacle interlock that reopens a closing gate.
pub mod barrier;
/// Shared configuration system for desktop and ESP32.
pub mod config;
/// Main controller that runs every state machine once per cycle.
pub mod controller;
/// Intents emitted by state machines and applied by the controller.
pub mod effects;
/// Heartbeat, configuration LED and buzzer patterns.
pub mod feedback;
/// Gate position tracking.
pub mod gate;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Manual, remote and programming button decoding.
pub mod input;
/// Drive relay pulse arbitration.
pub mod pulse;
/// Fixed-rate loop that binds the controller to hardware.
pub mod runner;
/// Sabotage detection and alarm lifecycle.
pub mod security;
/// Siren duty cycle.
pub mod siren;
/// Wrap-safe millisecond timers.
pub mod timer;
/// Traffic indicator encoding.
pub mod traffic;
/// Core traits for hardware abstraction and external collaborators.
pub mod traits;

/// Request types for the HTTP admin API (serde-based).
#[cfg(feature = "serde")]
pub mod messages;

/// Admin mailbox and web service (feature-gated).
#[cfg(feature = "std")]
pub mod services;

// Re-exports for convenience
pub use barrier::BarrierMonitor;
pub use controller::{GateController, GateStatus};
pub use effects::{Actor, Effect, Effects, GateEvent, Notice};
pub use feedback::{BeepSequencer, ConfigLed, ConfigLedMode, Heartbeat};
pub use gate::{GateState, GateTracker};
pub use input::InputDecoder;
pub use pulse::{PulseController, PulseRequest};
pub use runner::{CycleError, GateRunner};
pub use security::{SecurityInputs, SecurityMonitor, SecurityState};
pub use siren::{SirenController, SirenState};
pub use timer::Timer;
pub use traffic::TrafficLight;
pub use traits::{
    // Services
    AdminCommand,
    AdminInterface,
    // Hardware
    Clock,
    Connectivity,
    EventLog,
    FaultKind,
    GateInputs,
    GateOutputs,
    InputSnapshot,
    Offline,
    OutputFrame,
};

// Config re-exports
pub use config::{Config, DeviceConfig, TimingConfig, WebConfig, WifiConfig};

// Message re-exports (for the HTTP API)
#[cfg(feature = "serde")]
pub use messages::SetFlagRequest;
