//! Trait definitions for hardware abstraction and external collaborators.
//!
//! This module defines the core abstractions that allow rs-gatekeeper to:
//! - Run on different hardware (ESP32, desktop mock)
//! - Plug in different event logs, network stacks and admin front-ends
//!
//! # Submodules
//!
//! - `hardware`: Input snapshot, output frame, clock
//! - `services`: Event log, connectivity and administration interface
//!
//! # Hardware Abstraction
//!
//! - [`GateInputs`]: Once-per-cycle sampling of switches, sensors and buttons
//! - [`GateOutputs`]: Once-per-cycle write of relay, siren, buzzer and lamps
//! - [`Clock`]: Wrapping millisecond time source

pub mod hardware;
pub mod services;

pub use hardware::*;
pub use services::*;
