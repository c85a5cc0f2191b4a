//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `digital`: Generic adapters over `embedded-hal` digital pins
//! - `logger`: Event log forwarding to the `log` facade
//! - `esp32`: ESP32 gate controller board (requires `esp32` feature)

pub mod digital;
pub mod logger;
pub mod mock;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use digital::{DigitalInputs, DigitalOutputs};
pub use logger::LogEventLog;
pub use mock::*;

#[cfg(feature = "esp32")]
pub use esp32::*;
