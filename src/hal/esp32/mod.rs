//! ESP32 hardware abstraction layer for the gate controller board.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32 (Xtensa dual-core 240MHz)
//! - **Relay**: Opto-isolated module driving the gate operator's pulse input
//! - **Inputs**: Two limit switches, NC obstacle loop, push button, remote
//!   receiver and programming button
//! - **Outputs**: Siren driver, buzzer, three-lamp traffic light, status LEDs
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments.

mod board;
mod clock;

pub use board::{take_board_io, Esp32Inputs, Esp32Outputs};
pub use clock::Esp32Clock;

#[cfg(feature = "wifi")]
mod wifi;
#[cfg(feature = "wifi")]
pub use wifi::Esp32Wifi;

#[cfg(feature = "esp32-http")]
mod http;
#[cfg(feature = "esp32-http")]
pub use http::Esp32HttpServer;

/// Pin assignments for the controller board.
pub mod pins {
    // =========================================================================
    // Inputs (pull-ups, active low unless noted)
    // =========================================================================

    /// Closed-position limit switch
    pub const LIMIT_CLOSED: i32 = 32;

    /// Open-position limit switch
    pub const LIMIT_OPEN: i32 = 33;

    /// Obstacle sensor loop (NC, reads high when obstructed)
    pub const OBSTACLE: i32 = 13;

    /// Physical push button
    pub const BUTTON_MANUAL: i32 = 25;

    /// Remote receiver output
    pub const REMOTE_RX: i32 = 26;

    /// Programming button
    pub const BUTTON_PROGRAM: i32 = 27;

    // =========================================================================
    // Outputs (active high)
    // =========================================================================

    /// Gate pulse relay
    pub const RELAY: i32 = 23;

    /// Siren driver
    pub const SIREN: i32 = 19;

    /// Feedback buzzer
    pub const BUZZER: i32 = 18;

    /// Traffic light red lamp
    pub const LAMP_RED: i32 = 16;

    /// Traffic light yellow lamp
    pub const LAMP_YELLOW: i32 = 17;

    /// Traffic light green lamp
    pub const LAMP_GREEN: i32 = 4;

    /// Heartbeat LED
    pub const LED_HEARTBEAT: i32 = 2;

    /// Configuration LED
    pub const LED_CONFIG: i32 = 22;
}
