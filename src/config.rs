//! Shared configuration system for desktop and ESP32.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`.
//!
//! # Example
//!
//! ```rust
//! use rs_gatekeeper::config::{Config, TimingConfig, WebConfig};
//!
//! // Use defaults
//! let config = Config::default();
//!
//! // Or customize
//! let config = Config::default()
//!     .with_timing(TimingConfig::default().with_pulse_ms(800))
//!     .with_web(WebConfig::default().with_port(3000));
//! assert_eq!(config.timing.pulse_ms, 800);
//! ```

use heapless::String as HString;

/// Maximum length for short config strings (hostnames, SSIDs, names)
pub const MAX_SHORT_STRING: usize = 64;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

// ============================================================================
// Helper for creating heapless strings
// ============================================================================

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    let take = s.len().min(MAX_SHORT_STRING);
    // Find valid UTF-8 boundary
    let valid_end = s
        .char_indices()
        .take_while(|(i, c)| i + c.len_utf8() <= take)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Control-loop thresholds
    pub timing: TimingConfig,
    /// WiFi connection configuration
    pub wifi: WifiConfig,
    /// Web admin configuration
    pub web: WebConfig,
    /// Device identification
    pub device: DeviceConfig,
}

impl Config {
    /// Set timing configuration
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Set WiFi configuration
    pub fn with_wifi(mut self, wifi: WifiConfig) -> Self {
        self.wifi = wifi;
        self
    }

    /// Set web configuration
    pub fn with_web(mut self, web: WebConfig) -> Self {
        self.web = web;
        self
    }

    /// Set device configuration
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }
}

// ============================================================================
// Timing Config
// ============================================================================

/// Hold thresholds for the four programming-button levels, in milliseconds.
pub const PROGRAM_LEVEL_MS: [u32; 4] = [1_000, 5_000, 10_000, 15_000];

/// Every threshold the state machines compare elapsed time against.
///
/// All values are milliseconds. They are fixed for the lifetime of a
/// controller; nothing here is persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingConfig {
    /// Main loop period
    pub cycle_interval_ms: u32,
    /// How long the drive relay is held per pulse
    pub pulse_ms: u32,
    /// Minimum spacing between the end of one pulse and the next
    pub min_pulse_spacing_ms: u32,
    /// Longest allowed travel before declaring a mechanical failure
    pub max_motion_ms: u32,
    /// Both limit switches must agree this long before a sensor error
    pub sensor_conflict_ms: u32,
    /// An authorized command this recent legitimizes Closed -> Opening
    pub command_window_ms: u32,
    /// Dwell in Closed before the gate counts as stably closed
    pub stable_closed_ms: u32,
    /// Closed switch missing this long while armed triggers sabotage
    pub tamper_ms: u32,
    /// Button presses shorter than this are ignored
    pub debounce_ms: u32,
    /// Physical button hold that latches panic
    pub panic_hold_ms: u32,
    /// Siren on phase
    pub siren_on_ms: u32,
    /// Siren pause phase, also the latent hold duration
    pub siren_off_ms: u32,
    /// Fault-override chirp length
    pub error_beep_ms: u32,
    /// How long an obstacle stays flagged on the display
    pub obstacle_indicator_ms: u32,
    /// Heartbeat LED toggle period
    pub heartbeat_ms: u32,
    /// Buzzer half period (on or off time of one beep)
    pub buzzer_half_period_ms: u32,
    /// How long learn mode stays open
    pub learn_window_ms: u32,
    /// Programming-button hold thresholds for levels 1..4
    pub program_levels_ms: [u32; 4],
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            cycle_interval_ms: 10,
            pulse_ms: 500,
            min_pulse_spacing_ms: 1_500,
            max_motion_ms: 30_000,
            sensor_conflict_ms: 200,
            command_window_ms: 500,
            stable_closed_ms: 5_000,
            tamper_ms: 4_000,
            debounce_ms: 50,
            panic_hold_ms: 3_000,
            siren_on_ms: 10_000,
            siren_off_ms: 5_000,
            error_beep_ms: 300,
            obstacle_indicator_ms: 5_000,
            heartbeat_ms: 1_000,
            buzzer_half_period_ms: 120,
            learn_window_ms: 30_000,
            program_levels_ms: PROGRAM_LEVEL_MS,
        }
    }
}

impl TimingConfig {
    /// Set the main loop period
    pub fn with_cycle_interval_ms(mut self, ms: u32) -> Self {
        self.cycle_interval_ms = ms;
        self
    }

    /// Set the relay pulse length
    pub fn with_pulse_ms(mut self, ms: u32) -> Self {
        self.pulse_ms = ms;
        self
    }

    /// Set the minimum spacing between pulses
    pub fn with_min_pulse_spacing_ms(mut self, ms: u32) -> Self {
        self.min_pulse_spacing_ms = ms;
        self
    }

    /// Set the maximum travel time
    pub fn with_max_motion_ms(mut self, ms: u32) -> Self {
        self.max_motion_ms = ms;
        self
    }

    /// Set the button debounce floor
    pub fn with_debounce_ms(mut self, ms: u32) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Set the panic hold threshold
    pub fn with_panic_hold_ms(mut self, ms: u32) -> Self {
        self.panic_hold_ms = ms;
        self
    }

    /// Set the siren on/off phases
    pub fn with_siren_phases_ms(mut self, on_ms: u32, off_ms: u32) -> Self {
        self.siren_on_ms = on_ms;
        self.siren_off_ms = off_ms;
        self
    }

    /// Set the fault-override chirp length
    pub fn with_error_beep_ms(mut self, ms: u32) -> Self {
        self.error_beep_ms = ms;
        self
    }

    /// Set the learn mode window
    pub fn with_learn_window_ms(mut self, ms: u32) -> Self {
        self.learn_window_ms = ms;
        self
    }
}

// ============================================================================
// Web Config
// ============================================================================

/// Web admin configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WebConfig {
    /// Port to listen on
    pub port: u16,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
    /// Whether the admin interface is enabled
    pub enabled: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            cors_permissive: true,
            enabled: true,
        }
    }
}

impl WebConfig {
    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set CORS mode
    pub fn with_cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Enable or disable the admin interface
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

// ============================================================================
// WiFi Config
// ============================================================================

/// WiFi connection configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WifiConfig {
    /// WiFi network SSID
    pub ssid: ShortString,
    /// WiFi password
    pub password: ShortString,
    /// Whether WiFi is enabled
    pub enabled: bool,
    /// Delay between reconnect attempts while the link is down
    pub reconnect_interval_ms: u32,
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            ssid: ShortString::new(),
            password: ShortString::new(),
            enabled: true,
            reconnect_interval_ms: 10_000,
        }
    }
}

impl WifiConfig {
    /// Set the SSID
    pub fn with_ssid(mut self, ssid: &str) -> Self {
        self.ssid = short_string(ssid);
        self
    }

    /// Set the password
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = short_string(password);
        self
    }

    /// Enable or disable WiFi
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the reconnect interval
    pub fn with_reconnect_interval_ms(mut self, ms: u32) -> Self {
        self.reconnect_interval_ms = ms;
        self
    }

    /// Check if WiFi credentials are configured
    pub fn is_configured(&self) -> bool {
        !self.ssid.is_empty()
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Device identification configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Human-readable device name (also the mDNS hostname)
    pub name: ShortString,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("rs-gatekeeper"),
        }
    }
}

impl DeviceConfig {
    /// Set the device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
