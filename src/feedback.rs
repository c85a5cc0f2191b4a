//! Visual and audible feedback encoders.
//!
//! Three small generators that turn controller state into blink and beep
//! patterns:
//!
//! - [`Heartbeat`]: status LED toggling at a fixed period
//! - [`ConfigLed`]: configuration-menu LED, one pattern per [`ConfigLedMode`]
//! - [`BeepSequencer`]: plays N short buzzer beeps
//!
//! All three are driven by wrapping millisecond time and never block.

use crate::effects::{Actor, Effects, GateEvent};
use crate::timer::Timer;

// ============================================================================
// Heartbeat
// ============================================================================

/// Free-running status LED.
#[derive(Debug)]
pub struct Heartbeat {
    on: bool,
    last: Timer,
    period_ms: u32,
}

impl Heartbeat {
    /// Creates a heartbeat that toggles every `period_ms`.
    pub fn new(period_ms: u32) -> Self {
        Self {
            on: false,
            last: Timer::unset(),
            period_ms,
        }
    }

    /// Run one cycle. Returns the LED level.
    pub fn update(&mut self, now: u32) -> bool {
        self.last.start_if_unset(now);
        if self.last.has_elapsed(now, self.period_ms) {
            self.on = !self.on;
            self.last.start(now);
        }
        self.on
    }
}

// ============================================================================
// Config LED
// ============================================================================

/// Blink pattern shown on the configuration LED.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConfigLedMode {
    /// LED off.
    #[default]
    Idle,
    /// Programming hold reached level 1 (one blink per group).
    Confirm1s,
    /// Programming hold reached level 2 (two blinks per group).
    Confirm5s,
    /// Programming hold reached level 3 (three blinks per group).
    Confirm10s,
    /// Programming hold reached level 4 (four blinks per group).
    Confirm15s,
    /// Remote learn window open.
    Learn,
    /// Short fast flash after a reset command.
    ExitFlash,
}

impl ConfigLedMode {
    /// Confirmation pattern for programming level `level` (1..=4).
    pub const fn confirm(level: u8) -> Option<Self> {
        match level {
            1 => Some(ConfigLedMode::Confirm1s),
            2 => Some(ConfigLedMode::Confirm5s),
            3 => Some(ConfigLedMode::Confirm10s),
            4 => Some(ConfigLedMode::Confirm15s),
            _ => None,
        }
    }

    /// Number of blinks per group for confirmation patterns.
    pub const fn blinks(&self) -> u32 {
        match self {
            ConfigLedMode::Confirm1s => 1,
            ConfigLedMode::Confirm5s => 2,
            ConfigLedMode::Confirm10s => 3,
            ConfigLedMode::Confirm15s => 4,
            _ => 0,
        }
    }

    /// Returns the mode as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigLedMode::Idle => "idle",
            ConfigLedMode::Confirm1s => "confirm_1s",
            ConfigLedMode::Confirm5s => "confirm_5s",
            ConfigLedMode::Confirm10s => "confirm_10s",
            ConfigLedMode::Confirm15s => "confirm_15s",
            ConfigLedMode::Learn => "learn",
            ConfigLedMode::ExitFlash => "exit_flash",
        }
    }
}

const BLINK_MS: u32 = 150;
const GROUP_GAP_MS: u32 = 700;
const LEARN_TOGGLE_MS: u32 = 500;
const FLASH_TOGGLE_MS: u32 = 100;
const FLASH_TOTAL_MS: u32 = 1_500;

/// Configuration-menu LED pattern generator.
///
/// Patterns are computed from the time since the mode was entered, so a
/// pattern always starts with the LED on.
#[derive(Debug)]
pub struct ConfigLed {
    mode: ConfigLedMode,
    since: Timer,
    learn_window_ms: u32,
}

impl ConfigLed {
    /// Creates an idle LED. Learn mode closes after `learn_window_ms`.
    pub fn new(learn_window_ms: u32) -> Self {
        Self {
            mode: ConfigLedMode::Idle,
            since: Timer::unset(),
            learn_window_ms,
        }
    }

    /// Switch pattern, restarting it from the beginning.
    pub fn set_mode(&mut self, mode: ConfigLedMode, now: u32) {
        log::debug!("config led: {} -> {}", self.mode.as_str(), mode.as_str());
        self.mode = mode;
        self.since.start(now);
    }

    /// Current pattern.
    pub fn mode(&self) -> ConfigLedMode {
        self.mode
    }

    /// Run one cycle. Returns the LED level.
    pub fn update(&mut self, now: u32, effects: &mut Effects) -> bool {
        let elapsed = self.since.elapsed(now).unwrap_or(0);

        match self.mode {
            ConfigLedMode::Idle => false,
            ConfigLedMode::Learn => {
                if elapsed >= self.learn_window_ms {
                    self.mode = ConfigLedMode::Idle;
                    effects.log(GateEvent::LearnEnded, Some(Actor::System));
                    false
                } else {
                    (elapsed / LEARN_TOGGLE_MS) % 2 == 0
                }
            }
            ConfigLedMode::ExitFlash => {
                if elapsed >= FLASH_TOTAL_MS {
                    self.mode = ConfigLedMode::Idle;
                    false
                } else {
                    (elapsed / FLASH_TOGGLE_MS) % 2 == 0
                }
            }
            confirm => {
                let burst = confirm.blinks() * BLINK_MS * 2;
                let t = elapsed % (burst + GROUP_GAP_MS);
                t < burst && (t / BLINK_MS) % 2 == 0
            }
        }
    }
}

// ============================================================================
// Beep Sequencer
// ============================================================================

/// Plays a short run of buzzer beeps.
///
/// # Example
///
/// ```rust
/// use rs_gatekeeper::BeepSequencer;
///
/// let mut beeper = BeepSequencer::new(120);
/// beeper.start(2, 0);
///
/// assert!(beeper.update(120));  // first beep on
/// assert!(!beeper.update(240)); // off
/// assert!(beeper.update(360));  // second beep on
/// assert!(!beeper.update(480)); // done
/// assert!(!beeper.is_active());
/// ```
#[derive(Debug)]
pub struct BeepSequencer {
    active: bool,
    on: bool,
    repeats: u8,
    count: u8,
    last: Timer,
    half_period_ms: u32,
}

impl BeepSequencer {
    /// Creates an idle sequencer toggling every `half_period_ms`.
    pub fn new(half_period_ms: u32) -> Self {
        Self {
            active: false,
            on: false,
            repeats: 0,
            count: 0,
            last: Timer::unset(),
            half_period_ms,
        }
    }

    /// Start a run of `count` beeps, replacing any run in progress.
    pub fn start(&mut self, count: u8, now: u32) {
        if count == 0 {
            return;
        }
        self.active = true;
        self.on = false;
        self.repeats = count;
        self.count = 0;
        self.last.start(now);
    }

    /// Returns true while a run is in progress.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Run one cycle. Returns the buzzer level.
    pub fn update(&mut self, now: u32) -> bool {
        if !self.active || !self.last.has_elapsed(now, self.half_period_ms) {
            return self.active && self.on;
        }

        self.last.start(now);
        self.on = !self.on;

        if !self.on {
            self.count += 1;
            if self.count >= self.repeats {
                self.active = false;
                self.count = 0;
            }
        }
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Heartbeat Tests
    // =========================================================================

    #[test]
    fn heartbeat_toggles_each_period() {
        let mut hb = Heartbeat::new(1_000);
        assert!(!hb.update(0));
        assert!(!hb.update(999));
        assert!(hb.update(1_000));
        assert!(hb.update(1_999));
        assert!(!hb.update(2_000));
    }

    #[test]
    fn heartbeat_wraps() {
        let mut hb = Heartbeat::new(1_000);
        hb.update(u32::MAX - 500);
        assert!(hb.update(499));
    }

    // =========================================================================
    // Config LED Tests
    // =========================================================================

    #[test]
    fn idle_is_dark() {
        let mut led = ConfigLed::new(30_000);
        let mut effects = Effects::new();
        assert!(!led.update(0, &mut effects));
        assert!(!led.update(12_345, &mut effects));
    }

    #[test]
    fn confirm_pattern_counts_blinks() {
        let mut led = ConfigLed::new(30_000);
        let mut effects = Effects::new();
        led.set_mode(ConfigLedMode::Confirm10s, 0);

        // Three blinks in the first 900 ms, then a 700 ms gap
        let mut rising = 0;
        let mut prev = false;
        for t in (0..1_600).step_by(10) {
            let on = led.update(t, &mut effects);
            if on && !prev {
                rising += 1;
            }
            prev = on;
        }
        assert_eq!(rising, 3);
        assert!(!led.update(1_000, &mut effects));
        // Pattern repeats
        assert!(led.update(1_600, &mut effects));
    }

    #[test]
    fn learn_times_out() {
        let mut led = ConfigLed::new(2_000);
        let mut effects = Effects::new();
        led.set_mode(ConfigLedMode::Learn, 100);

        assert!(led.update(100, &mut effects));
        assert!(!led.update(600, &mut effects));
        assert!(led.update(1_100, &mut effects));
        assert!(effects.is_empty());

        assert!(!led.update(2_100, &mut effects));
        assert_eq!(led.mode(), ConfigLedMode::Idle);
        assert!(effects.logged(GateEvent::LearnEnded));
    }

    #[test]
    fn exit_flash_ends_idle() {
        let mut led = ConfigLed::new(30_000);
        let mut effects = Effects::new();
        led.set_mode(ConfigLedMode::ExitFlash, 0);
        assert!(led.update(50, &mut effects));
        assert!(!led.update(150, &mut effects));
        assert!(!led.update(1_500, &mut effects));
        assert_eq!(led.mode(), ConfigLedMode::Idle);
        assert!(effects.is_empty());
    }

    #[test]
    fn confirm_levels() {
        assert_eq!(ConfigLedMode::confirm(1), Some(ConfigLedMode::Confirm1s));
        assert_eq!(ConfigLedMode::confirm(4), Some(ConfigLedMode::Confirm15s));
        assert_eq!(ConfigLedMode::confirm(0), None);
        assert_eq!(ConfigLedMode::confirm(5), None);
        assert_eq!(ConfigLedMode::Confirm5s.blinks(), 2);
    }

    // =========================================================================
    // Beep Sequencer Tests
    // =========================================================================

    #[test]
    fn beeps_requested_count() {
        let mut beeper = BeepSequencer::new(120);
        beeper.start(3, 0);

        let mut beeps = 0;
        let mut prev = false;
        for t in (0..2_000).step_by(10) {
            let on = beeper.update(t);
            if on && !prev {
                beeps += 1;
            }
            prev = on;
        }
        assert_eq!(beeps, 3);
        assert!(!beeper.is_active());
        assert!(!beeper.update(2_000));
    }

    #[test]
    fn start_zero_is_noop() {
        let mut beeper = BeepSequencer::new(120);
        beeper.start(0, 0);
        assert!(!beeper.is_active());
        assert!(!beeper.update(500));
    }

    #[test]
    fn restart_replaces_run() {
        let mut beeper = BeepSequencer::new(120);
        beeper.start(4, 0);
        assert!(beeper.update(120));
        beeper.start(1, 130);
        assert!(!beeper.update(200));
        assert!(beeper.update(250));
        assert!(!beeper.update(370));
        assert!(!beeper.is_active());
    }
}
