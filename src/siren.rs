//! Siren duty-cycle controller.
//!
//! Decides the siren output once per cycle, by priority:
//!
//! 1. A pending fault-override chirp ([`SirenState::ErrorBeep`])
//! 2. Maintenance mode silences everything
//! 3. Panic sounds continuously
//! 4. `Normal` and `Latent` security are silent
//! 5. `Triggered` security cycles between sounding and paused
//!
//! The output level persists between cycles the way a pin would: states
//! that do not drive the siren leave it where it was.

use crate::config::TimingConfig;
use crate::security::SecurityState;
use crate::timer::Timer;

/// Siren activity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SirenState {
    /// Silent.
    #[default]
    Off,
    /// On phase of the alarm cycle.
    Sounding,
    /// Off phase of the alarm cycle.
    Paused,
    /// Short fault-override chirp.
    ErrorBeep,
}

impl SirenState {
    /// Returns the state as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SirenState::Off => "off",
            SirenState::Sounding => "sounding",
            SirenState::Paused => "paused",
            SirenState::ErrorBeep => "error_beep",
        }
    }
}

/// Siren output state machine.
#[derive(Debug)]
pub struct SirenController {
    state: SirenState,
    output: bool,
    error_beep_pending: bool,
    phase: Timer,
    on_ms: u32,
    off_ms: u32,
    error_beep_ms: u32,
}

impl SirenController {
    /// Creates a silent siren.
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            state: SirenState::Off,
            output: false,
            error_beep_pending: false,
            phase: Timer::unset(),
            on_ms: timing.siren_on_ms,
            off_ms: timing.siren_off_ms,
            error_beep_ms: timing.error_beep_ms,
        }
    }

    /// Current state.
    pub fn state(&self) -> SirenState {
        self.state
    }

    /// Queue a fault-override chirp for the next cycle.
    pub fn request_error_beep(&mut self) {
        self.error_beep_pending = true;
    }

    /// Enter the on phase now.
    pub fn start_sounding(&mut self, now: u32) {
        self.state = SirenState::Sounding;
        self.phase.start(now);
    }

    /// Stop immediately.
    pub fn stop(&mut self) {
        self.state = SirenState::Off;
        self.output = false;
        self.phase.clear();
    }

    /// Run one cycle. Returns the siren level.
    pub fn update(
        &mut self,
        security: SecurityState,
        panic_latched: bool,
        maintenance: bool,
        now: u32,
    ) -> bool {
        if self.error_beep_pending {
            self.error_beep_pending = false;
            self.state = SirenState::ErrorBeep;
            self.phase.start(now);
            self.output = true;
            return self.output;
        }

        if self.state == SirenState::ErrorBeep {
            if self.phase.has_elapsed(now, self.error_beep_ms) {
                self.output = false;
                if security == SecurityState::Triggered {
                    self.start_sounding(now);
                } else {
                    self.state = SirenState::Off;
                    self.phase.clear();
                }
            }
            return self.output;
        }

        if maintenance {
            self.stop();
            return self.output;
        }

        if panic_latched {
            self.output = true;
            return self.output;
        }

        match security {
            SecurityState::Triggered => self.cycle(now),
            _ => self.stop(),
        }
        self.output
    }

    fn cycle(&mut self, now: u32) {
        match self.state {
            SirenState::Off | SirenState::ErrorBeep => {
                self.start_sounding(now);
                self.output = true;
            }
            SirenState::Sounding => {
                self.output = true;
                if self.phase.has_elapsed(now, self.on_ms) {
                    self.state = SirenState::Paused;
                    self.phase.start(now);
                }
            }
            SirenState::Paused => {
                self.output = false;
                if self.phase.has_elapsed(now, self.off_ms) {
                    self.start_sounding(now);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn siren() -> SirenController {
        SirenController::new(&TimingConfig::default())
    }

    #[test]
    fn normal_is_silent() {
        let mut s = siren();
        assert!(!s.update(SecurityState::Normal, false, false, 0));
        assert_eq!(s.state(), SirenState::Off);
    }

    #[test]
    fn triggered_duty_cycle() {
        let mut s = siren();
        assert!(s.update(SecurityState::Triggered, false, false, 0));
        assert_eq!(s.state(), SirenState::Sounding);
        assert!(s.update(SecurityState::Triggered, false, false, 9_999));

        // Boundary cycle keeps the level, then pauses
        s.update(SecurityState::Triggered, false, false, 10_000);
        assert_eq!(s.state(), SirenState::Paused);
        assert!(!s.update(SecurityState::Triggered, false, false, 10_010));

        s.update(SecurityState::Triggered, false, false, 15_000);
        assert_eq!(s.state(), SirenState::Sounding);
        assert!(s.update(SecurityState::Triggered, false, false, 15_010));
    }

    #[test]
    fn latent_is_silent() {
        let mut s = siren();
        s.update(SecurityState::Triggered, false, false, 0);
        assert!(!s.update(SecurityState::Latent, false, false, 100));
        assert_eq!(s.state(), SirenState::Off);
    }

    #[test]
    fn panic_sounds_continuously() {
        let mut s = siren();
        s.start_sounding(0);
        for t in (0..40_000).step_by(1_000) {
            assert!(s.update(SecurityState::Triggered, true, false, t));
        }
    }

    #[test]
    fn maintenance_overrides_panic() {
        let mut s = siren();
        s.start_sounding(0);
        assert!(!s.update(SecurityState::Triggered, true, true, 10));
        assert_eq!(s.state(), SirenState::Off);
    }

    #[test]
    fn error_beep_then_off() {
        let mut s = siren();
        s.request_error_beep();
        assert!(s.update(SecurityState::Normal, false, false, 0));
        assert_eq!(s.state(), SirenState::ErrorBeep);
        assert!(s.update(SecurityState::Normal, false, true, 299));
        assert!(!s.update(SecurityState::Normal, false, false, 300));
        assert_eq!(s.state(), SirenState::Off);
    }

    #[test]
    fn error_beep_resumes_alarm_with_fresh_phase() {
        let mut s = siren();
        s.update(SecurityState::Triggered, false, false, 0);
        s.request_error_beep();
        s.update(SecurityState::Triggered, false, false, 9_000);
        s.update(SecurityState::Triggered, false, false, 9_300);
        assert_eq!(s.state(), SirenState::Sounding);

        // Full on phase from the end of the chirp
        assert!(s.update(SecurityState::Triggered, false, false, 19_299));
        assert_eq!(s.state(), SirenState::Sounding);
    }

    #[test]
    fn stop_silences() {
        let mut s = siren();
        s.update(SecurityState::Triggered, false, false, 0);
        s.stop();
        assert_eq!(s.state(), SirenState::Off);
    }
}
