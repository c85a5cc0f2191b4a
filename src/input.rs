//! Command input decoding: manual button, remote receiver and programming button.
//!
//! # Manual button and remote
//!
//! Both share one press tracker. A press records the actor; a release shorter
//! than `debounce_ms` is ignored, otherwise it requests a pulse. Holding the
//! physical button (not the remote) for `panic_hold_ms` latches the panic
//! alarm. The next qualifying press after that clears it instead of moving
//! the gate.
//!
//! # Programming button
//!
//! Holding the programming button walks a four-step ladder. Each threshold
//! crossed confirms the level with a blink pattern and a matching number of
//! beeps; releasing runs the command for the level reached:
//!
//! | Level | Hold | On release |
//! |-------|------|------------|
//! | 1 | 1 s | Open the remote learn window |
//! | 2 | 5 s | Reset network credentials |
//! | 3 | 10 s | Erase stored events |
//! | 4 | 15 s | Factory reset |
//!
//! The manual button and remote take precedence: the programming button is
//! not looked at while either of them is held or being released.

use crate::config::TimingConfig;
use crate::effects::{Actor, Effect, Effects, GateEvent};
use crate::feedback::ConfigLedMode;
use crate::pulse::PulseRequest;
use crate::timer::Timer;
use crate::traits::InputSnapshot;

/// Button decoder for user commands.
#[derive(Debug)]
pub struct InputDecoder {
    pressed: bool,
    press: Timer,
    panic_fired: bool,
    program_pressed: bool,
    program: Timer,
    level: u8,
    debounce_ms: u32,
    panic_hold_ms: u32,
    levels_ms: [u32; 4],
}

impl InputDecoder {
    /// Creates a decoder with no button held.
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            pressed: false,
            press: Timer::unset(),
            panic_fired: false,
            program_pressed: false,
            program: Timer::unset(),
            level: 0,
            debounce_ms: timing.debounce_ms,
            panic_hold_ms: timing.panic_hold_ms,
            levels_ms: timing.program_levels_ms,
        }
    }

    /// Run one cycle.
    ///
    /// `panic_latched` is the security monitor's latch as of the start of the
    /// cycle. Nothing is decoded while `emergency` is set.
    pub fn update(
        &mut self,
        inputs: &InputSnapshot,
        emergency: bool,
        panic_latched: bool,
        now: u32,
        effects: &mut Effects,
    ) {
        if emergency {
            return;
        }

        if inputs.manual_button || inputs.remote {
            self.on_command_held(inputs.manual_button, panic_latched, now, effects);
            return;
        }

        if self.pressed {
            self.on_command_released(panic_latched, now, effects);
            return;
        }

        if inputs.program_button {
            self.on_program_held(now, effects);
        } else if self.program_pressed {
            self.on_program_released(effects);
        }
    }

    /// Programming level reached by the current hold (0 when idle).
    pub fn program_level(&self) -> u8 {
        self.level
    }

    /// Returns true while the manual button or remote is held.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    fn on_command_held(&mut self, manual: bool, panic_latched: bool, now: u32, effects: &mut Effects) {
        if !self.pressed {
            self.pressed = true;
            self.press.start(now);
            self.panic_fired = false;
            let actor = if manual {
                Actor::PhysicalButton
            } else {
                Actor::RemoteControl
            };
            effects.push(Effect::SetActor(actor));
            return;
        }

        if manual
            && !panic_latched
            && !self.panic_fired
            && self.press.has_elapsed(now, self.panic_hold_ms)
        {
            log::warn!("input: panic hold detected");
            self.panic_fired = true;
            effects.push(Effect::LatchPanic);
            effects.log(GateEvent::PanicAlarm, Some(Actor::PhysicalButton));
            effects.push(Effect::SetActor(Actor::System));
        }
    }

    fn on_command_released(&mut self, panic_latched: bool, now: u32, effects: &mut Effects) {
        self.pressed = false;
        let held = self.press.elapsed(now).unwrap_or(0);
        self.press.clear();

        if held < self.debounce_ms {
            log::debug!("input: {} ms press ignored", held);
            return;
        }

        if self.panic_fired {
            effects.push(Effect::SetActor(Actor::System));
        } else if panic_latched {
            log::info!("input: panic released");
            effects.push(Effect::ReleasePanic);
            effects.log(GateEvent::PanicCleared, None);
            effects.push(Effect::SetActor(Actor::System));
        } else {
            effects.push(Effect::RequestPulse(PulseRequest::Normal));
        }
    }

    fn on_program_held(&mut self, now: u32, effects: &mut Effects) {
        if !self.program_pressed {
            self.program_pressed = true;
            self.program.start(now);
            self.level = 0;
        }

        let held = self.program.elapsed(now).unwrap_or(0);
        while let Some(&threshold) = self.levels_ms.get(usize::from(self.level)) {
            if held < threshold {
                break;
            }
            self.level += 1;
            if let Some(mode) = ConfigLedMode::confirm(self.level) {
                effects.push(Effect::ConfigLed(mode));
            }
            effects.push(Effect::Beep(self.level));
            log::info!("input: programming level {}", self.level);
        }
    }

    fn on_program_released(&mut self, effects: &mut Effects) {
        self.program_pressed = false;
        self.program.clear();

        match self.level {
            1 => {
                effects.push(Effect::ConfigLed(ConfigLedMode::Learn));
                effects.log(GateEvent::LearnStarted, Some(Actor::System));
            }
            2 => {
                effects.push(Effect::ConfigLed(ConfigLedMode::ExitFlash));
                effects.push(Effect::ResetCredentials);
                effects.log(GateEvent::CredentialsReset, Some(Actor::System));
            }
            3 => {
                effects.push(Effect::ConfigLed(ConfigLedMode::ExitFlash));
                effects.push(Effect::ResetStorage);
                effects.log(GateEvent::StorageReset, Some(Actor::System));
            }
            4 => {
                effects.push(Effect::ConfigLed(ConfigLedMode::ExitFlash));
                effects.push(Effect::FactoryReset);
                effects.log(GateEvent::FactoryReset, Some(Actor::System));
            }
            _ => {}
        }

        self.level = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder() -> InputDecoder {
        InputDecoder::new(&TimingConfig::default())
    }

    fn manual() -> InputSnapshot {
        InputSnapshot {
            manual_button: true,
            ..InputSnapshot::closed()
        }
    }

    fn remote() -> InputSnapshot {
        InputSnapshot {
            remote: true,
            ..InputSnapshot::closed()
        }
    }

    fn program() -> InputSnapshot {
        InputSnapshot {
            program_button: true,
            ..InputSnapshot::closed()
        }
    }

    fn idle() -> InputSnapshot {
        InputSnapshot::closed()
    }

    fn step(dec: &mut InputDecoder, inputs: InputSnapshot, panic: bool, now: u32) -> Effects {
        let mut effects = Effects::new();
        dec.update(&inputs, false, panic, now, &mut effects);
        effects
    }

    // =========================================================================
    // Manual / Remote
    // =========================================================================

    #[test]
    fn short_press_requests_pulse() {
        let mut dec = decoder();
        let effects = step(&mut dec, manual(), false, 0);
        assert!(effects.contains(&Effect::SetActor(Actor::PhysicalButton)));

        let effects = step(&mut dec, idle(), false, 100);
        assert!(effects.contains(&Effect::RequestPulse(PulseRequest::Normal)));
        assert!(!dec.is_pressed());
    }

    #[test]
    fn remote_sets_remote_actor() {
        let mut dec = decoder();
        let effects = step(&mut dec, remote(), false, 0);
        assert!(effects.contains(&Effect::SetActor(Actor::RemoteControl)));
    }

    #[test]
    fn bounce_is_ignored() {
        let mut dec = decoder();
        step(&mut dec, manual(), false, 0);
        let effects = step(&mut dec, idle(), false, 49);
        assert!(effects.is_empty());

        step(&mut dec, manual(), false, 100);
        let effects = step(&mut dec, idle(), false, 150);
        assert!(effects.contains(&Effect::RequestPulse(PulseRequest::Normal)));
    }

    #[test]
    fn long_hold_latches_panic_once() {
        let mut dec = decoder();
        step(&mut dec, manual(), false, 0);
        assert!(step(&mut dec, manual(), false, 2_999).is_empty());

        let effects = step(&mut dec, manual(), false, 3_000);
        assert!(effects.contains(&Effect::LatchPanic));
        assert!(effects.logged(GateEvent::PanicAlarm));

        // Latch visible from the next cycle
        assert!(step(&mut dec, manual(), true, 4_000).is_empty());

        // Release after firing: no pulse, no defuse
        let effects = step(&mut dec, idle(), true, 5_000);
        assert_eq!(effects.as_slice(), &[Effect::SetActor(Actor::System)]);
    }

    #[test]
    fn panic_fires_once_even_if_not_yet_latched() {
        let mut dec = decoder();
        step(&mut dec, manual(), false, 0);
        step(&mut dec, manual(), false, 3_000);
        let effects = step(&mut dec, manual(), false, 3_010);
        assert!(!effects.contains(&Effect::LatchPanic));
    }

    #[test]
    fn remote_hold_never_panics() {
        let mut dec = decoder();
        step(&mut dec, remote(), false, 0);
        let effects = step(&mut dec, remote(), false, 10_000);
        assert!(effects.is_empty());

        let effects = step(&mut dec, idle(), false, 10_010);
        assert!(effects.contains(&Effect::RequestPulse(PulseRequest::Normal)));
    }

    #[test]
    fn next_press_defuses_panic() {
        let mut dec = decoder();
        step(&mut dec, remote(), true, 0);
        let effects = step(&mut dec, idle(), true, 200);

        assert!(effects.contains(&Effect::ReleasePanic));
        assert!(effects.logged(GateEvent::PanicCleared));
        assert!(effects.contains(&Effect::SetActor(Actor::System)));
        assert!(!effects.contains(&Effect::RequestPulse(PulseRequest::Normal)));
    }

    #[test]
    fn emergency_suppresses_decoding() {
        let mut dec = decoder();
        let mut effects = Effects::new();
        dec.update(&manual(), true, false, 0, &mut effects);
        dec.update(&idle(), true, false, 500, &mut effects);
        assert!(effects.is_empty());
        assert!(!dec.is_pressed());
    }

    // =========================================================================
    // Programming Button
    // =========================================================================

    #[test]
    fn ladder_confirms_each_level_once() {
        let mut dec = decoder();
        step(&mut dec, program(), false, 0);

        let effects = step(&mut dec, program(), false, 1_000);
        assert!(effects.contains(&Effect::ConfigLed(ConfigLedMode::Confirm1s)));
        assert!(effects.contains(&Effect::Beep(1)));
        assert!(step(&mut dec, program(), false, 1_010).is_empty());

        let effects = step(&mut dec, program(), false, 5_000);
        assert!(effects.contains(&Effect::Beep(2)));
        let effects = step(&mut dec, program(), false, 10_000);
        assert!(effects.contains(&Effect::Beep(3)));
        let effects = step(&mut dec, program(), false, 15_000);
        assert!(effects.contains(&Effect::ConfigLed(ConfigLedMode::Confirm15s)));
        assert!(effects.contains(&Effect::Beep(4)));
        assert!(step(&mut dec, program(), false, 30_000).is_empty());
        assert_eq!(dec.program_level(), 4);
    }

    #[test]
    fn release_level_one_starts_learn() {
        let mut dec = decoder();
        step(&mut dec, program(), false, 0);
        step(&mut dec, program(), false, 1_500);
        let effects = step(&mut dec, idle(), false, 1_600);

        assert!(effects.contains(&Effect::ConfigLed(ConfigLedMode::Learn)));
        assert!(effects.logged(GateEvent::LearnStarted));
        assert_eq!(dec.program_level(), 0);
    }

    #[test]
    fn release_level_two_resets_credentials() {
        let mut dec = decoder();
        step(&mut dec, program(), false, 0);
        step(&mut dec, program(), false, 6_000);
        let effects = step(&mut dec, idle(), false, 6_010);
        assert!(effects.contains(&Effect::ResetCredentials));
        assert!(effects.contains(&Effect::ConfigLed(ConfigLedMode::ExitFlash)));
        assert!(effects.logged(GateEvent::CredentialsReset));
    }

    #[test]
    fn release_level_three_and_four() {
        let mut dec = decoder();
        step(&mut dec, program(), false, 0);
        step(&mut dec, program(), false, 11_000);
        assert_eq!(dec.program_level(), 3);
        let effects = step(&mut dec, idle(), false, 11_010);
        assert!(effects.contains(&Effect::ResetStorage));
        assert!(effects.logged(GateEvent::StorageReset));

        step(&mut dec, program(), false, 20_000);
        step(&mut dec, program(), false, 35_000);
        let effects = step(&mut dec, idle(), false, 35_010);
        assert!(effects.contains(&Effect::FactoryReset));
        assert!(effects.logged(GateEvent::FactoryReset));
    }

    #[test]
    fn short_program_press_does_nothing() {
        let mut dec = decoder();
        step(&mut dec, program(), false, 0);
        step(&mut dec, program(), false, 900);
        assert!(step(&mut dec, idle(), false, 910).is_empty());
    }

    #[test]
    fn manual_takes_precedence_over_program() {
        let mut dec = decoder();
        let both = InputSnapshot {
            manual_button: true,
            program_button: true,
            ..InputSnapshot::closed()
        };
        step(&mut dec, both, false, 0);
        step(&mut dec, both, false, 1_500);
        assert_eq!(dec.program_level(), 0);

        // Release cycle of the manual button still skips the ladder
        let only_program = program();
        let effects = step(&mut dec, only_program, false, 1_600);
        assert!(effects.contains(&Effect::RequestPulse(PulseRequest::Normal)));
        assert_eq!(dec.program_level(), 0);

        step(&mut dec, only_program, false, 1_610);
        let effects = step(&mut dec, only_program, false, 2_610);
        assert!(effects.contains(&Effect::Beep(1)));
    }
}
