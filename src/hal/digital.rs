//! Generic pin adapters over `embedded-hal` 1.0 digital traits.
//!
//! [`DigitalInputs`] and [`DigitalOutputs`] turn a set of GPIO pins into the
//! [`GateInputs`] / [`GateOutputs`] boundary. They work with any HAL that
//! implements `embedded_hal::digital`, including `esp-idf-hal`'s `PinDriver`.
//!
//! # Polarity
//!
//! Limit switches and buttons are wired to ground with pull-ups, so they are
//! active **low**. The obstacle sensor is a normally-closed loop that reads
//! **high** when the beam is cut. Outputs are active high.

use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::traits::{GateInputs, GateOutputs, InputSnapshot, OutputFrame};

/// Input pins, all of the same HAL type.
pub struct DigitalInputs<P> {
    /// Closed-position limit switch (active low).
    pub closed_limit: P,
    /// Open-position limit switch (active low).
    pub open_limit: P,
    /// Obstacle loop (high when obstructed).
    pub obstacle: P,
    /// Physical push button (active low).
    pub manual_button: P,
    /// Remote receiver output (active low).
    pub remote: P,
    /// Programming button (active low).
    pub program_button: P,
}

impl<P: InputPin> GateInputs for DigitalInputs<P> {
    type Error = P::Error;

    fn read(&mut self) -> Result<InputSnapshot, P::Error> {
        Ok(InputSnapshot {
            closed_limit: self.closed_limit.is_low()?,
            open_limit: self.open_limit.is_low()?,
            obstacle: self.obstacle.is_high()?,
            manual_button: self.manual_button.is_low()?,
            remote: self.remote.is_low()?,
            program_button: self.program_button.is_low()?,
        })
    }
}

/// Output pins, all of the same HAL type.
pub struct DigitalOutputs<P> {
    /// Gate drive relay.
    pub relay: P,
    /// Alarm siren.
    pub siren: P,
    /// Feedback buzzer.
    pub buzzer: P,
    /// Red traffic lamp.
    pub red: P,
    /// Yellow traffic lamp.
    pub yellow: P,
    /// Green traffic lamp.
    pub green: P,
    /// Heartbeat LED.
    pub heartbeat_led: P,
    /// Configuration LED.
    pub config_led: P,
}

impl<P: OutputPin> GateOutputs for DigitalOutputs<P> {
    type Error = P::Error;

    fn write(&mut self, frame: &OutputFrame) -> Result<(), P::Error> {
        // Relay first: an error on a later pin must not skip it
        self.relay.set_state(PinState::from(frame.relay))?;
        self.siren.set_state(PinState::from(frame.siren))?;
        self.buzzer.set_state(PinState::from(frame.buzzer))?;
        self.red.set_state(PinState::from(frame.red))?;
        self.yellow.set_state(PinState::from(frame.yellow))?;
        self.green.set_state(PinState::from(frame.green))?;
        self.heartbeat_led.set_state(PinState::from(frame.heartbeat_led))?;
        self.config_led.set_state(PinState::from(frame.config_led))?;
        Ok(())
    }
}
