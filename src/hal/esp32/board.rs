//! GPIO setup for the controller board.
//!
//! Wraps `esp-idf-hal` pin drivers in the generic
//! [`DigitalInputs`]/[`DigitalOutputs`] adapters, which drive them through
//! their `embedded-hal` implementations.
//!
//! # Wiring
//!
//! - Limit switches, buttons, remote → GPIO32/33/25/26/27 to GND, internal pull-up
//! - Obstacle loop (NC) → GPIO13 to GND, internal pull-up (high = obstructed)
//! - Relay, siren, buzzer → GPIO23/19/18 via driver transistors
//! - Traffic lamps → GPIO16/17/4
//! - Heartbeat, config LEDs → GPIO2/22

use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, Input, Output, PinDriver, Pins, Pull};
use esp_idf_hal::sys::EspError;

use crate::hal::digital::{DigitalInputs, DigitalOutputs};

/// Board inputs as `embedded-hal` pins.
pub type Esp32Inputs = DigitalInputs<PinDriver<'static, AnyIOPin, Input>>;

/// Board outputs as `embedded-hal` pins.
pub type Esp32Outputs = DigitalOutputs<PinDriver<'static, AnyOutputPin, Output>>;

fn input(pin: AnyIOPin) -> Result<PinDriver<'static, AnyIOPin, Input>, EspError> {
    let mut driver = PinDriver::input(pin)?;
    driver.set_pull(Pull::Up)?;
    Ok(driver)
}

fn output(pin: AnyOutputPin) -> Result<PinDriver<'static, AnyOutputPin, Output>, EspError> {
    let mut driver = PinDriver::output(pin)?;
    driver.set_low()?;
    Ok(driver)
}

/// Configure every gate I/O pin, outputs starting low.
///
/// # Errors
///
/// Returns an error if GPIO initialization fails.
///
/// # Example
///
/// ```ignore
/// use esp_idf_hal::peripherals::Peripherals;
/// use rs_gatekeeper::hal::esp32::take_board_io;
///
/// let peripherals = Peripherals::take()?;
/// let (inputs, outputs) = take_board_io(peripherals.pins)?;
/// ```
pub fn take_board_io(pins: Pins) -> Result<(Esp32Inputs, Esp32Outputs), EspError> {
    let inputs = DigitalInputs {
        closed_limit: input(pins.gpio32.into())?,
        open_limit: input(pins.gpio33.into())?,
        obstacle: input(pins.gpio13.into())?,
        manual_button: input(pins.gpio25.into())?,
        remote: input(pins.gpio26.into())?,
        program_button: input(pins.gpio27.into())?,
    };

    // Relay first so the gate operator never sees a floating pulse input
    let outputs = DigitalOutputs {
        relay: output(pins.gpio23.into())?,
        siren: output(pins.gpio19.into())?,
        buzzer: output(pins.gpio18.into())?,
        red: output(pins.gpio16.into())?,
        yellow: output(pins.gpio17.into())?,
        green: output(pins.gpio4.into())?,
        heartbeat_led: output(pins.gpio2.into())?,
        config_led: output(pins.gpio22.into())?,
    };

    Ok((inputs, outputs))
}
