//! RGB status LED driver.
//!
//! Three GPIOs drive discrete R/G/B LEDs, each simply on or off. Generic
//! over `embedded_hal` output pins so the same driver runs on the board
//! and against simulated pins.

use embedded_hal::digital::OutputPin;

use crate::app::ports::IndicatorPort;
use crate::error::{DeviceError, Peripheral};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusColour {
    #[default]
    Off,
    Red,
    Green,
    Blue,
}

impl StatusColour {
    /// (red, green, blue) pin levels.
    pub const fn levels(self) -> (bool, bool, bool) {
        match self {
            Self::Off => (false, false, false),
            Self::Red => (true, false, false),
            Self::Green => (false, true, false),
            Self::Blue => (false, false, true),
        }
    }
}

pub struct StatusLed<R, G, B> {
    red: R,
    green: G,
    blue: B,
    current: StatusColour,
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> StatusLed<R, G, B> {
    pub fn new(red: R, green: G, blue: B) -> Self {
        Self {
            red,
            green,
            blue,
            current: StatusColour::Off,
        }
    }

    pub fn set_colour(&mut self, colour: StatusColour) -> Result<(), DeviceError> {
        let (r, g, b) = colour.levels();
        Self::drive(&mut self.red, r)?;
        Self::drive(&mut self.green, g)?;
        Self::drive(&mut self.blue, b)?;
        self.current = colour;
        Ok(())
    }

    pub fn off(&mut self) -> Result<(), DeviceError> {
        self.set_colour(StatusColour::Off)
    }

    pub fn current_colour(&self) -> StatusColour {
        self.current
    }

    fn drive<P: OutputPin>(pin: &mut P, on: bool) -> Result<(), DeviceError> {
        let res = if on { pin.set_high() } else { pin.set_low() };
        res.map_err(|_| DeviceError::TransmitFailed(Peripheral::StatusLed))
    }
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> IndicatorPort for StatusLed<R, G, B> {
    fn set_status_led(&mut self, colour: StatusColour) -> Result<(), DeviceError> {
        self.set_colour(colour)
    }
}
