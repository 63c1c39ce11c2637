//! Simulated board adapter.
//!
//! [`SimBoard`] owns the simulated peripherals and implements every
//! [`StationIo`](crate::app::ports::StationIo) port on top of them:
//!
//! | Port             | Backing                                          |
//! |------------------|--------------------------------------------------|
//! | `InputPort`      | three active-low [`SimPin`]s + joystick ADC value |
//! | `IndicatorPort`  | [`StatusLed`] over three [`SimPin`]s              |
//! | `TonePort`       | log line, optional real-time sleep               |
//! | `DrawSurface`    | SSD1306-style page buffer (128×64, 1 bpp)        |
//! | `DelayNs`        | optional real-time sleep                         |
//!
//! [`SimLedBus`] stands in for the addressable LED strip driver.

use core::convert::Infallible;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use log::{debug, trace};
use smart_leds::{RGB8, SmartLedsWrite};

use crate::app::ports::{DrawSurface, IndicatorPort, InputPort, RawInputs, TonePort};
use crate::drivers::display::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::drivers::led_matrix::{MATRIX_PIXELS, grb_word};
use crate::drivers::status_led::{StatusColour, StatusLed};
use crate::error::DeviceError;
use crate::pins;

/// Bytes in one 1-bpp frame (8 vertical pixels per byte, 8 pages).
pub const PAGE_BUFFER_LEN: usize = (DISPLAY_WIDTH * DISPLAY_HEIGHT / 8) as usize;

// ---------------------------------------------------------------------------
// Simulated GPIO
// ---------------------------------------------------------------------------

/// A GPIO line that remembers its level. Usable as input or output.
#[derive(Debug, Clone, Copy)]
pub struct SimPin {
    gpio: u8,
    high: bool,
}

impl SimPin {
    pub const fn new(gpio: u8, high: bool) -> Self {
        Self { gpio, high }
    }

    pub const fn gpio(&self) -> u8 {
        self.gpio
    }

    pub fn drive(&mut self, high: bool) {
        self.high = high;
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high)
    }
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        Ok(())
    }
}

/// Operator-facing inputs on the simulated board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimButton {
    A,
    B,
    Joystick,
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

pub struct SimBoard {
    button_a: SimPin,
    button_b: SimPin,
    joystick_button: SimPin,
    joystick_x: u16,
    status_led: StatusLed<SimPin, SimPin, SimPin>,
    page_buffer: [u8; PAGE_BUFFER_LEN],
    shown: [u8; PAGE_BUFFER_LEN],
    flushes: u32,
    tones: u32,
    realtime: bool,
}

impl SimBoard {
    /// `realtime` makes tones and delays actually sleep; a fast-forward
    /// run leaves it off.
    pub fn new(realtime: bool) -> Self {
        Self {
            // Pull-ups: released buttons read high.
            button_a: SimPin::new(pins::BUTTON_A_GPIO, true),
            button_b: SimPin::new(pins::BUTTON_B_GPIO, true),
            joystick_button: SimPin::new(pins::JOYSTICK_BUTTON_GPIO, true),
            joystick_x: pins::ADC_MAX / 2 + 1,
            status_led: StatusLed::new(
                SimPin::new(pins::LED_R_GPIO, false),
                SimPin::new(pins::LED_G_GPIO, false),
                SimPin::new(pins::LED_B_GPIO, false),
            ),
            page_buffer: [0; PAGE_BUFFER_LEN],
            shown: [0; PAGE_BUFFER_LEN],
            flushes: 0,
            tones: 0,
            realtime,
        }
    }

    // ── Operator actions ──────────────────────────────────────

    pub fn set_button(&mut self, button: SimButton, pressed: bool) {
        let pin = match button {
            SimButton::A => &mut self.button_a,
            SimButton::B => &mut self.button_b,
            SimButton::Joystick => &mut self.joystick_button,
        };
        trace!("GPIO{} {}", pin.gpio(), if pressed { "low" } else { "high" });
        pin.drive(!pressed);
    }

    pub fn release_all(&mut self) {
        self.set_button(SimButton::A, false);
        self.set_button(SimButton::B, false);
        self.set_button(SimButton::Joystick, false);
        self.joystick_x = pins::ADC_MAX / 2 + 1;
    }

    pub fn set_joystick_x(&mut self, raw: u16) {
        self.joystick_x = raw.min(pins::ADC_MAX);
    }

    // ── Observation ───────────────────────────────────────────

    pub fn status_colour(&self) -> StatusColour {
        self.status_led.current_colour()
    }

    pub fn flush_count(&self) -> u32 {
        self.flushes
    }

    pub fn tone_count(&self) -> u32 {
        self.tones
    }

    /// Whether a pixel was lit in the last flushed frame.
    pub fn shown_pixel(&self, x: u32, y: u32) -> bool {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return false;
        }
        let (idx, bit) = page_address(x, y);
        self.shown[idx] & bit != 0
    }

    /// The last flushed frame as text, two pixel rows per line.
    pub fn display_ascii(&self) -> String {
        let mut out = String::with_capacity(PAGE_BUFFER_LEN * 2);
        for y in (0..DISPLAY_HEIGHT).step_by(2) {
            for x in 0..DISPLAY_WIDTH {
                let top = self.shown_pixel(x, y);
                let bottom = self.shown_pixel(x, y + 1);
                out.push(match (top, bottom) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                });
            }
            out.push('\n');
        }
        out
    }

    fn sleep_ms(&self, ms: u32) {
        if self.realtime && ms > 0 {
            std::thread::sleep(Duration::from_millis(u64::from(ms)));
        }
    }
}

/// SSD1306 GDDRAM layout: byte `page * width + x`, bit `y % 8`.
const fn page_address(x: u32, y: u32) -> (usize, u8) {
    (((y / 8) * DISPLAY_WIDTH + x) as usize, 1 << (y % 8))
}

impl InputPort for SimBoard {
    fn sample(&mut self) -> Result<RawInputs, DeviceError> {
        // Infallible pins; active-low buttons.
        let low = |pin: &mut SimPin| pin.is_low().unwrap_or(false);
        Ok(RawInputs {
            button_a: low(&mut self.button_a),
            button_b: low(&mut self.button_b),
            joystick_button: low(&mut self.joystick_button),
            joystick_x: self.joystick_x,
        })
    }
}

impl IndicatorPort for SimBoard {
    fn set_status_led(&mut self, colour: StatusColour) -> Result<(), DeviceError> {
        if colour != self.status_led.current_colour() {
            debug!("LED   | status {:?}", colour);
        }
        self.status_led.set_colour(colour)
    }
}

impl TonePort for SimBoard {
    fn play_tone(&mut self, frequency_hz: u32, duration_ms: u32) -> Result<(), DeviceError> {
        debug!(
            "BUZZ  | GPIO{} {} Hz for {} ms",
            pins::BUZZER_GPIO,
            frequency_hz,
            duration_ms
        );
        self.tones += 1;
        self.sleep_ms(duration_ms);
        Ok(())
    }
}

impl DelayNs for SimBoard {
    fn delay_ns(&mut self, ns: u32) {
        if self.realtime {
            std::thread::sleep(Duration::from_nanos(u64::from(ns)));
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        self.sleep_ms(ms);
    }
}

impl DrawSurface for SimBoard {
    fn size(&self) -> (u32, u32) {
        (DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }

    fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return;
        }
        let (idx, bit) = page_address(x, y);
        if on {
            self.page_buffer[idx] |= bit;
        } else {
            self.page_buffer[idx] &= !bit;
        }
    }

    fn flush(&mut self) -> Result<(), DeviceError> {
        self.shown = self.page_buffer;
        self.flushes += 1;
        trace!(
            "I2C   | 0x{:02X} frame #{} ({} bytes)",
            pins::DISPLAY_I2C_ADDR,
            self.flushes,
            PAGE_BUFFER_LEN
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LED strip
// ---------------------------------------------------------------------------

/// Simulated single-wire LED strip. Keeps the GRB words of the last
/// frame it was sent.
#[derive(Debug, Default)]
pub struct SimLedBus {
    last: Vec<u32>,
    frames: u32,
}

impl SimLedBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_words(&self) -> &[u32] {
        &self.last
    }

    pub fn frame_count(&self) -> u32 {
        self.frames
    }
}

impl SmartLedsWrite for SimLedBus {
    type Error = Infallible;
    type Color = RGB8;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        self.last.clear();
        self.last
            .extend(iterator.into_iter().map(|c| grb_word(c.into())));
        self.frames += 1;
        trace!(
            "LEDS  | GPIO{} frame #{} ({} of {} pixels lit)",
            pins::LED_MATRIX_DATA_GPIO,
            self.frames,
            self.last.iter().filter(|w| **w != 0).count(),
            MATRIX_PIXELS
        );
        Ok(())
    }
}
