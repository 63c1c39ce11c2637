//! Mock board, LED bus, clock and event sink for integration tests.
//!
//! Records every output call so tests can assert on the full history
//! without any real peripherals. Each output can be told to fail.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use envmon::app::events::AppEvent;
use envmon::app::ports::{
    ClockPort, DrawSurface, EventSink, IndicatorPort, InputPort, RawInputs, TonePort,
};
use envmon::drivers::status_led::StatusColour;
use envmon::error::{DeviceError, Peripheral};
use smart_leds::{RGB8, SmartLedsWrite};

// ── Clock ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct MockClock {
    pub now_ms: u32,
    pub hour: Option<u8>,
}

impl MockClock {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            hour: Some(14),
        }
    }

    pub fn advance(&mut self, ms: u32) {
        self.now_ms = self.now_ms.wrapping_add(ms);
    }
}

impl ClockPort for MockClock {
    fn uptime_ms(&self) -> u32 {
        self.now_ms
    }

    fn current_hour(&self) -> Option<u8> {
        self.hour
    }
}

// ── Board ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCall {
    Status(StatusColour),
    Tone { hz: u32, ms: u32 },
    Flush,
}

#[derive(Default)]
pub struct MockBoard {
    pub inputs: RawInputs,
    pub calls: Vec<BoardCall>,
    pub lit_pixels: usize,
    pub fail_display: bool,
    pub fail_buzzer: bool,
    pub fail_status: bool,
    pub fail_inputs: bool,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tones(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BoardCall::Tone { hz, .. } => Some(*hz),
                _ => None,
            })
            .collect()
    }

    pub fn last_status(&self) -> Option<StatusColour> {
        self.calls.iter().rev().find_map(|c| match c {
            BoardCall::Status(s) => Some(*s),
            _ => None,
        })
    }

    pub fn flushes(&self) -> usize {
        self.calls.iter().filter(|c| **c == BoardCall::Flush).count()
    }
}

impl InputPort for MockBoard {
    fn sample(&mut self) -> Result<RawInputs, DeviceError> {
        if self.fail_inputs {
            return Err(DeviceError::Unavailable(Peripheral::Inputs));
        }
        Ok(self.inputs)
    }
}

impl IndicatorPort for MockBoard {
    fn set_status_led(&mut self, colour: StatusColour) -> Result<(), DeviceError> {
        if self.fail_status {
            return Err(DeviceError::TransmitFailed(Peripheral::StatusLed));
        }
        self.calls.push(BoardCall::Status(colour));
        Ok(())
    }
}

impl TonePort for MockBoard {
    fn play_tone(&mut self, frequency_hz: u32, duration_ms: u32) -> Result<(), DeviceError> {
        if self.fail_buzzer {
            return Err(DeviceError::Unavailable(Peripheral::Buzzer));
        }
        self.calls.push(BoardCall::Tone {
            hz: frequency_hz,
            ms: duration_ms,
        });
        Ok(())
    }
}

impl DelayNs for MockBoard {
    fn delay_ns(&mut self, _ns: u32) {}
}

impl DrawSurface for MockBoard {
    fn size(&self) -> (u32, u32) {
        (128, 64)
    }

    fn set_pixel(&mut self, _x: u32, _y: u32, on: bool) {
        if on {
            self.lit_pixels += 1;
        }
    }

    fn flush(&mut self) -> Result<(), DeviceError> {
        if self.fail_display {
            return Err(DeviceError::Unavailable(Peripheral::Display));
        }
        self.calls.push(BoardCall::Flush);
        Ok(())
    }
}

// ── LED bus ───────────────────────────────────────────────────

/// Shared handles so frames stay observable while the bus is owned by
/// the `LedMatrix`.
#[derive(Clone, Default)]
pub struct MockLedBus {
    pub frames: Rc<RefCell<Vec<Vec<RGB8>>>>,
    pub fail: Rc<Cell<bool>>,
}

#[derive(Debug)]
pub struct BusFault;

impl SmartLedsWrite for MockLedBus {
    type Error = BusFault;
    type Color = RGB8;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        if self.fail.get() {
            return Err(BusFault);
        }
        self.frames
            .borrow_mut()
            .push(iterator.into_iter().map(Into::into).collect());
        Ok(())
    }
}

#[allow(dead_code)]
impl MockLedBus {
    pub fn last_frame(&self) -> Option<Vec<RGB8>> {
        self.frames.borrow().last().cloned()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.borrow().len()
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
