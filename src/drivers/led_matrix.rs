//! 5×5 addressable LED matrix on a single shared data line.
//!
//! ## Addressing
//!
//! The strip snakes through the grid, so logical `(x, y)` maps to a
//! physical index row by row, alternating direction:
//!
//! ```text
//!  y=0   0 →  1 →  2 →  3 →  4
//!  y=1   9 ←  8 ←  7 ←  6 ←  5
//!  y=2  10 → 11 → 12 → 13 → 14
//!  y=3  19 ← 18 ← 17 ← 16 ← 15
//!  y=4  20 → 21 → 22 → 23 → 24
//! ```
//!
//! ## Bus discipline
//!
//! [`LedMatrix::transmit`] is the only way onto the bus. It sends one full
//! frame of [`MATRIX_PIXELS`] words inside a critical section, so nothing
//! else can write the strip halfway through a frame.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::warn;
use smart_leds::{RGB8, SmartLedsWrite};

use crate::error::{DeviceError, Peripheral};

pub const MATRIX_WIDTH: usize = 5;
pub const MATRIX_HEIGHT: usize = 5;
pub const MATRIX_PIXELS: usize = MATRIX_WIDTH * MATRIX_HEIGHT;

pub const OFF: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// One complete strip update, in physical (wire) order.
pub type Frame = [RGB8; MATRIX_PIXELS];

/// Physical strip index of grid cell `(x, y)`.
pub const fn serpentine_index(x: usize, y: usize) -> usize {
    if y % 2 == 0 {
        y * MATRIX_WIDTH + x
    } else {
        y * MATRIX_WIDTH + (MATRIX_WIDTH - 1 - x)
    }
}

/// Build a wire-order frame from a row-major grid.
pub fn frame_from_grid(grid: &[[RGB8; MATRIX_WIDTH]; MATRIX_HEIGHT]) -> Frame {
    let mut frame = [OFF; MATRIX_PIXELS];
    for (y, row) in grid.iter().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            frame[serpentine_index(x, y)] = px;
        }
    }
    frame
}

pub const fn solid_frame(colour: RGB8) -> Frame {
    [colour; MATRIX_PIXELS]
}

/// Pack a colour as the 24-bit G-R-B word the strip shifts in.
pub const fn grb_word(c: RGB8) -> u32 {
    ((c.g as u32) << 16) | ((c.r as u32) << 8) | c.b as u32
}

// ---------------------------------------------------------------------------
// Guarded bus
// ---------------------------------------------------------------------------

pub struct LedMatrix<B> {
    bus: Mutex<CriticalSectionRawMutex, RefCell<B>>,
}

impl<B> LedMatrix<B>
where
    B: SmartLedsWrite<Color = RGB8>,
    B::Error: core::fmt::Debug,
{
    pub fn new(bus: B) -> Self {
        Self {
            bus: Mutex::new(RefCell::new(bus)),
        }
    }

    /// Send a whole frame. All-or-nothing with respect to other writers.
    pub fn transmit(&self, frame: &Frame) -> Result<(), DeviceError> {
        self.bus.lock(|cell| {
            let mut bus = cell
                .try_borrow_mut()
                .map_err(|_| DeviceError::Unavailable(Peripheral::LedBus))?;
            bus.write(frame.iter().copied()).map_err(|e| {
                warn!("LED bus write failed: {:?}", e);
                DeviceError::TransmitFailed(Peripheral::LedBus)
            })
        })
    }

    /// Blank the strip.
    pub fn clear(&self) -> Result<(), DeviceError> {
        self.transmit(&solid_frame(OFF))
    }

    /// Hand the bus back (tests inspect what it received).
    pub fn into_inner(self) -> B {
        self.bus.into_inner().into_inner()
    }
}
