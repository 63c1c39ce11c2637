//! Debounced push-buttons and the joystick input router.
//!
//! ## Inputs
//!
//! | Input           | Kind    | Conditioning                         |
//! |-----------------|---------|--------------------------------------|
//! | Button A        | digital | settle interval (default 50 ms)      |
//! | Button B        | digital | settle interval                      |
//! | Joystick button | digital | settle interval                      |
//! | Joystick X      | ADC     | bucketed into Left/Center/Right only |
//!
//! The adapters report digital inputs as logical "pressed" levels, so the
//! active-low wiring on the board never reaches this module. The router
//! is sampled once per control tick; edges it reports are valid for that
//! tick only.

use crate::app::ports::RawInputs;

/// Joystick X below this reads as Left.
pub const JOY_LEFT_THRESHOLD: u16 = 1000;
/// Joystick X above this reads as Right.
pub const JOY_RIGHT_THRESHOLD: u16 = 3000;

// ---------------------------------------------------------------------------
// Debouncer
// ---------------------------------------------------------------------------

/// Settle-interval debouncer for one digital input.
///
/// The stable level only follows the raw level once the raw level has
/// stayed unchanged for at least `settle_ms`.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    settle_ms: u32,
    last_raw: bool,
    stable: bool,
    last_change_ms: u32,
}

impl Debouncer {
    pub fn new(settle_ms: u32) -> Self {
        Self {
            settle_ms,
            last_raw: false,
            stable: false,
            last_change_ms: 0,
        }
    }

    /// Feed one raw sample. Returns the stable level after the update.
    pub fn update(&mut self, raw: bool, now_ms: u32) -> bool {
        if raw != self.last_raw {
            self.last_raw = raw;
            self.last_change_ms = now_ms;
        }
        if raw != self.stable && now_ms.wrapping_sub(self.last_change_ms) >= self.settle_ms {
            self.stable = raw;
        }
        self.stable
    }

    pub fn stable(&self) -> bool {
        self.stable
    }
}

// ---------------------------------------------------------------------------
// Joystick
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoystickZone {
    Left,
    #[default]
    Center,
    Right,
}

impl JoystickZone {
    pub fn from_raw(x: u16) -> Self {
        if x < JOY_LEFT_THRESHOLD {
            Self::Left
        } else if x > JOY_RIGHT_THRESHOLD {
            Self::Right
        } else {
            Self::Center
        }
    }
}

// ---------------------------------------------------------------------------
// Input router
// ---------------------------------------------------------------------------

/// One tick's worth of conditioned input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputFrame {
    /// Stable rising edges ("pressed" events) seen this tick.
    pub a_pressed: bool,
    pub b_pressed: bool,
    pub joy_pressed: bool,
    /// Joystick X zone, re-read every tick.
    pub zone: JoystickZone,
}

impl InputFrame {
    /// A pressed edge on any of the three digital inputs.
    pub fn any_pressed(&self) -> bool {
        self.a_pressed || self.b_pressed || self.joy_pressed
    }
}

pub struct InputRouter {
    a: Debouncer,
    b: Debouncer,
    joy: Debouncer,
}

impl InputRouter {
    pub fn new(settle_ms: u32) -> Self {
        Self {
            a: Debouncer::new(settle_ms),
            b: Debouncer::new(settle_ms),
            joy: Debouncer::new(settle_ms),
        }
    }

    /// Run every input through its conditioner and report edges.
    pub fn update(&mut self, raw: RawInputs, now_ms: u32) -> InputFrame {
        InputFrame {
            a_pressed: Self::rising(&mut self.a, raw.button_a, now_ms),
            b_pressed: Self::rising(&mut self.b, raw.button_b, now_ms),
            joy_pressed: Self::rising(&mut self.joy, raw.joystick_button, now_ms),
            zone: JoystickZone::from_raw(raw.joystick_x),
        }
    }

    /// Stable levels of A, B and the joystick button.
    pub fn held(&self) -> (bool, bool, bool) {
        (self.a.stable(), self.b.stable(), self.joy.stable())
    }

    fn rising(d: &mut Debouncer, raw: bool, now_ms: u32) -> bool {
        let before = d.stable();
        d.update(raw, now_ms) && !before
    }
}
