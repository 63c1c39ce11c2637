//! GPIO / peripheral pin assignments for the station board.
//!
//! Single source of truth: every adapter references this module rather
//! than hard-coding pin numbers. The host simulation uses them to label
//! its simulated peripherals.

// ---------------------------------------------------------------------------
// User inputs (active-low with pull-up)
// ---------------------------------------------------------------------------

pub const BUTTON_A_GPIO: u8 = 5;
pub const BUTTON_B_GPIO: u8 = 6;
pub const JOYSTICK_BUTTON_GPIO: u8 = 22;

/// Joystick X axis, ADC input 1.
pub const JOYSTICK_X_GPIO: u8 = 27;
/// Joystick Y axis, ADC input 0 (unused by the engine).
pub const JOYSTICK_Y_GPIO: u8 = 26;

/// 12-bit ADC full scale.
pub const ADC_MAX: u16 = 4095;

// ---------------------------------------------------------------------------
// Status LED (discrete RGB, active high)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: u8 = 13;
pub const LED_G_GPIO: u8 = 11;
pub const LED_B_GPIO: u8 = 12;

// ---------------------------------------------------------------------------
// Buzzer (PWM)
// ---------------------------------------------------------------------------

pub const BUZZER_GPIO: u8 = 10;

// ---------------------------------------------------------------------------
// Addressable LED matrix (5×5, single data line)
// ---------------------------------------------------------------------------

pub const LED_MATRIX_DATA_GPIO: u8 = 7;

// ---------------------------------------------------------------------------
// Display (SSD1306 over I²C1)
// ---------------------------------------------------------------------------

pub const DISPLAY_SDA_GPIO: u8 = 14;
pub const DISPLAY_SCL_GPIO: u8 = 15;
pub const DISPLAY_I2C_ADDR: u8 = 0x3C;
