//! Peripheral drivers and output helpers.

pub mod button;
pub mod buzzer;
pub mod display;
pub mod led_matrix;
pub mod led_patterns;
pub mod status_led;
