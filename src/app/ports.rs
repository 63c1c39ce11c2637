//! Port traits: the hexagonal boundary between the monitoring engine and
//! its collaborators.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorService (domain)
//! ```
//!
//! Driven adapters (inputs, display, buzzer, status LED, event sinks,
//! config source) implement these traits. The
//! [`MonitorService`](super::service::MonitorService) consumes them via
//! generics, so the engine never touches hardware directly. The LED bus
//! is the exception: it goes through [`smart_leds::SmartLedsWrite`] and is
//! owned by [`LedMatrix`](crate::drivers::led_matrix::LedMatrix).
//!
//! Every hardware-facing call returns [`DeviceError`] so that a dead
//! collaborator surfaces as "device unavailable" instead of vanishing.

use embedded_hal::delay::DelayNs;

use crate::config::StationConfig;
use crate::drivers::status_led::StatusColour;
use crate::error::DeviceError;

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: buttons / ADC → domain)
// ───────────────────────────────────────────────────────────────

/// Raw, unconditioned input levels for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInputs {
    /// Logical "pressed" level, already corrected for active-low wiring.
    pub button_a: bool,
    pub button_b: bool,
    pub joystick_button: bool,
    /// 12-bit joystick X reading (0–4095, centre ≈ 2048).
    pub joystick_x: u16,
}

impl Default for RawInputs {
    fn default() -> Self {
        Self {
            button_a: false,
            button_b: false,
            joystick_button: false,
            joystick_x: 2048,
        }
    }
}

pub trait InputPort {
    fn sample(&mut self) -> Result<RawInputs, DeviceError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

pub trait ClockPort {
    /// Monotonic milliseconds since start-up (wraps after ~49 days).
    fn uptime_ms(&self) -> u32;

    /// Local wall-clock hour (0–23), `None` if the wall clock is unset.
    fn current_hour(&self) -> Option<u8>;
}

// ───────────────────────────────────────────────────────────────
// Output ports (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Monochrome pixel grid. The engine issues a series of `set_pixel`
/// calls per render followed by exactly one `flush`.
pub trait DrawSurface {
    /// Width and height in pixels.
    fn size(&self) -> (u32, u32);

    /// Out-of-range coordinates are ignored.
    fn set_pixel(&mut self, x: u32, y: u32, on: bool);

    fn flush(&mut self) -> Result<(), DeviceError>;
}

/// Buzzer. Blocks for `duration_ms`.
pub trait TonePort {
    fn play_tone(&mut self, frequency_hz: u32, duration_ms: u32) -> Result<(), DeviceError>;
}

/// RGB status LED, each channel simply on or off.
pub trait IndicatorPort {
    fn set_status_led(&mut self, colour: StatusColour) -> Result<(), DeviceError>;
}

/// Everything the service drives on the board except the LED bus.
/// Blanket-implemented, so adapters only implement the individual ports.
pub trait StationIo: InputPort + IndicatorPort + TonePort + DrawSurface + DelayNs {}

impl<T> StationIo for T where T: InputPort + IndicatorPort + TonePort + DrawSurface + DelayNs {}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Supplies the station configuration once before the main loop.
///
/// Implementations must run [`StationConfig::validate`] and reject bad
/// values with [`ConfigError::ValidationFailed`], never clamp them.
pub trait ConfigPort {
    fn load(&self) -> Result<StationConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config source exists.
    NotFound,
    /// Source exists but does not parse.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::error::Error for ConfigError {}
