//! Unified error types for the monitoring station.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level tick loop's error handling uniform. All variants are `Copy`
//! so they can be passed through the service without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the station funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A collaborator device (display, LED bus, buzzer, ...) failed.
    Device(DeviceError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device(e) => write!(f, "device: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Device errors
// ---------------------------------------------------------------------------

/// The peripheral behind a collaborator port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peripheral {
    Display,
    LedBus,
    Buzzer,
    StatusLed,
    Inputs,
}

impl fmt::Display for Peripheral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Display => write!(f, "display"),
            Self::LedBus => write!(f, "LED bus"),
            Self::Buzzer => write!(f, "buzzer"),
            Self::StatusLed => write!(f, "status LED"),
            Self::Inputs => write!(f, "inputs"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// The peripheral is absent or not initialised.
    Unavailable(Peripheral),
    /// The peripheral accepted the request but the transfer failed.
    TransmitFailed(Peripheral),
}

impl DeviceError {
    /// Which peripheral raised the error.
    pub const fn peripheral(self) -> Peripheral {
        match self {
            Self::Unavailable(p) | Self::TransmitFailed(p) => p,
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(p) => write!(f, "{p} unavailable"),
            Self::TransmitFailed(p) => write!(f, "{p} transmit failed"),
        }
    }
}

impl core::error::Error for DeviceError {}

impl From<DeviceError> for Error {
    fn from(e: DeviceError) -> Self {
        Self::Device(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
