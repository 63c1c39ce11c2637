//! Host time adapter.
//!
//! Monotonic uptime from `std::time::Instant`, wall-clock hour from the
//! local time zone via `chrono`.

use std::time::Instant;

use chrono::{Local, Timelike};

use crate::app::ports::ClockPort;

pub struct HostClock {
    start: Instant,
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl ClockPort for HostClock {
    /// Wraps after ~49 days; every consumer uses `wrapping_sub`.
    fn uptime_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }

    fn current_hour(&self) -> Option<u8> {
        u8::try_from(Local::now().hour()).ok()
    }
}

/// Clock that only moves when told to. Used by the simulation's
/// fast-forward mode so runs are reproducible.
#[derive(Debug, Clone, Copy)]
pub struct SteppedClock {
    now_ms: u32,
    hour: Option<u8>,
}

impl SteppedClock {
    pub fn new(hour: Option<u8>) -> Self {
        Self { now_ms: 0, hour }
    }

    pub fn advance(&mut self, ms: u32) {
        self.now_ms = self.now_ms.wrapping_add(ms);
    }
}

impl ClockPort for SteppedClock {
    fn uptime_ms(&self) -> u32 {
        self.now_ms
    }

    fn current_hour(&self) -> Option<u8> {
        self.hour
    }
}
