//! Fire detection timing.
//!
//! The probability roll and the isolated-mode forced trigger share one
//! `last_check_ms` stamp: a probabilistic hit also restarts the forced
//! countdown.

use rand::Rng;

use crate::config::StationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireTrigger {
    pub at_ms: u32,
    /// Raised by the isolated-mode timeout rather than the dice.
    pub forced: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FireDetector {
    last_check_ms: u32,
    triggered_at_ms: Option<u32>,
}

impl FireDetector {
    pub fn new(start_ms: u32) -> Self {
        Self {
            last_check_ms: start_ms,
            triggered_at_ms: None,
        }
    }

    /// Restart the forced-trigger countdown from `now_ms`.
    pub fn reset(&mut self, now_ms: u32) {
        self.last_check_ms = now_ms;
    }

    /// One detection attempt. `isolated` means Fire is the only enabled module.
    pub fn check<R: Rng + ?Sized>(
        &mut self,
        now_ms: u32,
        isolated: bool,
        config: &StationConfig,
        rng: &mut R,
    ) -> Option<FireTrigger> {
        let p = if isolated {
            config.fire_isolated_probability
        } else {
            config.fire_probability
        };

        let trigger = if rng.gen_bool(p) {
            FireTrigger { at_ms: now_ms, forced: false }
        } else if isolated
            && now_ms.wrapping_sub(self.last_check_ms) >= config.fire_isolated_force_ms
        {
            FireTrigger { at_ms: now_ms, forced: true }
        } else {
            return None;
        };

        self.last_check_ms = now_ms;
        self.triggered_at_ms = Some(now_ms);
        Some(trigger)
    }

    pub fn triggered_at(&self) -> Option<u32> {
        self.triggered_at_ms
    }

    /// Time since the active alert was raised.
    pub fn elapsed_ms(&self, now_ms: u32) -> Option<u32> {
        self.triggered_at_ms.map(|t| now_ms.wrapping_sub(t))
    }

    pub fn clear(&mut self) {
        self.triggered_at_ms = None;
    }
}
