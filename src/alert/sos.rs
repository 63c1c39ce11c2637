//! Morse SOS waveform.
//!
//! ```text
//!  ms   0    400  800   1600     2400     3200      4400 4800 5200  5400
//!       ▇▇   ▇▇   ▇▇    ▇▇▇▇▇▇   ▇▇▇▇▇▇   ▇▇▇▇▇▇    ▇▇   ▇▇   ▇▇
//!       S  S  S         O        O        O         S    S    S
//! ```
//!
//! Dots are 200 ms, dashes 600 ms, 200 ms between marks and 600 ms
//! between letters. The period is 5400 ms.

use smart_leds::RGB8;

pub const SOS_PERIOD_MS: u32 = 5400;

/// Matrix colour while the waveform is on.
pub const SOS_COLOUR: RGB8 = RGB8 { r: 255, g: 0, b: 0 };

/// `[start, end)` windows within one period.
const ON_WINDOWS: [(u32, u32); 9] = [
    (0, 200),
    (400, 600),
    (800, 1000),
    (1600, 2200),
    (2400, 3000),
    (3200, 3800),
    (4400, 4600),
    (4800, 5000),
    (5200, 5400),
];

/// Whether the SOS signal is lit `elapsed_ms` into the pattern.
pub fn sos_phase(elapsed_ms: u32) -> bool {
    let t = elapsed_ms % SOS_PERIOD_MS;
    ON_WINDOWS.iter().any(|&(start, end)| (start..end).contains(&t))
}

/// Tracks rising edges of the waveform so each mark produces one tone.
///
/// The last dot of one period runs straight into the first dot of the
/// next, so a new period index also counts as an edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct SosEdge {
    last: Option<(u32, bool)>,
}

impl SosEdge {
    /// Feed the time since the pattern started. True only when a mark
    /// starts.
    pub fn rising(&mut self, elapsed_ms: u32) -> bool {
        let period = elapsed_ms / SOS_PERIOD_MS;
        let on = sos_phase(elapsed_ms);
        let edge = on
            && match self.last {
                Some((last_period, was_on)) => !was_on || last_period != period,
                None => true,
            };
        self.last = Some((period, on));
        edge
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
