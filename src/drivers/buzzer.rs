//! Buzzer cues.
//!
//! Each cue is a short note sequence played through the blocking
//! [`TonePort`]; gaps between notes use an `embedded_hal` delay. A cue
//! therefore stretches the tick by its full length.
//!
//! | Cue           | Notes (Hz / ms)                       |
//! |---------------|---------------------------------------|
//! | Startup       | 261/200, 329/200, 392/200, 523/400    |
//! | Wildlife      | 3 × 440/500, 100 ms apart             |
//! | FireCancelled | 880/100                               |
//! | SosBlip       | 650/50                                |
//! | CycleClick    | 440/50                                |
//! | Anomaly       | 449/500                               |

use embedded_hal::delay::DelayNs;

use crate::app::ports::TonePort;
use crate::error::DeviceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub frequency_hz: u32,
    pub duration_ms: u32,
    /// Silence after the note.
    pub gap_ms: u32,
}

const fn note(frequency_hz: u32, duration_ms: u32, gap_ms: u32) -> Note {
    Note {
        frequency_hz,
        duration_ms,
        gap_ms,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Startup,
    Wildlife,
    FireCancelled,
    SosBlip,
    CycleClick,
    Anomaly,
}

impl Cue {
    pub const fn notes(self) -> &'static [Note] {
        match self {
            Self::Startup => const { &[
                note(261, 200, 50),
                note(329, 200, 50),
                note(392, 200, 50),
                note(523, 400, 50),
            ] },
            Self::Wildlife => const { &[note(440, 500, 100), note(440, 500, 100), note(440, 500, 100)] },
            Self::FireCancelled => const { &[note(880, 100, 0)] },
            Self::SosBlip => const { &[note(650, 50, 0)] },
            Self::CycleClick => const { &[note(440, 50, 0)] },
            Self::Anomaly => const { &[note(449, 500, 0)] },
        }
    }

    /// Total blocking time of the cue.
    pub fn duration_ms(self) -> u32 {
        self.notes().iter().map(|n| n.duration_ms + n.gap_ms).sum()
    }
}

/// Play `cue` to completion.
pub fn play<H: TonePort + DelayNs + ?Sized>(hw: &mut H, cue: Cue) -> Result<(), DeviceError> {
    for n in cue.notes() {
        hw.play_tone(n.frequency_hz, n.duration_ms)?;
        if n.gap_ms > 0 {
            hw.delay_ms(n.gap_ms);
        }
    }
    Ok(())
}
