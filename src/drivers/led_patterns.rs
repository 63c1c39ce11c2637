//! Ambient patterns for the LED matrix: the flame animation and the
//! level bar graph.
//!
//! Four 5×5 intensity frames loop forever. The frame advances on wall-clock
//! time (every `animation_frame_ms`), not on tick count, so with a 100 ms
//! tick and a 200 ms frame only every other tick moves the flame.
//!
//! | Intensity | Colour          |
//! |-----------|-----------------|
//! | 0         | off             |
//! | 1         | dim red (embers)|
//! | 2         | orange          |
//! | 3         | yellow (tip)    |

use smart_leds::RGB8;

use super::led_matrix::{Frame, MATRIX_HEIGHT, MATRIX_WIDTH, OFF, frame_from_grid};

type Glyph = [[u8; MATRIX_WIDTH]; MATRIX_HEIGHT];

pub const FRAME_COUNT: usize = 4;

/// Row 0 is the top of the matrix; the flame grows from the bottom.
const FLAME: [Glyph; FRAME_COUNT] = [
    [
        [0, 0, 0, 0, 0],
        [0, 0, 3, 0, 0],
        [0, 2, 3, 2, 0],
        [0, 2, 2, 2, 0],
        [1, 1, 1, 1, 1],
    ],
    [
        [0, 0, 3, 0, 0],
        [0, 3, 2, 0, 0],
        [0, 2, 3, 2, 0],
        [1, 2, 2, 2, 1],
        [1, 1, 1, 1, 1],
    ],
    [
        [0, 0, 0, 0, 0],
        [0, 0, 2, 3, 0],
        [0, 2, 3, 2, 0],
        [0, 2, 2, 2, 1],
        [1, 1, 1, 1, 1],
    ],
    [
        [0, 0, 3, 0, 0],
        [0, 0, 3, 2, 0],
        [0, 3, 2, 2, 0],
        [1, 2, 2, 2, 0],
        [1, 1, 1, 1, 1],
    ],
];

pub const COLOUR_EMBER: RGB8 = RGB8 { r: 40, g: 0, b: 0 };
pub const COLOUR_FLAME: RGB8 = RGB8 { r: 255, g: 80, b: 0 };
pub const COLOUR_TIP: RGB8 = RGB8 { r: 255, g: 200, b: 0 };

pub const fn intensity_colour(level: u8) -> RGB8 {
    match level {
        0 => OFF,
        1 => COLOUR_EMBER,
        2 => COLOUR_FLAME,
        _ => COLOUR_TIP,
    }
}

/// Wire-order frame for glyph `index`.
pub fn flame_frame(index: usize) -> Frame {
    let glyph = FLAME[index % FRAME_COUNT];
    frame_from_grid(&glyph.map(|row| row.map(intensity_colour)))
}

/// Colour of the bar pixel `level` rows up in a bar `height` tall: blue
/// at the base shading to red at the top.
pub fn bar_colour(level: usize, height: usize) -> RGB8 {
    let fraction = level as f32 / (height.max(2) - 1) as f32;
    RGB8 {
        r: (fraction * 255.0) as u8,
        g: 0,
        b: ((1.0 - fraction) * 255.0) as u8,
    }
}

/// Level bar graph. Column `i` shows `heights[i]` pixels rising from the
/// bottom row; columns past the slice stay dark.
pub fn level_bars_frame(heights: &[u8]) -> Frame {
    let mut grid = [[OFF; MATRIX_WIDTH]; MATRIX_HEIGHT];
    for (col, &h) in heights.iter().enumerate().take(MATRIX_WIDTH) {
        let height = usize::from(h).min(MATRIX_HEIGHT);
        for level in 0..height {
            grid[MATRIX_HEIGHT - 1 - level][col] = bar_colour(level, height);
        }
    }
    frame_from_grid(&grid)
}

pub struct AmbientAnimation {
    frame_ms: u32,
    frame: usize,
    last_advance_ms: u32,
}

impl AmbientAnimation {
    pub fn new(frame_ms: u32, now_ms: u32) -> Self {
        Self {
            frame_ms,
            frame: 0,
            last_advance_ms: now_ms,
        }
    }

    /// Move to the next glyph if a frame period has elapsed. Returns true
    /// when the glyph changed.
    pub fn advance(&mut self, now_ms: u32) -> bool {
        if now_ms.wrapping_sub(self.last_advance_ms) < self.frame_ms {
            return false;
        }
        self.frame = (self.frame + 1) % FRAME_COUNT;
        self.last_advance_ms = now_ms;
        true
    }

    pub fn frame_index(&self) -> usize {
        self.frame
    }

    pub fn render(&self) -> Frame {
        flame_frame(self.frame)
    }
}
